// Chat backend seam

use crate::error::Result;
use async_trait::async_trait;

/// A model that turns a prompt into a reply
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Complete `prompt`, returning the trimmed reply text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model identifier, for status reporting
    fn model(&self) -> &str;
}
