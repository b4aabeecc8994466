// Discussion turns against a scripted backend

use async_trait::async_trait;
use conversa::{ChatBackend, Discussion, Error, QuestionCategory};
use sessao::{Author, Colleague, SessionStore};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct ScriptedBackend {
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, prompt: &str) -> conversa::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(Error::Upstream {
                status: 529,
                body: "overloaded".to_string(),
            });
        }
        Ok(format!("resposta {}", self.prompts.lock().unwrap().len()))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

fn colleague() -> Colleague {
    Colleague {
        name: "Ana".to_string(),
        specialty: Some("Psicogeriatria".to_string()),
        institution: None,
        topic: Some("delirium".to_string()),
    }
}

#[tokio::test]
async fn test_reply_records_both_turns() {
    let backend = Arc::new(ScriptedBackend::default());
    let discussion = Discussion::new(backend.clone()).unwrap();
    let store = SessionStore::new();
    let id = store.create(colleague()).await.id;

    let reply = discussion
        .reply(&store, &id, "Qual a dose de haloperidol?")
        .await
        .unwrap();
    assert_eq!(reply.answer, "resposta 1");
    assert_eq!(reply.categories, vec![QuestionCategory::ManejoPratico]);

    let session = store.peek(&id).await.unwrap();
    assert_eq!(session.message_count(), 2);
    assert_eq!(session.history[0].author, Author::Colleague);
    assert_eq!(session.history[1].content, "resposta 1");
    assert_eq!(session.topics, vec!["manejo_pratico"]);

    let prompts = backend.prompts.lock().unwrap();
    let prompt = &prompts[0];
    assert!(prompt.contains("Colega: Dr(a). Ana\nEspecialidade: Psicogeriatria\nTópico inicial: delirium"));
    // the question appears once, at the end
    assert_eq!(prompt.matches("Qual a dose de haloperidol?").count(), 1);
    assert!(prompt.ends_with("Colega: Qual a dose de haloperidol?\n\nDr. Alexandre:"));
}

#[tokio::test]
async fn test_second_turn_sees_history() {
    let backend = Arc::new(ScriptedBackend::default());
    let discussion = Discussion::new(backend.clone()).unwrap();
    let store = SessionStore::new();
    let id = store.create(Colleague::named("Ana")).await.id;

    discussion.reply(&store, &id, "Primeira").await.unwrap();
    discussion.reply(&store, &id, "Segunda").await.unwrap();

    let prompts = backend.prompts.lock().unwrap();
    assert!(prompts[1].contains("HISTÓRICO DA CONVERSA:\nColega: Primeira\nDr. Alexandre: resposta 1\n"));
    assert_eq!(store.peek(&id).await.unwrap().message_count(), 4);
}

#[tokio::test]
async fn test_unknown_session() {
    let discussion = Discussion::new(Arc::new(ScriptedBackend::default())).unwrap();
    let err = discussion
        .reply(&SessionStore::new(), "nope", "Oi")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Session(sessao::Error::NotFound(_))));
    assert!(!err.is_backend());
}

#[tokio::test]
async fn test_finished_session_is_rejected() {
    let discussion = Discussion::new(Arc::new(ScriptedBackend::default())).unwrap();
    let store = SessionStore::new();
    let id = store.create(Colleague::named("Ana")).await.id;
    store.finish(&id, None).await.unwrap();

    let err = discussion.reply(&store, &id, "Oi").await.unwrap_err();
    assert!(matches!(err, Error::Session(sessao::Error::Finished(_))));
    assert_eq!(store.peek(&id).await.unwrap().message_count(), 0);
}

#[tokio::test]
async fn test_backend_failure_keeps_question() {
    let backend = Arc::new(ScriptedBackend {
        fail: true,
        ..ScriptedBackend::default()
    });
    let discussion = Discussion::new(backend).unwrap();
    let store = SessionStore::new();
    let id = store.create(Colleague::named("Ana")).await.id;

    let err = discussion.reply(&store, &id, "Oi").await.unwrap_err();
    assert!(err.is_backend());

    let session = store.peek(&id).await.unwrap();
    assert_eq!(session.message_count(), 1);
    assert!(session.topics.is_empty());
}
