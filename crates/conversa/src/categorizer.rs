// Question categorizer
//
// *A Triagem* (The Triage) - Pattern families that tag a colleague's question
// with the kinds of discussion it calls for

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discussion category of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    /// Lived experience, temporality, classical authors
    Fenomenologia,
    /// Detailed description of psychopathological phenomena
    PsicopatologiaDescritiva,
    /// Unusual or phenomenologically rich cases
    CasosFenomenologicos,
    /// Combining phenomenological understanding with treatment
    IntegracaoTerapeutica,
    /// Concepts, theory, critique of models
    DiscussaoTeorica,
    /// Doses, conduct, emergencies
    ManejoPratico,
    /// Nothing more specific matched
    Geral,
}

impl QuestionCategory {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fenomenologia => "fenomenologia",
            Self::PsicopatologiaDescritiva => "psicopatologia_descritiva",
            Self::CasosFenomenologicos => "casos_fenomenologicos",
            Self::IntegracaoTerapeutica => "integracao_terapeutica",
            Self::DiscussaoTeorica => "discussao_teorica",
            Self::ManejoPratico => "manejo_pratico",
            Self::Geral => "geral",
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pattern families in evaluation order
const PATTERNS: &[(QuestionCategory, &[&str])] = &[
    (
        QuestionCategory::Fenomenologia,
        &[
            r"(?i)fenômeno|vivência|experiência|descrição",
            r"(?i)temporalidade|espacialidade|corporeidade",
            r"(?i)mundo.?da.?vida|lebenswelt|dasein",
            r"(?i)estrutura.*experiência|análise.*existencial",
            r"(?i)jaspers|minkowski|binswanger|merleau.?ponty",
        ],
    ),
    (
        QuestionCategory::PsicopatologiaDescritiva,
        &[
            r"(?i)como.*paciente.*vive|experimenta|\bsente\b",
            r"(?i)descrição.*detalhada|fenomenológica",
            r"(?i)alteração.*consciência|\bself\b|\beu\b",
            r"(?i)mudança.*percepção|vivência.*tempo",
        ],
    ),
    (
        QuestionCategory::CasosFenomenologicos,
        &[
            r"(?i)caso.*interessante|peculiar|fenomenologicamente",
            r"(?i)apresentação.*atípica|incomum",
            r"(?i)fenômeno.*raro|singular",
            r"(?i)estrutura.*delírio|alucinação|humor",
        ],
    ),
    (
        QuestionCategory::IntegracaoTerapeutica,
        &[
            r"(?i)como.*integrar.*fenomenologia.*tratamento",
            r"(?i)abordagem.*compreensiva.*medicação",
            r"(?i)psicofarmacologia.*fenomenológica",
            r"(?i)terapêutica.*existencial",
        ],
    ),
    (
        QuestionCategory::DiscussaoTeorica,
        &[
            r"(?i)conceito|teoria|fundamento",
            r"(?i)diferença.*fenomenologia.*dsm",
            r"(?i)crítica.*modelo.*biomédico",
            r"(?i)psicopatologia.*fundamental",
        ],
    ),
    (
        QuestionCategory::ManejoPratico,
        &[
            r"(?i)dose|medicação|prescrição",
            r"(?i)conduta|manejo|tratamento",
            r"(?i)urgência|emergência|crise",
            r"(?i)prático|objetivo|direto",
        ],
    ),
];

/// Tags questions with discussion categories
#[derive(Debug, Clone)]
pub struct Categorizer {
    families: Vec<(QuestionCategory, Vec<Regex>)>,
}

impl Categorizer {
    /// Compile the pattern families
    pub fn new() -> Result<Self> {
        let families = PATTERNS
            .iter()
            .map(|(category, patterns)| {
                let compiled = patterns
                    .iter()
                    .map(|p| Regex::new(p).map_err(|e| Error::InvalidPattern(e.to_string())))
                    .collect::<Result<Vec<_>>>()?;
                Ok((*category, compiled))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { families })
    }

    /// Categories matched by a question, in family order.
    ///
    /// Never empty: a question matching no family is [`QuestionCategory::Geral`].
    pub fn categorize(&self, question: &str) -> Vec<QuestionCategory> {
        let matched: Vec<QuestionCategory> = self
            .families
            .iter()
            .filter(|(_, patterns)| patterns.iter().any(|p| p.is_match(question)))
            .map(|(category, _)| *category)
            .collect();

        if matched.is_empty() {
            vec![QuestionCategory::Geral]
        } else {
            matched
        }
    }
}
