// Psychiatric formulary
//
// *A Farmácia da Mente* (The Mind's Pharmacy) - Psychotropic generics
// standardized in the public health system, grouped by supply component

use busca::{FieldValue, Record, Schema};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Dataset name used in logs and errors
pub const DATASET: &str = "psiquiatria";

/// Scope statement of the overview endpoint
pub const SCOPE: &str = "Psiquiatria – genéricos/psicofármacos padronizados no SUS (RENAME 2024)";

/// Cost-benefit statement for generics
pub const COST_NOTE: &str = "Genéricos no Brasil devem ser, por regra da ANVISA/Lei 9.787/99, \
     no mínimo 35% mais baratos que o medicamento de referência (variação local possível).";

/// Notes shown on the overview endpoint
pub const NOTES: &[&str] = &[
    "Farmácia Popular (PFPB) não contempla psicofármacos – vide elenco oficial 21/01/2025.",
    COST_NOTE,
    "Diversos itens exigem receita de controle especial (ex.: benzodiazepínicos e antipsicóticos).",
];

/// Official sources as (name, url)
pub const SOURCES: &[(&str, &str)] = &[
    (
        "RENAME 2024 – Ministério da Saúde",
        "https://bvsms.saude.gov.br/bvs/publicacoes/relacao_nacional_medicamentos_2024.pdf",
    ),
    (
        "PFPB – Elenco 21/01/2025",
        "https://www.gov.br/saude/pt-br/composicao/sectics/farmacia-popular/arquivos/elenco-de-medicamentos-e-insumos.pdf",
    ),
    (
        "ANVISA – Medicamentos Genéricos",
        "https://www.gov.br/anvisa/pt-br/assuntos/medicamentos/genericos",
    ),
];

static SALT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^cloridrato de\s+").expect("salt prefix pattern is valid")
});

static DOSAGE_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(cápsula|comprimido|solução oral|solução injetável|suspensão|xarope)\s*")
        .expect("dosage form pattern is valid")
});

/// One psychotropic generic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsychEntry {
    /// Stable identifier
    pub id: String,

    /// Brazilian common denomination
    pub dcb: String,

    /// ATC code
    pub atc: String,

    /// Supply component (Básico, Estratégico, Especializado)
    pub componente: String,

    /// Presentations, e.g. `comprimido 25 mg`
    #[serde(default)]
    pub formas: Vec<String>,

    /// Subject to special control
    pub controlado: bool,

    /// Sold under prescription only
    pub rx_required: bool,

    /// Eligible to the popular pharmacy programme
    pub pfpb_elegivel: bool,

    /// Sources
    #[serde(default)]
    pub fontes: Vec<String>,
}

impl Record for PsychEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn primary_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.dcb)
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::Text(&self.id)),
            "dcb" => Some(FieldValue::Text(&self.dcb)),
            "atc" => Some(FieldValue::Text(&self.atc)),
            "componente" => Some(FieldValue::Text(&self.componente)),
            "formas" => Some(FieldValue::List(&self.formas)),
            "controlado" => Some(FieldValue::Flag(self.controlado)),
            _ => None,
        }
    }
}

impl PsychEntry {
    /// Single-line summary
    pub fn resumo(&self) -> String {
        format!(
            "{} ({}) • {} • apresentações: {} • {}",
            self.dcb,
            self.atc,
            self.componente,
            self.formas.join(", "),
            COST_NOTE
        )
    }

    /// Retailer search links keyed by retailer.
    ///
    /// The search term is the denomination without its hydrochloride prefix,
    /// followed by the strength of the first presentation.
    pub fn purchase_links(&self) -> BTreeMap<&'static str, String> {
        let name = SALT_PREFIX.replace(&self.dcb, "");
        let dose = self
            .formas
            .first()
            .map(|f| DOSAGE_FORM.replace(f, "").into_owned())
            .unwrap_or_default();
        purchase_links(&name, &dose)
    }
}

/// Encode a term for retailer query strings, spaces as `+`
fn encode_term(term: &str) -> String {
    urlencoding::encode(term).replace("%20", "+")
}

/// Build retailer search links for a name and an optional strength
pub fn purchase_links(name: &str, dose: &str) -> BTreeMap<&'static str, String> {
    let q = encode_term(format!("{name} {dose}").trim());
    BTreeMap::from([
        ("drogasil", format!("https://www.drogasil.com.br/busca?q={q}")),
        ("drogarai", format!("https://www.drogaraia.com.br/busca?q={q}")),
        ("dpsp", format!("https://www.drogariasaopaulo.com.br/busca?q={q}")),
        ("pacheco", format!("https://www.drogariaspacheco.com.br/busca?q={q}")),
        ("paguemenos", format!("https://www.paguemenos.com.br/busca?q={q}")),
        ("panvel", format!("https://www.panvel.com/busca?conteudo={q}")),
        ("ultrafarma", format!("https://www.ultrafarma.com.br/busca?q={q}")),
    ])
}

/// Scoring table: denomination first, then ATC code; 25 results by default
pub fn schema() -> Schema {
    Schema::new()
        .weighted_field("dcb", 3)
        .weighted_field("atc", 2)
        .field("id")
        .field("componente")
        .field("formas")
        .with_limits(25, 200)
}

/// Entry ids grouped by supply component
pub fn ids_by_component<'a>(
    entries: impl IntoIterator<Item = &'a PsychEntry>,
) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for entry in entries {
        groups
            .entry(entry.componente.clone())
            .or_default()
            .push(entry.id.clone());
    }
    groups
}

/// Entry count per supply component
pub fn totals_by_component<'a>(
    entries: impl IntoIterator<Item = &'a PsychEntry>,
) -> BTreeMap<String, usize> {
    ids_by_component(entries)
        .into_iter()
        .map(|(component, ids)| (component, ids.len()))
        .collect()
}
