// Formulary catalog
//
// *O Elenco* (The List) - Generic drugs dispensed by the popular pharmacy
// programme, with summaries and retailer search links

use busca::{FieldValue, Record, Schema};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Dataset name used in logs and errors
pub const DATASET: &str = "genericos";

/// Price note appended to every summary
pub const PRICE_NOTE: &str =
    "Genéricos custam pelo menos ~35% menos que o referência (ANVISA/Lei 9.787/99).";

/// Availability note returned by the overview endpoint
pub const FREE_NOTE: &str =
    "Todos os itens do elenco PFPB estão gratuitos desde 14/02/2025 (fonte oficial).";

/// Warning attached to purchase links
pub const LINKS_NOTICE: &str = "Links para busca em e-commerces de farmácias licenciadas. \
     Preços/estoque variam por região. Itens podem exigir prescrição (Rx).";

/// Popular pharmacy programme status of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pfpb {
    /// Dispensed free of charge
    pub gratuito: bool,

    /// Official source of the status
    pub fonte: String,
}

/// Bioequivalence statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equivalencia {
    /// Whether the generic is bioequivalent to the reference drug
    pub bioequivalente: bool,

    /// Official source
    pub fonte: String,
}

/// Expected savings over the reference drug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomiaEsperada {
    /// Legal minimum discount, in percent
    pub minimo_pct: u32,

    /// Typical discount range as published
    pub tipico_pct: String,

    /// Official source, when cited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonte: Option<String>,
}

/// One formulary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormularyEntry {
    /// Stable identifier
    pub id: String,

    /// Brazilian common denomination, with strength
    pub dcb: String,

    /// Therapeutic group (normalized form, e.g. `hipertensao`)
    pub grupo: String,

    /// Covered strengths
    #[serde(default)]
    pub dosagens: Vec<String>,

    /// Dosage forms
    #[serde(default)]
    pub formas: Vec<String>,

    /// Programme status
    pub pfpb: Pfpb,

    /// Sold under prescription only
    pub rx_required: bool,

    /// Bioequivalence statement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equivalencia: Option<Equivalencia>,

    /// Expected savings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economia_esperada: Option<EconomiaEsperada>,

    /// Official sources
    #[serde(default)]
    pub fontes: Vec<String>,

    /// Free-text remark
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacao: Option<String>,

    /// Term typed into retailer search boxes
    pub termo_compra: String,
}

impl Record for FormularyEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn primary_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.dcb)
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "dcb" => Some(FieldValue::Text(&self.dcb)),
            "grupo" => Some(FieldValue::Text(&self.grupo)),
            "formas" => Some(FieldValue::List(&self.formas)),
            "dosagens" => Some(FieldValue::List(&self.dosagens)),
            "observacao" => self.observacao.as_deref().map(FieldValue::Text),
            "gratuito" => Some(FieldValue::Flag(self.pfpb.gratuito)),
            _ => None,
        }
    }
}

impl FormularyEntry {
    /// One-paragraph summary suitable for chat context.
    ///
    /// Whitespace runs collapse to one space, so absent forms or strengths
    /// leave no gaps.
    pub fn resumo(&self) -> String {
        let pf = if self.pfpb.gratuito {
            "Disponível gratuitamente no Programa Farmácia Popular."
        } else {
            "Elegível ao Programa Farmácia Popular."
        };
        let rx = if self.rx_required {
            "Venda sob prescrição."
        } else {
            "Pode ser isento de prescrição."
        };
        let formas = if self.formas.is_empty() {
            String::new()
        } else {
            format!("Formas: {}.", self.formas.join(", "))
        };
        let doses = if self.dosagens.is_empty() {
            String::new()
        } else {
            format!("Dosagens contempladas: {}.", self.dosagens.join(", "))
        };

        let raw = format!(
            "{} — {}. {} {} {} {} {}",
            self.dcb,
            self.grupo.to_uppercase(),
            pf,
            rx,
            formas,
            doses,
            PRICE_NOTE
        );
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Search links on the supported retailers, in retailer order
    pub fn purchase_links(&self) -> Vec<PurchaseLink> {
        retailer_links(&self.termo_compra)
    }
}

/// Pharmacy chain with a term-based search page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Retailer {
    /// Display name
    pub name: &'static str,

    /// Search URL prefix; the encoded term is appended
    pub base: &'static str,
}

/// Retailers offered for formulary entries
pub const RETAILERS: &[Retailer] = &[
    Retailer {
        name: "Drogasil",
        base: "https://www.drogasil.com.br/search?w=",
    },
    Retailer {
        name: "Droga Raia",
        base: "https://www.drogaraia.com.br/search?w=",
    },
    Retailer {
        name: "Drogaria São Paulo (DPSP)",
        base: "https://www.drogariasaopaulo.com.br/search?ft=",
    },
    Retailer {
        name: "Pague Menos",
        base: "https://www.paguemenos.com.br/busca?q=",
    },
    Retailer {
        name: "Panvel",
        base: "https://www.panvel.com/panvel/busca?busca=",
    },
    Retailer {
        name: "Ultrafarma",
        base: "https://www.ultrafarma.com.br/busca?terms=",
    },
];

/// Pre-filled retailer search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseLink {
    /// Retailer display name
    pub retailer: &'static str,

    /// Search URL
    pub url: String,
}

/// Characters a browser's URI component encoding leaves unescaped
const COMPONENT_SAFE: &[(&str, &str)] = &[
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Percent-encode a query component, keeping `! ' ( ) *` literal
pub fn encode_component(term: &str) -> String {
    COMPONENT_SAFE
        .iter()
        .fold(urlencoding::encode(term).into_owned(), |acc, (escaped, literal)| {
            acc.replace(escaped, literal)
        })
}

/// Build one search link per retailer for a free-text term
pub fn retailer_links(term: &str) -> Vec<PurchaseLink> {
    let encoded = encode_component(term);
    RETAILERS
        .iter()
        .map(|r| PurchaseLink {
            retailer: r.name,
            url: format!("{}{}", r.base, encoded),
        })
        .collect()
}

/// Official source cited by the formulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Source {
    /// Short key
    #[serde(skip)]
    pub key: &'static str,

    /// Human-readable title
    pub name: &'static str,

    /// Location
    pub url: &'static str,

    /// Publication date, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<&'static str>,
}

/// Sources backing the formulary
pub const SOURCES: &[Source] = &[
    Source {
        key: "pfpb_pdf",
        name: "Elenco Farmácia Popular 2025 (21/01/2025)",
        url: "https://www.gov.br/saude/pt-br/composicao/sectics/farmacia-popular/arquivos/elenco-de-medicamentos-e-insumos.pdf",
        updated_at: Some("2025-01-21"),
    },
    Source {
        key: "pfpb_program",
        name: "Página do Programa Farmácia Popular (gratuidade desde 14/02/2025)",
        url: "https://www.gov.br/saude/pt-br/composicao/sectics/farmacia-popular",
        updated_at: Some("2025-02-14"),
    },
    Source {
        key: "anvisa_generics",
        name: "ANVISA – Medicamentos Genéricos (bioequivalência e preço)",
        url: "https://www.gov.br/anvisa/pt-br/assuntos/medicamentos/genericos",
        updated_at: None,
    },
    Source {
        key: "cmed_prices",
        name: "ANVISA/CMED – Listas de Preços de Medicamentos",
        url: "https://www.gov.br/anvisa/pt-br/assuntos/medicamentos/cmed/precos",
        updated_at: None,
    },
];

/// Sources keyed by their short key
pub fn sources_by_key() -> BTreeMap<&'static str, Source> {
    SOURCES.iter().map(|s| (s.key, *s)).collect()
}

/// Scoring table: every field weighs 1; 100 results by default, 300 at most
pub fn schema() -> Schema {
    Schema::new()
        .field("dcb")
        .field("grupo")
        .field("formas")
        .field("dosagens")
        .field("observacao")
        .with_limits(100, 300)
}

/// Entry count per group, groups in ascending order
pub fn group_counts<'a>(entries: impl IntoIterator<Item = &'a FormularyEntry>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.grupo.clone()).or_insert(0) += 1;
    }
    counts
}
