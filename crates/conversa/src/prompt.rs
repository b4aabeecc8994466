// Prompt construction
//
// *O Contexto* (The Context) - Persona, category guidance, discussion context
// and history assembled into a single prompt

use crate::categorizer::QuestionCategory;
use sessao::{Author, Colleague, Message};
use std::fmt::Write;

/// Name the assistant speaks under
pub const PERSONA_NAME: &str = "Dr. Alexandre";

/// Persona and conduct instructions placed at the top of every prompt
pub const BASE_PROMPT: &str = "\
Você é o Dr. Alexandre, psiquiatra sênior com 15 anos de experiência em \
Psicopatologia Fenomenológica e Psicofarmacologia, conversando com OUTRO \
PSIQUIATRA numa abordagem fenomenológico-descritiva.

PERFIL:
- Formação em psiquiatria fenomenológica (Jaspers, Minkowski, Binswanger)
- Descreve as vivências antes de classificá-las
- Integra psicopatologia descritiva e evidência científica atual

COMUNICAÇÃO ENTRE COLEGAS:
- Linguagem descritiva precisa; jargão só quando acrescenta precisão
- Explore temporalidade, espacialidade, corporeidade e intersubjetividade vividas
- Considere biografia e contexto existencial; evite reducionismos
- Tom colegial, como numa supervisão

CONDUTA CLÍNICA:
- Em casos, comece pela descrição fenomenológica
- Em manejo, seja direto e baseie-se nas evidências atuais
- No Brasil, apresente todas as opções medicamentosas disponíveis, inclusive as \
não indicadas para o caso, explicando o motivo
- Seja assertivo e conciso sem perder robustez técnica";

/// Extra guidance appended for a category, if any
pub fn category_guidance(category: QuestionCategory) -> Option<&'static str> {
    match category {
        QuestionCategory::Fenomenologia => Some(
            "FOCO FENOMENOLÓGICO:\nPriorize a descrição detalhada dos fenômenos mentais: \
             como o paciente vive sua condição, alterações da temporalidade e da \
             espacialidade vividas, da corporeidade e da relação com o mundo.",
        ),
        QuestionCategory::PsicopatologiaDescritiva => Some(
            "ABORDAGEM DESCRITIVA:\nDescreva minuciosamente as características do fenômeno \
             psicopatológico com linguagem precisa. Contemple a riqueza da experiência antes \
             de categorizar.",
        ),
        QuestionCategory::CasosFenomenologicos => Some(
            "DISCUSSÃO DE CASO:\nComece pela descrição fenomenológica detalhada e pela \
             estrutura da experiência, o modo de ser-no-mundo do paciente, antes de \
             diagnósticos ou tratamentos.",
        ),
        QuestionCategory::IntegracaoTerapeutica => Some(
            "INTEGRAÇÃO TERAPÊUTICA:\nMostre como a compreensão fenomenológica orienta as \
             decisões de tratamento, farmacológicas e psicoterápicas.",
        ),
        QuestionCategory::DiscussaoTeorica => Some(
            "DISCUSSÃO TEÓRICA:\nSitue os conceitos em seus autores e tradições e aponte \
             as divergências entre modelos.",
        ),
        QuestionCategory::ManejoPratico => Some(
            "QUESTÃO PRÁTICA:\nSeja direto e objetivo. Dê informações práticas claras, \
             considerando o contexto fenomenológico quando relevante para o manejo.",
        ),
        QuestionCategory::Geral => None,
    }
}

/// Discussion header describing the colleague
pub fn discussion_context(colleague: &Colleague) -> String {
    let mut out = format!(
        "Discussão entre psiquiatras\nColega: {}\n",
        colleague.display_name()
    );
    if let Some(specialty) = colleague.specialty.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "Especialidade: {specialty}");
    }
    if let Some(topic) = colleague.topic.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "Tópico inicial: {topic}");
    }
    out
}

/// Assemble the full prompt for a new question.
///
/// `history` holds the turns before `question`; the prompt ends with the
/// persona name so the backend answers in its voice.
pub fn build_prompt(
    question: &str,
    categories: &[QuestionCategory],
    history: &[Message],
    context: Option<&str>,
) -> String {
    let mut prompt = String::from(BASE_PROMPT);

    for guidance in categories.iter().filter_map(|c| category_guidance(*c)) {
        prompt.push_str("\n\n");
        prompt.push_str(guidance);
    }

    if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
        let _ = write!(prompt, "\n\nCONTEXTO DA DISCUSSÃO:\n{context}");
    }

    prompt.push_str("\n\nHISTÓRICO DA CONVERSA:\n");
    for message in history {
        let speaker = match message.author {
            Author::Colleague => "Colega",
            Author::Assistant => PERSONA_NAME,
        };
        let _ = writeln!(prompt, "{speaker}: {}", message.content);
    }

    let _ = write!(prompt, "\nColega: {question}\n\n{PERSONA_NAME}:");
    prompt
}

/// Opening message of a new session
pub fn greeting(colleague: &Colleague) -> String {
    let topic = colleague
        .topic
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|t| format!(" Vi que você quer discutir sobre {t}."))
        .unwrap_or_default();
    format!(
        "Olá, {}! Alexandre aqui.{} Como posso ajudar? Conte-me sobre o caso ou questão \
         que gostaria de discutir.",
        colleague.display_name(),
        topic
    )
}
