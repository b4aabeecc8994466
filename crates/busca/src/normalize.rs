// Text normalization
//
// *A Normalização* (The Normalization) - Canonical comparison form for
// queries and catalog text

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Punctuation kept in normalized text because it carries meaning in
/// dosages, ATC codes and citations ("100 UI/mL", "0.5", "N06AB03", "a+b").
pub const RETAINED_PUNCTUATION: &[char] = &[':', '/', '.', '+', '-'];

/// Normalize text for comparison.
///
/// Lower-cases, decomposes accented characters and drops the combining
/// marks, replaces everything that is not a letter, digit, whitespace or one
/// of [`RETAINED_PUNCTUATION`] with a space, then collapses and trims
/// whitespace.
///
/// ```
/// use busca::normalize;
///
/// assert_eq!(normalize("  Cloridrato de  SÓDIO (0,9%) "), "cloridrato de sodio 0 9");
/// assert_eq!(normalize("100 UI/mL"), "100 ui/ml");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        // Some decompositions leave an upper-case base letter behind
        .flat_map(char::to_lowercase)
        .map(|c| if is_retained(c) { c } else { ' ' })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a list of values as one space-joined text.
pub fn normalize_all<S: AsRef<str>>(values: &[S]) -> String {
    let joined = values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    normalize(&joined)
}

fn is_retained(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || RETAINED_PUNCTUATION.contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("SODIO", "sodio")]
    #[case("sódio", "sodio")]
    #[case("Ação Prolongada", "acao prolongada")]
    #[case("Brometo de ipratrópio 0,02 mg", "brometo de ipratropio 0 02 mg")]
    #[case("Insulina humana 100 UI/mL (NPH)", "insulina humana 100 ui/ml nph")]
    #[case("Etinilestradiol 0,03 mg + Levonorgestrel", "etinilestradiol 0 03 mg + levonorgestrel")]
    #[case("Merleau-Ponty: Fenomenologia", "merleau-ponty: fenomenologia")]
    #[case("Kaplan, H. I., & Sadock", "kaplan h. i. sadock")]
    #[case("\t  espaços \n\n demais  ", "espacos demais")]
    #[case("", "")]
    #[case("   ", "")]
    #[case("¡¿!?", "")]
    fn test_normalize_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn test_normalize_all_joins_with_space() {
        let formas = vec!["cápsula 20 mg".to_string(), "Comprimido 20 mg".to_string()];
        assert_eq!(normalize_all(&formas), "capsula 20 mg comprimido 20 mg");

        let empty: Vec<String> = Vec::new();
        assert_eq!(normalize_all(&empty), "");
    }

    #[test]
    fn test_normalize_keeps_non_latin_letters() {
        assert_eq!(normalize("Ψυχιατρική"), "ψυχιατρικη");
        assert_eq!(normalize("Daseinsanalyse ÜBER"), "daseinsanalyse uber");
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(s in "[a-zA-Z0-9À-ÿçÇãõÃÕ ,.;:/+()%&\\-\t\n]{0,48}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_normalized_has_no_marks_or_uppercase(s in "[a-zA-ZÀ-ÿ0-9 ]{0,48}") {
            let out = normalize(&s);
            prop_assert!(out.nfd().all(|c| !is_combining_mark(c)));
            prop_assert!(!out.chars().any(char::is_uppercase));
        }

        #[test]
        fn prop_normalized_has_no_edge_or_double_spaces(s in "\\PC{0,32}") {
            let out = normalize(&s);
            prop_assert!(!out.starts_with(' '));
            prop_assert!(!out.ends_with(' '));
            prop_assert!(!out.contains("  "));
        }
    }
}
