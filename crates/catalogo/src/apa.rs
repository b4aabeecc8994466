// APA-style citations

use crate::referencias::Reference;

/// Abbreviate a person name to "Last, G. N.".
///
/// Names written "Last, Given Names" keep the part before the comma as the
/// surname; other names take their last word as the surname.
pub fn to_initials(person: &str) -> String {
    let person = person.trim();
    if person.is_empty() {
        return String::new();
    }

    let (last, given): (&str, Vec<&str>) = match person.split_once(',') {
        Some((last, given)) => (last.trim(), given.split_whitespace().collect()),
        None => {
            let mut words: Vec<&str> = person.split_whitespace().collect();
            let last = words.pop().unwrap_or_default();
            (last, words)
        }
    };

    let initials = given
        .iter()
        .filter_map(|word| word.chars().next())
        .map(|c| format!("{}.", c.to_uppercase()))
        .collect::<Vec<_>>()
        .join(" ");

    format!("{last}, {initials}").trim().to_string()
}

/// Join names APA style: "A", "A, & B", "A, B, & C"
fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{}, & {}", init.join(", "), last),
    }
}

/// Author segment: authors, else editors, else the corporate author.
///
/// An author identical to the corporate author is an institution and is
/// kept verbatim.
pub fn format_authors(reference: &Reference) -> String {
    let corporate = reference.corporate_author.as_deref().unwrap_or("");
    let abbreviate = |name: &String| {
        if !corporate.is_empty() && name == corporate {
            name.clone()
        } else {
            to_initials(name)
        }
    };

    if !reference.authors.is_empty() {
        let names: Vec<String> = reference.authors.iter().map(abbreviate).collect();
        return join_names(&names);
    }
    if !reference.editors.is_empty() {
        let names: Vec<String> = reference.editors.iter().map(abbreviate).collect();
        return join_names(&names);
    }
    corporate.to_string()
}

/// Container segment: journal details, else place and publisher
pub fn format_where(reference: &Reference) -> String {
    if let Some(journal) = reference.journal.as_deref().filter(|j| !j.is_empty()) {
        let mut s = journal.to_string();
        if let Some(volume) = non_empty(&reference.volume) {
            s.push_str(&format!(", {volume}"));
        }
        if let Some(issue) = non_empty(&reference.issue) {
            s.push_str(&format!("({issue})"));
        }
        if let Some(pages) = non_empty(&reference.pages) {
            s.push_str(&format!(", {pages}"));
        }
        return s;
    }

    let place = match (non_empty(&reference.city), non_empty(&reference.publisher)) {
        (Some(city), Some(publisher)) => format!("{city}: {publisher}"),
        (Some(city), None) => city.to_string(),
        (None, Some(publisher)) => publisher.to_string(),
        (None, None) => String::new(),
    };
    match non_empty(&reference.edition) {
        Some(edition) if place.is_empty() => format!("({edition} ed.)"),
        Some(edition) => format!("{place} ({edition} ed.)"),
        None => place,
    }
}

/// Identifier segment: DOI, else ISBN, else URL
pub fn format_ids(reference: &Reference) -> String {
    if let Some(doi) = non_empty(&reference.doi) {
        return format!("https://doi.org/{doi}");
    }
    if let Some(isbn) = non_empty(&reference.isbn) {
        return format!("ISBN {isbn}");
    }
    reference.url.trim().to_string()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Full citation.
///
/// `Authors (Year). Title. Where. Ids`, with `(s.d.)` for undated works,
/// `(Ed.)`/`(Eds.)` after the title of editor-only works, and `*title*` for
/// books, guidelines and classifications.
pub fn format_citation(reference: &Reference) -> String {
    let authors = format_authors(reference);
    let year = match reference.year {
        Some(year) => format!("({year})."),
        None => "(s.d.).".to_string(),
    };

    let title = if reference.kind.italic_title() {
        format!("*{}*", reference.title.trim())
    } else {
        reference.title.trim().to_string()
    };
    let title_end = if reference.authors.is_empty() && !reference.editors.is_empty() {
        if reference.editors.len() > 1 {
            " (Eds.)."
        } else {
            " (Ed.)."
        }
    } else if title.ends_with(&['.', '?', '!'][..]) {
        ""
    } else {
        "."
    };

    let mut parts: Vec<String> = Vec::with_capacity(5);
    if !authors.is_empty() {
        parts.push(authors);
    }
    parts.push(year);
    parts.push(format!("{title}{title_end}"));

    let place = format_where(reference);
    if !place.is_empty() {
        if place.ends_with('.') {
            parts.push(place);
        } else {
            parts.push(format!("{place}."));
        }
    }

    let ids = format_ids(reference);
    if !ids.is_empty() {
        parts.push(ids);
    }

    parts.join(" ")
}
