//! Term formatting shared by the Turtle converter and instance generation.

use std::borrow::Cow;

use crate::model::literal::{self, LiteralForm};
use crate::model::prefix::acronym_of;
use crate::model::{Vertex, VertexKind};

/// Quote `text` as a Turtle string literal, escaping `\`, `"` and line breaks.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Wrap a bare IRI in angle brackets.
pub fn iri(bare: &str) -> String {
    format!("<{bare}>")
}

/// Text that already is a literal lexical form passes through; anything
/// else is quoted.
pub fn literal_text(text: &str) -> Cow<'_, str> {
    if literal::classify(text).is_some() {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(quote(text))
    }
}

/// A vertex in object (or subject) position, without inline expansion.
///
/// Instance literals are quoted; IRIs are already stored bracketed; every
/// other name (global literal, prefixed class, blank id) is verbatim.
pub fn node_term(v: &Vertex) -> Cow<'_, str> {
    match v.kind() {
        VertexKind::InstanceLiteral => Cow::Owned(quote(v.name())),
        _ => Cow::Borrowed(v.name()),
    }
}

/// Acronym of a prefixed-name term, ignoring IRIs, literals and blank ids.
pub fn term_acronym(term: &str) -> Option<&str> {
    if term.starts_with(['<', '"', '\'', '_', '[', '(']) {
        return None;
    }
    acronym_of(term).filter(|a| !a.contains(char::is_whitespace))
}

/// Acronym used by a global literal's datatype, e.g. `xsd` in `"1"^^xsd:int`.
pub fn literal_datatype_acronym(v: &Vertex) -> Option<String> {
    match v.literal_form()? {
        LiteralForm::Typed(dt) => term_acronym(&dt).map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
        assert_eq!(quote(r"a\b"), r#""a\\b""#);
    }

    #[test]
    fn test_literal_text() {
        assert_eq!(literal_text("\"A person\"@en"), "\"A person\"@en");
        assert_eq!(literal_text("A person"), "\"A person\"");
        assert_eq!(literal_text("42"), "42");
    }

    #[test]
    fn test_term_acronym() {
        assert_eq!(term_acronym("ex:Person"), Some("ex"));
        assert_eq!(term_acronym(":local"), Some(""));
        assert_eq!(term_acronym("<http://example.org/>"), None);
        assert_eq!(term_acronym("_:a"), None);
        assert_eq!(term_acronym("\"a:b\""), None);
        assert_eq!(term_acronym("name"), None);
    }
}
