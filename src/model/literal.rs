//! RDF literal lexical forms.
//!
//! Classification is an ordered list of plain pattern checks, evaluated
//! first to last:
//!
//! 1. quoted string, optionally `@lang` or `^^datatype` suffixed
//! 2. boolean
//! 3. integer
//! 4. decimal
//! 5. double (scientific notation)
//!
//! Text that matches none of them is not a literal; the vertex classifier
//! then decides between an instance placeholder and a rejection.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::vocab;

/// Recognized lexical form of a literal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", content = "value")]
pub enum LiteralForm {
    /// `"text"`, a plain string.
    String,
    /// `"text"@en`
    LangString(String),
    /// `"text"^^xsd:date`, datatype as written (prefixed name or `<iri>`).
    Typed(String),
    Boolean,
    Integer,
    Decimal,
    Double,
}

impl LiteralForm {
    /// Datatype implied by the form, in prefixed notation.
    pub fn datatype(&self) -> &str {
        match self {
            LiteralForm::String => vocab::XSD_STRING,
            LiteralForm::LangString(_) => vocab::RDF_LANG_STRING,
            LiteralForm::Typed(dt) => dt,
            LiteralForm::Boolean => vocab::XSD_BOOLEAN,
            LiteralForm::Integer => vocab::XSD_INTEGER,
            LiteralForm::Decimal => vocab::XSD_DECIMAL,
            LiteralForm::Double => vocab::XSD_DOUBLE,
        }
    }
}

type Classifier = fn(&str) -> Option<LiteralForm>;

/// Priority order of the literal classifiers.
const CLASSIFIERS: &[(&str, Classifier)] = &[
    ("quoted", classify_quoted),
    ("boolean", classify_boolean),
    ("integer", classify_integer),
    ("decimal", classify_decimal),
    ("double", classify_double),
];

/// Classify `text` as an RDF literal, or `None` if no lexical form matches.
pub fn classify(text: &str) -> Option<LiteralForm> {
    CLASSIFIERS.iter().find_map(|(_, check)| check(text))
}

/// Lexical value of a literal without quotes, suffix and string escapes.
///
/// `"Ada"@en` → `Ada`, `"say \"hi\""` → `say "hi"`, `42` → `42`.
/// Non-literal text is returned unchanged.
pub fn lexical_value(text: &str) -> Cow<'_, str> {
    match split_quoted(text) {
        Some((body, _)) if body.contains('\\') => Cow::Owned(unescape(body)),
        Some((body, _)) => Cow::Borrowed(body),
        None => Cow::Borrowed(text),
    }
}

/// Resolve Turtle string escapes. Unknown escapes keep their backslash.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some(q @ ('"' | '\'' | '\\')) => out.push(q),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split a quoted literal into its body and the text after the closing quote.
fn split_quoted(text: &str) -> Option<(&str, &str)> {
    let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let rest = &text[1..];
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Some((&rest[..i], &rest[i + 1..]));
        }
    }
    None
}

fn classify_quoted(text: &str) -> Option<LiteralForm> {
    let (_, suffix) = split_quoted(text)?;
    if suffix.is_empty() {
        return Some(LiteralForm::String);
    }
    if let Some(lang) = suffix.strip_prefix('@') {
        return is_language_tag(lang).then(|| LiteralForm::LangString(lang.to_string()));
    }
    if let Some(dt) = suffix.strip_prefix("^^") {
        return is_datatype_ref(dt).then(|| LiteralForm::Typed(dt.to_string()));
    }
    None
}

fn classify_boolean(text: &str) -> Option<LiteralForm> {
    matches!(text, "true" | "false").then_some(LiteralForm::Boolean)
}

fn classify_integer(text: &str) -> Option<LiteralForm> {
    is_digits(strip_sign(text)).then_some(LiteralForm::Integer)
}

fn classify_decimal(text: &str) -> Option<LiteralForm> {
    let (int, frac) = strip_sign(text).split_once('.')?;
    let int_ok = int.is_empty() || is_digits(int);
    (int_ok && is_digits(frac)).then_some(LiteralForm::Decimal)
}

fn classify_double(text: &str) -> Option<LiteralForm> {
    let body = strip_sign(text);
    let idx = body.find(['e', 'E'])?;
    let (mantissa, exponent) = (&body[..idx], &body[idx + 1..]);
    if !is_digits(strip_sign(exponent)) {
        return None;
    }
    let mantissa_ok = match mantissa.split_once('.') {
        Some((int, frac)) => {
            (int.is_empty() || is_digits(int))
                && (frac.is_empty() || is_digits(frac))
                && !(int.is_empty() && frac.is_empty())
        }
        None => is_digits(mantissa),
    };
    mantissa_ok.then_some(LiteralForm::Double)
}

fn strip_sign(text: &str) -> &str {
    text.strip_prefix(['+', '-']).unwrap_or(text)
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// `[a-zA-Z]+('-'[a-zA-Z0-9]+)*`
fn is_language_tag(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let primary_ok = parts
        .next()
        .is_some_and(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_alphabetic()));
    primary_ok && parts.all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_alphanumeric()))
}

/// `<iri>` or `prefix:local`.
fn is_datatype_ref(dt: &str) -> bool {
    if let Some(inner) = dt.strip_prefix('<').and_then(|d| d.strip_suffix('>')) {
        return !inner.is_empty() && !inner.contains(char::is_whitespace);
    }
    match dt.split_once(':') {
        Some((prefix, local)) => {
            prefix.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
                && !local.is_empty()
                && !local.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_forms() {
        assert_eq!(classify("\"hello\""), Some(LiteralForm::String));
        assert_eq!(classify("'hi'"), Some(LiteralForm::String));
        assert_eq!(classify("\"bonjour\"@fr-CA"), Some(LiteralForm::LangString("fr-CA".into())));
        assert_eq!(
            classify("\"2020-01-01\"^^xsd:date"),
            Some(LiteralForm::Typed("xsd:date".into()))
        );
        assert_eq!(
            classify("\"x\"^^<http://example.org/dt>"),
            Some(LiteralForm::Typed("<http://example.org/dt>".into()))
        );
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        assert_eq!(classify(r#""say \"hi\"""#), Some(LiteralForm::String));
        assert_eq!(lexical_value(r#""a"@en"#), "a");
        assert_eq!(lexical_value(r#""say \"hi\"""#), r#"say "hi""#);
    }

    #[test]
    fn test_lexical_value_unescapes() {
        assert_eq!(lexical_value(r#""a\\b""#), r"a\b");
        assert_eq!(lexical_value(r#""line\nnext\ttab""#), "line\nnext\ttab");
        assert_eq!(lexical_value(r"'it\'s'"), "it's");
        assert_eq!(lexical_value(r#""keep \q""#), r"keep \q");
        assert!(matches!(lexical_value("\"plain\""), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_malformed_quoted() {
        assert_eq!(classify("\"open"), None);
        assert_eq!(classify("\"x\"@"), None);
        assert_eq!(classify("\"x\"^^"), None);
        assert_eq!(classify("\"x\" trailing"), None);
    }

    #[test]
    fn test_numbers_in_priority_order() {
        assert_eq!(classify("true"), Some(LiteralForm::Boolean));
        assert_eq!(classify("-42"), Some(LiteralForm::Integer));
        assert_eq!(classify("+3.14"), Some(LiteralForm::Decimal));
        assert_eq!(classify(".5"), Some(LiteralForm::Decimal));
        assert_eq!(classify("1.5e10"), Some(LiteralForm::Double));
        assert_eq!(classify("2E-3"), Some(LiteralForm::Double));
        assert_eq!(classify(".5e1"), Some(LiteralForm::Double));
    }

    #[test]
    fn test_non_literals() {
        assert_eq!(classify("name"), None);
        assert_eq!(classify("ex:Foo"), None);
        assert_eq!(classify("1."), None);
        assert_eq!(classify("e5"), None);
        assert_eq!(classify("TRUE"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_form_datatypes() {
        assert_eq!(LiteralForm::Integer.datatype(), "xsd:integer");
        assert_eq!(LiteralForm::Typed("xsd:date".into()).datatype(), "xsd:date");
    }
}
