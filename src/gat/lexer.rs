//! GAT lexer: splits raw text into bracket-delimited records and
//! pipe-separated fields, honoring backslash escapes.

use crate::{Error, Result};

pub const RECORD_OPEN: char = '[';
pub const RECORD_CLOSE: char = ']';
pub const FIELD_SEP: char = '|';
pub const ESCAPE: char = '\\';

/// Source span (byte offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A raw record: text between unescaped brackets, escapes still in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub span: Span,
}

/// Record tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTag {
    /// `G`: canvas size.
    Canvas,
    /// `C`: class vertex.
    Class,
    /// `L`: literal vertex.
    Literal,
    /// `A`: straight property edge.
    Straight,
    /// `R`: self-referential (curved) property edge.
    Loop,
}

impl RecordTag {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'G' => Some(RecordTag::Canvas),
            'C' => Some(RecordTag::Class),
            'L' => Some(RecordTag::Literal),
            'A' => Some(RecordTag::Straight),
            'R' => Some(RecordTag::Loop),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            RecordTag::Canvas => 'G',
            RecordTag::Class => 'C',
            RecordTag::Literal => 'L',
            RecordTag::Straight => 'A',
            RecordTag::Loop => 'R',
        }
    }
}

/// Split `input` on unescaped `[` / `]`, dropping empty and whitespace-only pieces.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (pos, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            ESCAPE => escaped = true,
            RECORD_OPEN | RECORD_CLOSE => {
                push_token(&mut tokens, input, start, pos);
                start = pos + ch.len_utf8();
            }
            _ => {}
        }
    }
    push_token(&mut tokens, input, start, input.len());
    tokens
}

fn push_token<'a>(tokens: &mut Vec<Token<'a>>, input: &'a str, start: usize, end: usize) {
    let text = &input[start..end];
    if !text.trim().is_empty() {
        tokens.push(Token { text, span: Span { start, end } });
    }
}

/// A record split into its tag and unescaped fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub tag: RecordTag,
    pub fields: Vec<String>,
    pub span: Span,
}

impl Record {
    /// Field `i`, or an error naming what was expected there.
    pub fn field(&self, i: usize, what: &str) -> Result<&str> {
        self.fields.get(i).map(String::as_str).ok_or_else(|| {
            Error::InvalidContainer(format!(
                "{} record at {} is missing field {i} ({what})",
                self.tag.as_char(),
                self.span.start
            ))
        })
    }

    /// Optional trailing field: absent or empty ⇒ `None`.
    pub fn optional(&self, i: usize) -> Option<String> {
        self.fields.get(i).filter(|f| !f.is_empty()).cloned()
    }

    pub fn number(&self, i: usize, what: &str) -> Result<f64> {
        let raw = self.field(i, what)?;
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                Error::InvalidContainer(format!(
                    "{} record at {}: {what} '{raw}' is not a number",
                    self.tag.as_char(),
                    self.span.start
                ))
            })
    }
}

/// Parse a token into a tagged record. The canvas token has no fields.
pub fn parse_record(token: Token<'_>) -> Result<Record> {
    let mut chars = token.text.trim_start().chars();
    let tag_char = chars.next().unwrap_or(' ');
    let tag = RecordTag::from_char(tag_char).ok_or_else(|| {
        Error::InvalidContainer(format!(
            "unknown record tag '{tag_char}' at {}",
            token.span.start
        ))
    })?;
    let body = chars.as_str();
    let fields = match tag {
        RecordTag::Canvas => vec![body.trim().to_string()],
        _ => split_fields(body),
    };
    Ok(Record { tag, fields, span: token.span })
}

/// Split on unescaped `|` and unescape each piece.
pub fn split_fields(body: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars();

    while let Some(ch) = chars.next() {
        match ch {
            ESCAPE => match chars.next() {
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(c) => current.push(c),
                None => current.push(ESCAPE),
            },
            FIELD_SEP => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Escape a field value so it survives record and field splitting.
pub fn escape_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            ESCAPE | FIELD_SEP | RECORD_OPEN | RECORD_CLOSE => {
                out.push(ESCAPE);
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}
