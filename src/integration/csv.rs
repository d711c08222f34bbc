//! Minimal CSV reader.
//!
//! Comma separated, first row is the header. Fields may be double-quoted;
//! inside quotes, `""` is a literal quote and separators and line breaks
//! are ordinary characters. Both LF and CRLF row endings are accepted.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const SEPARATOR: char = ',';
const QUOTE: char = '"';

/// A parsed CSV document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        Self { headers, records }
    }

    /// Parse CSV text. Blank lines are skipped; an empty input yields an
    /// empty table.
    pub fn parse(input: &str) -> Result<Self> {
        let mut rows = Reader::new(input).rows()?.into_iter();
        let headers = rows
            .next()
            .map(|h| h.into_iter().map(|c| c.trim().to_string()).collect())
            .unwrap_or_default();
        Ok(Self { headers, records: rows.collect() })
    }

    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cell at (`record`, `column`). Short records read as missing cells.
    pub fn cell(&self, record: usize, column: usize) -> Option<&str> {
        self.records.get(record)?.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

struct Reader<'a> {
    input: &'a str,
    line: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, line: 1 }
    }

    fn rows(&mut self) -> Result<Vec<Vec<String>>> {
        let mut rows = Vec::new();
        let mut row = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut quoted_line = 0;
        let mut chars = self.input.chars().peekable();

        while let Some(c) = chars.next() {
            if in_quotes {
                match c {
                    QUOTE if chars.peek() == Some(&QUOTE) => {
                        chars.next();
                        field.push(QUOTE);
                    }
                    QUOTE => in_quotes = false,
                    '\n' => {
                        self.line += 1;
                        field.push(c);
                    }
                    _ => field.push(c),
                }
                continue;
            }

            match c {
                QUOTE if field.is_empty() => {
                    in_quotes = true;
                    quoted_line = self.line;
                }
                SEPARATOR => row.push(std::mem::take(&mut field)),
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' => {
                    self.line += 1;
                    end_row(&mut rows, &mut row, &mut field);
                }
                _ => field.push(c),
            }
        }

        if in_quotes {
            return Err(Error::Csv {
                line: quoted_line,
                message: "unterminated quoted field".into(),
            });
        }
        end_row(&mut rows, &mut row, &mut field);
        Ok(rows)
    }
}

fn end_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>, field: &mut String) {
    row.push(std::mem::take(field));
    let row = std::mem::take(row);
    if !(row.len() == 1 && row[0].is_empty()) {
        rows.push(row);
    }
}
