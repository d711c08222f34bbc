//! Instance data generation: one set of triples per CSV record.
//!
//! For every record, every class vertex becomes a subject. Its IRI is the
//! vertex's namespace plus the correlated cell (or the vertex's own local
//! name when uncorrelated), blank nodes get a per-record suffix, and each
//! ordinary outgoing edge becomes one triple.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::correlate::CorrelationReport;
use super::csv::CsvTable;
use crate::model::literal::{self, LiteralForm};
use crate::model::prefix::{local_name, split_prefixed};
use crate::model::vertex::bare_iri;
use crate::model::{OntologyGraph, PrefixTable, Vertex, VertexId, VertexKind, vocab};
use crate::turtle::terms::quote;
use crate::{Error, Result};

// ============================================================================
// Terms and triples
// ============================================================================

/// An RDF term with every name fully expanded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal {
        lexical: String,
        /// Full datatype IRI; `None` for plain and language-tagged strings.
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl Term {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Term::Literal { lexical: lexical.into(), datatype: None, language: None }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }
}

impl fmt::Display for Term {
    /// N-Triples compatible rendering. String-typed literals are quoted,
    /// numeric and boolean ones are bare when their text is a valid
    /// lexical form, anything else carries a `^^<datatype>` suffix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Blank(id) => write!(f, "_:{id}"),
            Term::Literal { lexical, language: Some(lang), .. } => write!(f, "{}@{lang}", quote(lexical)),
            Term::Literal { lexical, datatype, .. } => match datatype.as_deref() {
                dt if vocab::is_string_datatype(dt) => f.write_str(&quote(lexical)),
                Some(dt) if vocab::is_bare_datatype(dt) && is_bare_lexical(lexical, dt) => f.write_str(lexical),
                Some(dt) => write!(f, "{}^^<{dt}>", quote(lexical)),
                None => f.write_str(&quote(lexical)),
            },
        }
    }
}

fn is_bare_lexical(lexical: &str, datatype: &str) -> bool {
    match (vocab::xsd_local_name(datatype), literal::classify(lexical)) {
        (Some("boolean"), form) => form == Some(LiteralForm::Boolean),
        (_, Some(LiteralForm::Integer | LiteralForm::Decimal | LiteralForm::Double)) => true,
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    /// Full predicate IRI.
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self { subject, predicate: predicate.into(), object }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

// ============================================================================
// Configuration and output
// ============================================================================

/// What to do when a vertex or predicate uses an undeclared prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPrefixPolicy {
    /// Stop generation and return the error.
    #[default]
    Abort,
    /// Drop the vertex's triples for that record and carry on.
    SkipVertex,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub on_missing_prefix: MissingPrefixPolicy,
}

/// A vertex whose triples were dropped for one record.
#[derive(Debug)]
pub struct Skipped {
    /// 1-based record number.
    pub record: usize,
    pub vertex: VertexId,
    pub error: Error,
}

/// Generated instance triples, in record order.
#[derive(Debug, Default)]
pub struct InstanceData {
    pub triples: Vec<Triple>,
    pub skipped: Vec<Skipped>,
}

impl InstanceData {
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// One full-IRI triple per line.
    pub fn to_turtle(&self) -> String {
        let mut out = String::new();
        for t in &self.triples {
            out.push_str(&t.to_string());
            out.push('\n');
        }
        out
    }
}

// ============================================================================
// Generation
// ============================================================================

/// Generate instance triples for every record of `table`.
pub fn generate(
    graph: &OntologyGraph,
    prefixes: &PrefixTable,
    table: &CsvTable,
    correlations: &CorrelationReport,
    config: &GenerationConfig,
) -> Result<InstanceData> {
    let mut data = InstanceData::default();

    for index in 0..table.len() {
        let row = Row { graph, prefixes, table, correlations, index, number: index + 1 };
        for v in graph.classes() {
            match row.vertex_triples(v) {
                Ok(triples) => data.triples.extend(triples),
                Err(error @ Error::MissingPrefix(_))
                    if config.on_missing_prefix == MissingPrefixPolicy::SkipVertex =>
                {
                    tracing::warn!(record = row.number, vertex = v.name(), %error, "skipping vertex");
                    data.skipped.push(Skipped { record: row.number, vertex: v.id(), error });
                }
                Err(error) => return Err(error),
            }
        }
    }

    tracing::debug!(
        records = table.len(),
        triples = data.triples.len(),
        skipped = data.skipped.len(),
        "generated instance data"
    );
    Ok(data)
}

/// Per-record generation context.
struct Row<'a> {
    graph: &'a OntologyGraph,
    prefixes: &'a PrefixTable,
    table: &'a CsvTable,
    correlations: &'a CorrelationReport,
    index: usize,
    /// 1-based record counter used to disambiguate blank nodes.
    number: usize,
}

impl Row<'_> {
    /// All triples of one class vertex, or the first error.
    fn vertex_triples(&self, v: &Vertex) -> Result<Vec<Triple>> {
        let subject = self.node(v)?;
        let mut triples = Vec::new();

        if let Some(ty) = v.type_definition() {
            let object = match ty.strip_prefix("_:") {
                Some(id) => Term::Blank(format!("{id}{}", self.number)),
                None => Term::Iri(expand_name(self.prefixes, ty)?),
            };
            triples.push(Triple::new(subject.clone(), vocab::RDF_TYPE_IRI, object));
        }
        if let Some(label) = v.rdfs_label() {
            triples.push(Triple::new(subject.clone(), vocab::RDFS_LABEL_IRI, self.global_literal(label)?));
        }
        if let Some(comment) = v.rdfs_comment() {
            triples.push(Triple::new(subject.clone(), vocab::RDFS_COMMENT_IRI, self.global_literal(comment)?));
        }

        for e in self.graph.outgoing(v.id()) {
            let predicate = if e.is_iri() {
                bare_iri(e.name()).to_string()
            } else {
                expand_name(self.prefixes, e.name())?
            };
            let object = self.graph.require(e.object())?;
            triples.push(Triple::new(subject.clone(), predicate, self.node(object)?));
        }
        Ok(triples)
    }

    /// The correlated, non-blank cell value for `v` in this record.
    fn cell(&self, v: &Vertex) -> Option<&str> {
        let c = self.correlations.for_vertex(v.id())?;
        self.table
            .cell(self.index, c.column)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn node(&self, v: &Vertex) -> Result<Term> {
        if v.is_iri() {
            return Ok(Term::Iri(bare_iri(v.name()).to_string()));
        }
        if let Some(id) = v.blank_id() {
            return Ok(Term::Blank(format!("{id}{}", self.number)));
        }
        match v.kind() {
            VertexKind::GlobalClass | VertexKind::InstanceClass => {
                let (acronym, local) = split_prefixed(v.name());
                let namespace = self
                    .prefixes
                    .get(acronym)
                    .ok_or_else(|| Error::MissingPrefix(acronym.to_string()))?;
                let value = self.cell(v).unwrap_or(local);
                Ok(Term::Iri(format!("{namespace}{}", encode_iri_part(value))))
            }
            VertexKind::GlobalLiteral => self.global_literal(v.name()),
            VertexKind::InstanceLiteral => {
                let lexical = self.cell(v).unwrap_or(v.name()).to_string();
                let datatype = match v.datatype() {
                    Some(dt) => Some(expand_name(self.prefixes, dt)?),
                    None => None,
                };
                Ok(Term::Literal { lexical, datatype, language: None })
            }
        }
    }

    fn global_literal(&self, text: &str) -> Result<Term> {
        let lexical = literal::lexical_value(text).into_owned();
        let (datatype, language) = match literal::classify(text) {
            Some(LiteralForm::LangString(lang)) => (None, Some(lang)),
            Some(LiteralForm::String) | None => (None, None),
            Some(form) => (Some(expand_name(self.prefixes, form.datatype())?), None),
        };
        Ok(Term::Literal { lexical, datatype, language })
    }
}

/// Full IRI of a prefixed name or `<iri>`. Built-in vocabularies resolve
/// even when the table does not declare them.
pub fn expand_name(prefixes: &PrefixTable, name: &str) -> Result<String> {
    if let Some(bare) = name.strip_prefix('<').and_then(|n| n.strip_suffix('>')) {
        return Ok(bare.to_string());
    }
    match prefixes.expand(name) {
        Err(Error::MissingPrefix(acronym)) => match vocab::standard_namespace(&acronym) {
            Some(ns) => Ok(format!("{ns}{}", local_name(name))),
            None => Err(Error::MissingPrefix(acronym)),
        },
        other => other,
    }
}

/// Percent-encode characters that may not appear in an IRI.
fn encode_iri_part(value: &str) -> Cow<'_, str> {
    let unsafe_char = |c: char| c.is_whitespace() || c.is_control() || "<>\"{}|\\^`%".contains(c);
    if !value.contains(unsafe_char) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    let mut buf = [0u8; 4];
    for c in value.chars() {
        if unsafe_char(c) {
            for b in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{b:02X}"));
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Ellipse, Point, Rect};
    use crate::integration::correlate::correlate;

    fn prefixes() -> PrefixTable {
        [("ex", "http://example.org/")].into_iter().collect()
    }

    fn ellipse(x: f64) -> Ellipse {
        Ellipse::new(Point::new(x, 100.0), 40.0, 20.0)
    }

    fn rect(x: f64) -> Rect {
        Rect::new(Point::new(x, 300.0), 60.0, 20.0)
    }

    #[test]
    fn test_term_rendering() {
        let xsd = |l: &str| Some(format!("{}{l}", vocab::XSD_NS));
        let lit = |lexical: &str, datatype: Option<String>| Term::Literal {
            lexical: lexical.into(),
            datatype,
            language: None,
        };
        assert_eq!(lit("Ada", None).to_string(), "\"Ada\"");
        assert_eq!(lit("Ada", xsd("string")).to_string(), "\"Ada\"");
        assert_eq!(lit("36", xsd("integer")).to_string(), "36");
        assert_eq!(lit("true", xsd("boolean")).to_string(), "true");
        assert_eq!(lit("yes", xsd("boolean")).to_string(), format!("\"yes\"^^<{}boolean>", vocab::XSD_NS));
        assert_eq!(lit("2024-01-01", xsd("date")).to_string(), format!("\"2024-01-01\"^^<{}date>", vocab::XSD_NS));
        let lang = Term::Literal { lexical: "hi".into(), datatype: None, language: Some("en".into()) };
        assert_eq!(lang.to_string(), "\"hi\"@en");
        assert_eq!(Term::Blank("a1".into()).to_string(), "_:a1");
    }

    #[test]
    fn test_generate_rows() {
        let mut g = OntologyGraph::default();
        let person = g.add_class("ex:person", ellipse(100.0), true).unwrap();
        let name = g.add_literal("name", rect(100.0)).unwrap();
        let class = g.add_class("ex:Person", ellipse(300.0), false).unwrap();
        g.connect(person, name, "ex:hasName", Point::new(130.0, 310.0)).unwrap();
        g.connect(person, class, "a", Point::new(300.0, 100.0)).unwrap();

        let table = CsvTable::parse("person,name\nada,Ada Lovelace\n").unwrap();
        let report = correlate(&g, &table.headers);
        let data = generate(&g, &prefixes(), &table, &report, &GenerationConfig::default()).unwrap();

        assert_eq!(
            data.to_turtle(),
            "<http://example.org/ada> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Person> .\n\
             <http://example.org/ada> <http://example.org/hasName> \"Ada Lovelace\" .\n"
        );
    }

    #[test]
    fn test_blank_suffix_per_record() {
        let mut g = OntologyGraph::default();
        let b = g.add_class("_addr", ellipse(100.0), false).unwrap();
        let lit = g.add_literal("\"x\"", rect(100.0)).unwrap();
        g.connect(b, lit, "ex:p", Point::new(130.0, 310.0)).unwrap();

        let table = CsvTable::parse("h\n1\n2\n").unwrap();
        let data = generate(&g, &prefixes(), &table, &CorrelationReport::default(), &GenerationConfig::default()).unwrap();
        let subjects: Vec<_> = data.triples.iter().map(|t| t.subject.to_string()).collect();
        assert_eq!(subjects, vec!["_:a1", "_:a2"]);
    }

    #[test]
    fn test_blank_type_object() {
        let mut g = OntologyGraph::default();
        let thing = g.add_class("ex:Thing", ellipse(100.0), false).unwrap();
        let ty = g.add_class("_t", ellipse(300.0), false).unwrap();
        g.connect(thing, ty, "rdf:type", Point::new(300.0, 100.0)).unwrap();

        let table = CsvTable::parse("h\n1\n").unwrap();
        let data = generate(&g, &prefixes(), &table, &CorrelationReport::default(), &GenerationConfig::default()).unwrap();
        assert_eq!(
            data.to_turtle(),
            "<http://example.org/Thing> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> _:a1 .\n"
        );
    }

    #[test]
    fn test_escaped_global_literal_is_quoted_once() {
        let mut g = OntologyGraph::default();
        let s = g.add_class("ex:s", ellipse(100.0), false).unwrap();
        let lit = g.add_literal(r#""say \"hi\"""#, rect(100.0)).unwrap();
        g.connect(s, lit, "ex:p", Point::new(130.0, 310.0)).unwrap();

        let table = CsvTable::parse("h\n1\n").unwrap();
        let data = generate(&g, &prefixes(), &table, &CorrelationReport::default(), &GenerationConfig::default()).unwrap();
        assert_eq!(data.triples[0].object, Term::plain(r#"say "hi""#));
        assert_eq!(
            data.to_turtle(),
            "<http://example.org/s> <http://example.org/p> \"say \\\"hi\\\"\" .\n"
        );
    }

    #[test]
    fn test_missing_prefix() {
        let mut g = OntologyGraph::default();
        g.add_class("foo:Bar", ellipse(100.0), false).unwrap();
        let table = CsvTable::parse("h\n1\n").unwrap();

        let err = generate(&g, &prefixes(), &table, &CorrelationReport::default(), &GenerationConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::MissingPrefix(ref a) if a == "foo"), "{err:?}");

        let config = GenerationConfig { on_missing_prefix: MissingPrefixPolicy::SkipVertex };
        let data = generate(&g, &prefixes(), &table, &CorrelationReport::default(), &config).unwrap();
        assert!(data.is_empty());
        assert_eq!(data.skipped.len(), 1);
        assert_eq!(data.skipped[0].record, 1);
    }

    #[test]
    fn test_uncorrelated_falls_back_to_local_name() {
        let mut g = OntologyGraph::default();
        let a = g.add_class("ex:Thing", ellipse(100.0), false).unwrap();
        g.set_label(a, Some("\"Thing\"@en".into())).unwrap();
        let table = CsvTable::parse("h\n1\n").unwrap();
        let data = generate(&g, &prefixes(), &table, &CorrelationReport::default(), &GenerationConfig::default()).unwrap();
        assert_eq!(
            data.to_turtle(),
            "<http://example.org/Thing> <http://www.w3.org/2000/01/rdf-schema#label> \"Thing\"@en .\n"
        );
    }

    #[test]
    fn test_cell_values_are_iri_safe() {
        assert_eq!(encode_iri_part("Ada Lovelace"), "Ada%20Lovelace");
        assert_eq!(encode_iri_part("plain"), "plain");
        assert_eq!(encode_iri_part("a<b>"), "a%3Cb%3E");
    }

    #[test]
    fn test_expand_name_builtin_fallback() {
        let p = prefixes();
        assert_eq!(expand_name(&p, "xsd:int").unwrap(), format!("{}int", vocab::XSD_NS));
        assert_eq!(expand_name(&p, "<http://x/y>").unwrap(), "http://x/y");
        assert!(matches!(expand_name(&p, "nope:x"), Err(Error::MissingPrefix(_))));
    }
}
