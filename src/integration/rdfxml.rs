//! RDF/XML output for generated instance data.
//!
//! Consecutive triples with the same subject share one `rdf:Description`.
//! Predicate element names are qualified with the prefix table's acronyms
//! where a declared namespace covers them, otherwise with generated `nsN`
//! prefixes.

use std::collections::BTreeMap;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::generate::{InstanceData, Term, Triple};
use crate::model::{PrefixTable, vocab};
use crate::{Error, Result};

/// Render instance data as an RDF/XML document.
pub fn to_rdf_xml(data: &InstanceData, prefixes: &PrefixTable) -> Result<String> {
    let mut namespaces = Namespaces::new(prefixes);
    let qnames = data
        .triples
        .iter()
        .map(|t| namespaces.qname(&t.predicate))
        .collect::<Result<Vec<_>>>()?;

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("rdf:RDF");
    for (acronym, uri) in &namespaces.bound {
        root.push_attribute((format!("xmlns:{acronym}").as_str(), uri.as_str()));
    }
    writer.write_event(Event::Start(root))?;

    let mut current: Option<&Term> = None;
    for (triple, qname) in data.triples.iter().zip(&qnames) {
        if current != Some(&triple.subject) {
            if current.is_some() {
                writer.write_event(Event::End(BytesEnd::new("rdf:Description")))?;
            }
            writer.write_event(Event::Start(description(&triple.subject)))?;
            current = Some(&triple.subject);
        }
        write_property(&mut writer, triple, qname)?;
    }
    if current.is_some() {
        writer.write_event(Event::End(BytesEnd::new("rdf:Description")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("rdf:RDF")))?;

    let mut out = String::from_utf8_lossy(&writer.into_inner()).into_owned();
    out.push('\n');
    Ok(out)
}

fn description(subject: &Term) -> BytesStart<'static> {
    let mut start = BytesStart::new("rdf:Description");
    match subject {
        Term::Blank(id) => start.push_attribute(("rdf:nodeID", id.as_str())),
        Term::Iri(iri) => start.push_attribute(("rdf:about", iri.as_str())),
        Term::Literal { lexical, .. } => start.push_attribute(("rdf:about", lexical.as_str())),
    }
    start
}

fn write_property(writer: &mut Writer<Vec<u8>>, triple: &Triple, qname: &str) -> Result<()> {
    let mut start = BytesStart::new(qname);
    match &triple.object {
        Term::Iri(iri) => {
            start.push_attribute(("rdf:resource", iri.as_str()));
            writer.write_event(Event::Empty(start))?;
        }
        Term::Blank(id) => {
            start.push_attribute(("rdf:nodeID", id.as_str()));
            writer.write_event(Event::Empty(start))?;
        }
        Term::Literal { lexical, datatype, language } => {
            if let Some(lang) = language {
                start.push_attribute(("xml:lang", lang.as_str()));
            } else if let Some(dt) = datatype {
                start.push_attribute(("rdf:datatype", dt.as_str()));
            }
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(lexical)))?;
            writer.write_event(Event::End(BytesEnd::new(qname)))?;
        }
    }
    Ok(())
}

/// Namespace bindings collected while naming predicates.
struct Namespaces<'p> {
    prefixes: &'p PrefixTable,
    bound: BTreeMap<String, String>,
    generated: usize,
}

impl<'p> Namespaces<'p> {
    fn new(prefixes: &'p PrefixTable) -> Self {
        let mut bound = BTreeMap::new();
        bound.insert("rdf".to_string(), vocab::RDF_NS.to_string());
        Self { prefixes, bound, generated: 0 }
    }

    /// `acronym:local` element name for a predicate IRI, binding its
    /// namespace on first use.
    fn qname(&mut self, iri: &str) -> Result<String> {
        let prefixes = self.prefixes;
        if let Some((acronym, local)) = prefixes.compact(iri) {
            if is_ncname(acronym) && is_ncname(local) && self.bind(acronym, &iri[..iri.len() - local.len()]) {
                return Ok(format!("{acronym}:{local}"));
            }
        }

        let split = iri.rfind(['#', '/']).map(|i| i + 1).unwrap_or(0);
        let (namespace, local) = iri.split_at(split);
        if namespace.is_empty() || !is_ncname(local) {
            return Err(Error::InvalidContainer(format!(
                "predicate <{iri}> cannot be written as an RDF/XML element name"
            )));
        }
        if let Some((acronym, _)) = self.bound.iter().find(|(_, uri)| *uri == namespace) {
            return Ok(format!("{acronym}:{local}"));
        }
        let acronym = loop {
            self.generated += 1;
            let candidate = format!("ns{}", self.generated);
            if !self.bound.contains_key(&candidate) && !self.prefixes.contains(&candidate) {
                break candidate;
            }
        };
        self.bound.insert(acronym.clone(), namespace.to_string());
        Ok(format!("{acronym}:{local}"))
    }

    /// Bind `acronym` to `uri`. False if it is already bound elsewhere.
    fn bind(&mut self, acronym: &str, uri: &str) -> bool {
        if acronym.eq_ignore_ascii_case("xml") {
            return false;
        }
        match self.bound.get(acronym) {
            Some(existing) => existing == uri,
            None => {
                self.bound.insert(acronym.to_string(), uri.to_string());
                true
            }
        }
    }
}

/// XML name without a colon (letters, digits, `_`, `-`, `.`; not starting
/// with a digit, `-` or `.`).
fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(s: &str) -> Term {
        Term::Iri(s.to_string())
    }

    #[test]
    fn test_descriptions_grouped_by_subject() {
        let data = InstanceData {
            triples: vec![
                Triple::new(iri("http://example.org/ada"), "http://example.org/knows", iri("http://example.org/alan")),
                Triple::new(
                    iri("http://example.org/ada"),
                    "http://example.org/age",
                    Term::Literal {
                        lexical: "36".into(),
                        datatype: Some(format!("{}integer", vocab::XSD_NS)),
                        language: None,
                    },
                ),
                Triple::new(Term::Blank("a1".into()), "http://other.org/vocab#note", Term::plain("x < y")),
            ],
            skipped: Vec::new(),
        };
        let prefixes: PrefixTable = [("ex", "http://example.org/")].into_iter().collect();
        let xml = to_rdf_xml(&data, &prefixes).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"), "{xml}");
        assert!(xml.contains("xmlns:ex=\"http://example.org/\""), "{xml}");
        assert!(xml.contains("xmlns:ns1=\"http://other.org/vocab#\""), "{xml}");
        assert_eq!(xml.matches("<rdf:Description").count(), 2);
        assert!(xml.contains("<rdf:Description rdf:about=\"http://example.org/ada\">"));
        assert!(xml.contains("<ex:knows rdf:resource=\"http://example.org/alan\"/>"), "{xml}");
        assert!(xml.contains("<ex:age rdf:datatype=\"http://www.w3.org/2001/XMLSchema#integer\">36</ex:age>"), "{xml}");
        assert!(xml.contains("<rdf:Description rdf:nodeID=\"a1\">"));
        assert!(xml.contains("<ns1:note>x &lt; y</ns1:note>"), "{xml}");
    }

    #[test]
    fn test_unnameable_predicate() {
        let data = InstanceData {
            triples: vec![Triple::new(iri("http://x/s"), "http://x/1bad", Term::plain("v"))],
            skipped: Vec::new(),
        };
        assert!(matches!(to_rdf_xml(&data, &PrefixTable::new()), Err(Error::InvalidContainer(_))));
    }

    #[test]
    fn test_ncname() {
        assert!(is_ncname("hasName"));
        assert!(is_ncname("_x-1.2"));
        assert!(!is_ncname("1st"));
        assert!(!is_ncname(""));
        assert!(!is_ncname("a:b"));
    }
}
