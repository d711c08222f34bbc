//! Prefix table: acronym → namespace URI.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::vocab;
use crate::{Error, Result};

/// Mapping from short acronym to full namespace URI.
///
/// Acronyms are unique; iteration is ordered by acronym so that every
/// rendering of the same table is byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixTable {
    entries: BTreeMap<String, String>,
}

impl PrefixTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-populated with `rdf`, `rdfs`, `owl` and `xsd`.
    pub fn with_standard_vocabularies() -> Self {
        let mut table = Self::new();
        table.declare("rdf", vocab::RDF_NS);
        table.declare("rdfs", vocab::RDFS_NS);
        table.declare("owl", vocab::OWL_NS);
        table.declare("xsd", vocab::XSD_NS);
        table
    }

    /// Load a JSON object of `{"acronym": "uri", ...}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Declare (or redeclare) an acronym. Returns the previous URI, if any.
    pub fn declare(&mut self, acronym: impl Into<String>, uri: impl Into<String>) -> Option<String> {
        self.entries.insert(acronym.into(), uri.into())
    }

    pub fn remove(&mut self, acronym: &str) -> Option<String> {
        self.entries.remove(acronym)
    }

    pub fn get(&self, acronym: &str) -> Option<&str> {
        self.entries.get(acronym).map(String::as_str)
    }

    pub fn contains(&self, acronym: &str) -> bool {
        self.entries.contains_key(acronym)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn acronyms(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Expand `acronym:local` to the full IRI (without angle brackets).
    ///
    /// A name without a colon uses the empty acronym, as `:local` would.
    pub fn expand(&self, name: &str) -> Result<String> {
        let (acronym, local) = split_prefixed(name);
        let uri = self
            .get(acronym)
            .ok_or_else(|| Error::MissingPrefix(acronym.to_string()))?;
        Ok(format!("{uri}{local}"))
    }

    /// Longest declared namespace that `iri` starts with, as `(acronym, local)`.
    pub fn compact<'a>(&'a self, iri: &'a str) -> Option<(&'a str, &'a str)> {
        self.iter()
            .filter(|(_, uri)| !uri.is_empty() && iri.starts_with(uri))
            .max_by_key(|(_, uri)| uri.len())
            .map(|(acronym, uri)| (acronym, &iri[uri.len()..]))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PrefixTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Split a prefixed name at its first colon. No colon → empty acronym.
pub fn split_prefixed(name: &str) -> (&str, &str) {
    name.split_once(':').unwrap_or(("", name))
}

/// The acronym of a prefixed name, if it has a colon.
pub fn acronym_of(name: &str) -> Option<&str> {
    name.split_once(':').map(|(acronym, _)| acronym)
}

/// Local part of a prefixed name (everything after the first colon).
pub fn local_name(name: &str) -> &str {
    split_prefixed(name).1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand() {
        let mut t = PrefixTable::new();
        t.declare("ex", "http://example.org/");
        assert_eq!(t.expand("ex:Person").unwrap(), "http://example.org/Person");
    }

    #[test]
    fn test_expand_missing_reports_acronym() {
        let t = PrefixTable::new();
        match t.expand("foo:Bar") {
            Err(Error::MissingPrefix(a)) => assert_eq!(a, "foo"),
            other => panic!("expected MissingPrefix, got {other:?}"),
        }
        assert!(matches!(t.expand("Bar"), Err(Error::MissingPrefix(a)) if a.is_empty()));
    }

    #[test]
    fn test_redeclare_replaces() {
        let mut t = PrefixTable::new();
        assert!(t.declare("ex", "http://a/").is_none());
        assert_eq!(t.declare("ex", "http://b/").as_deref(), Some("http://a/"));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_from_json() {
        let t = PrefixTable::from_json(r#"{"ex": "http://example.org/", "foaf": "http://xmlns.com/foaf/0.1/"}"#)
            .unwrap();
        assert_eq!(t.acronyms().collect::<Vec<_>>(), vec!["ex", "foaf"]);
        assert!(PrefixTable::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_compact_prefers_longest_namespace() {
        let t: PrefixTable = [("ex", "http://example.org/"), ("exv", "http://example.org/vocab#")]
            .into_iter()
            .collect();
        assert_eq!(t.compact("http://example.org/vocab#name"), Some(("exv", "name")));
        assert_eq!(t.compact("http://other.org/x"), None);
    }

    #[test]
    fn test_name_helpers() {
        assert_eq!(acronym_of("ex:name"), Some("ex"));
        assert_eq!(acronym_of("name"), None);
        assert_eq!(local_name("ex:name"), "name");
        assert_eq!(local_name("name"), "name");
    }
}
