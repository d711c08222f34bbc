//! Reminder and warning block written at the top of a Turtle document.

use std::collections::BTreeSet;

use super::terms::term_acronym;
use crate::model::{OntologyGraph, PrefixTable, VertexKind};

/// Everything the user should look at before publishing the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Generated blank-node identifiers currently in use.
    pub blank_nodes: Vec<String>,
    /// Instance-literal placeholders filled during instance generation.
    pub instance_literals: Vec<String>,
    /// Acronyms used by the document but missing from the prefix table.
    pub undeclared_prefixes: BTreeSet<String>,
    /// Declared acronyms the document never uses.
    pub unused_prefixes: BTreeSet<String>,
}

impl Diagnostics {
    /// Collect diagnostics. `emitted` holds acronyms the writer produced
    /// beyond the graph's own class and property names (vocabulary terms,
    /// datatypes).
    pub fn collect(graph: &OntologyGraph, prefixes: &PrefixTable, emitted: &BTreeSet<String>) -> Self {
        let mut used = used_acronyms(graph);
        used.extend(emitted.iter().cloned());

        let declared: BTreeSet<String> = prefixes.acronyms().map(str::to_string).collect();

        Self {
            blank_nodes: graph
                .vertices()
                .iter()
                .filter(|v| v.is_blank())
                .map(|v| v.name().to_string())
                .collect(),
            instance_literals: graph
                .vertices()
                .iter()
                .filter(|v| v.kind() == VertexKind::InstanceLiteral)
                .map(|v| v.name().to_string())
                .collect(),
            undeclared_prefixes: used.difference(&declared).cloned().collect(),
            unused_prefixes: declared.difference(&used).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blank_nodes.is_empty()
            && self.instance_literals.is_empty()
            && self.undeclared_prefixes.is_empty()
            && self.unused_prefixes.is_empty()
    }

    /// Render as Turtle comment lines. Nothing when empty.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut line = |label: &str, items: Vec<&str>| {
            if !items.is_empty() {
                out.push_str(&format!("# {label}: {}\n", items.join(", ")));
            }
        };
        line(
            "Blank nodes with generated identifiers (rename before publishing)",
            self.blank_nodes.iter().map(String::as_str).collect(),
        );
        line(
            "Instance literal placeholders (filled during instance generation)",
            self.instance_literals.iter().map(String::as_str).collect(),
        );
        line(
            "Prefixes used but not declared",
            self.undeclared_prefixes.iter().map(String::as_str).collect(),
        );
        line(
            "Prefixes declared but not used",
            self.unused_prefixes.iter().map(String::as_str).collect(),
        );
        out
    }
}

/// Acronyms used by non-IRI class names and property names.
fn used_acronyms(graph: &OntologyGraph) -> BTreeSet<String> {
    let classes = graph
        .classes()
        .filter(|v| !v.is_blank() && !v.is_iri())
        .map(|v| v.name());
    let properties = graph.edges().iter().filter(|e| !e.is_iri()).map(|e| e.name());
    classes
        .chain(properties)
        .filter_map(term_acronym)
        .map(str::to_string)
        .collect()
}
