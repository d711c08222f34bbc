//! # Turtle converter
//!
//! Renders an [`OntologyGraph`] as an RDF Turtle document:
//!
//! 1. diagnostics comment block (only when non-empty)
//! 2. `@prefix` declarations
//! 3. in ontology mode, property declarations and section banners
//! 4. one block per class vertex
//!
//! Output is deterministic: the same graph, prefixes and config always
//! produce byte-identical text.

pub mod diagnostics;
pub mod terms;
mod writer;

use serde::{Deserialize, Serialize};

pub use diagnostics::Diagnostics;
pub use writer::MAX_INLINE_DEPTH;

use crate::model::{OntologyGraph, PrefixTable};
use writer::TurtleWriter;

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleConfig {
    /// Render multi-valued predicates as `( o1 o2 )` instead of a comma list.
    pub collection_syntax: bool,
    /// Render blank-node objects inline as `[ ... ]`.
    pub inline_blank_nodes: bool,
    /// Emit class/property declarations, labels, comments and banners.
    pub ontology_mode: bool,
}

impl TurtleConfig {
    pub fn ontology() -> Self {
        Self { ontology_mode: true, ..Self::default() }
    }
}

/// Convert a graph to a Turtle document.
pub fn convert(graph: &OntologyGraph, prefixes: &PrefixTable, config: &TurtleConfig) -> String {
    let mut writer = TurtleWriter::new(graph, config);
    let body = writer.write_body();
    let diagnostics = Diagnostics::collect(graph, prefixes, writer.emitted_acronyms());

    let mut out = String::new();
    if !diagnostics.is_empty() {
        out.push_str(&diagnostics.render());
        out.push('\n');
    }
    if !prefixes.is_empty() {
        for (acronym, uri) in prefixes.iter() {
            out.push_str(&format!("@prefix {acronym}: <{uri}> .\n"));
        }
        out.push('\n');
    }
    out.push_str(&body);

    tracing::debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        bytes = out.len(),
        "converted graph to Turtle"
    );
    out
}
