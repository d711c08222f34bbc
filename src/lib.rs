//! # ontograph — Ontology Diagram Engine
//!
//! The non-visual core of an ontology diagram editor: a conceptual graph of
//! classes, literals and property arrows, with everything needed to store
//! it and turn it into RDF.
//!
//! ## Design Principles
//!
//! 1. **The graph owns everything**: vertices and edges live in
//!    [`OntologyGraph`]; edges refer to vertices by id, never by pointer
//! 2. **Geometry is a capability**: anchoring and hit-testing go through the
//!    [`Shape`] trait, implemented per boundary kind
//! 3. **Sessions, not statics**: every counter (blank nodes, indent depth)
//!    lives in the graph or in a per-call writer, so passes are reentrant
//! 4. **Errors are per element**: a bad record, vertex or row never spoils
//!    what was already produced
//!
//! ## Quick Start
//!
//! ```rust
//! use ontograph::geometry::{Ellipse, Point, Rect};
//! use ontograph::{OntologyGraph, PrefixTable, TurtleConfig};
//!
//! # fn example() -> ontograph::Result<()> {
//! let mut graph = OntologyGraph::default();
//! let person = graph.add_class("ex:Person", Ellipse::new(Point::new(100.0, 100.0), 60.0, 30.0), false)?;
//! let name = graph.add_literal("name", Rect::new(Point::new(300.0, 90.0), 80.0, 20.0))?;
//! graph.connect(person, name, "ex:hasName", Point::new(300.0, 100.0))?;
//!
//! let mut prefixes = PrefixTable::with_standard_vocabularies();
//! prefixes.declare("ex", "http://example.org/");
//!
//! let ttl = ontograph::convert_to_turtle(&graph, &prefixes, &TurtleConfig::ontology());
//! assert!(ttl.contains("ex:Person a owl:Class ;"));
//!
//! let project = ontograph::encode_graph(&graph);
//! let reloaded = ontograph::decode_graph(&project)?;
//! assert!(reloaded.is_clean());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Outputs
//!
//! | Output | Module | Description |
//! |--------|--------|-------------|
//! | GAT | [`gat`] | Reloadable project file |
//! | Turtle | [`turtle`] | Ontology-level RDF |
//! | Instance Turtle | [`integration`] | Per-CSV-row triples, full IRIs |
//! | RDF/XML | [`integration`] | Per-CSV-row triples (feature `rdf-xml`) |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod geometry;
pub mod gat;
pub mod turtle;
pub mod integration;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Canvas, Correlation, Edge, EdgeId, EdgeRoute, LiteralForm, OntologyGraph,
    PrefixTable, Vertex, VertexId, VertexKind,
};

pub use geometry::{Boundary, Point, Shape};

// ============================================================================
// Re-exports: Codec, Turtle, Integration
// ============================================================================

pub use gat::{Decoded, RecordError};
pub use turtle::{Diagnostics, TurtleConfig};
pub use integration::{
    CorrelationReport, CsvTable, GenerationConfig, InstanceData, MissingPrefixPolicy,
    Term, Triple,
};

// ============================================================================
// Collaborator interface
// ============================================================================

/// Encode a graph as a GAT document.
pub fn encode_graph(graph: &OntologyGraph) -> String {
    gat::encode(graph)
}

/// Decode a GAT document. Per-record failures are listed in the result.
pub fn decode_graph(text: &str) -> Result<Decoded> {
    gat::decode(text)
}

/// Render a graph as a Turtle document.
pub fn convert_to_turtle(graph: &OntologyGraph, prefixes: &PrefixTable, config: &TurtleConfig) -> String {
    turtle::convert(graph, prefixes, config)
}

/// Match CSV headers against the graph's correlatable vertices.
pub fn correlate(graph: &OntologyGraph, headers: &[String]) -> CorrelationReport {
    integration::correlate(graph, headers)
}

/// Generate instance triples for every CSV record.
pub fn generate_instance_data(
    graph: &OntologyGraph,
    prefixes: &PrefixTable,
    table: &CsvTable,
    correlations: &CorrelationReport,
    config: &GenerationConfig,
) -> Result<InstanceData> {
    integration::generate(graph, prefixes, table, correlations, config)
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    #[error("Cannot classify '{name}': {reason}")]
    UnclassifiableElement { name: String, reason: String },

    #[error("Edge '{edge}' has no vertex at ({x}, {y})")]
    MissingEndpoint { edge: String, x: f64, y: f64 },

    #[error("Prefix '{0}' is not declared")]
    MissingPrefix(String),

    #[error("CSV error on line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "rdf-xml")]
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
