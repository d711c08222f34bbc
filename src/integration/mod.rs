//! # Data integration
//!
//! CSV columns are correlated with graph vertices, then every CSV record
//! is turned into instance-level triples.
//!
//! ```text
//! CsvTable ──correlate──▶ CorrelationReport ──(manual submit)──▶ generate ──▶ InstanceData
//!                                                                              │
//!                                                      to_turtle / to_rdf_xml ◀┘
//! ```

pub mod correlate;
pub mod csv;
pub mod generate;
#[cfg(feature = "rdf-xml")]
pub mod rdfxml;

pub use correlate::{CorrelationReport, correlate, is_correlatable};
pub use csv::CsvTable;
pub use generate::{
    GenerationConfig, InstanceData, MissingPrefixPolicy, Skipped, Term, Triple, expand_name, generate,
};
#[cfg(feature = "rdf-xml")]
pub use rdfxml::to_rdf_xml;
