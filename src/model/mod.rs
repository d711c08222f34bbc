//! # Conceptual Graph Model
//!
//! The entities behind an ontology diagram: vertices (classes and
//! literals), property edges, the prefix table and CSV correlations.
//!
//! Design rule: the model knows geometry only through [`Boundary`]; it
//! never renders, never touches files, and owns all of its mutable state
//! (including the blank-node counter), so every pass over a graph is
//! reentrant.
//!
//! [`Boundary`]: crate::geometry::Boundary

pub mod blank;
pub mod correlation;
pub mod edge;
pub mod graph;
pub mod literal;
pub mod prefix;
pub mod vertex;
pub mod vocab;

pub use blank::BlankNodeCounter;
pub use correlation::Correlation;
pub use edge::{Edge, EdgeId, EdgeRoute};
pub use graph::{Canvas, OntologyGraph, VertexAttrs, CANVAS_GROWTH, CANVAS_MARGIN};
pub use literal::LiteralForm;
pub use prefix::PrefixTable;
pub use vertex::{Vertex, VertexId, VertexKind};
