//! A CSV column bound to a graph vertex.

use serde::{Deserialize, Serialize};

use super::VertexId;

/// Records that a vertex's per-row value is pulled from CSV column `column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Correlation {
    pub column: usize,
    pub header: String,
    pub vertex: VertexId,
}

impl Correlation {
    pub fn new(column: usize, header: impl Into<String>, vertex: VertexId) -> Self {
        Self { column, header: header.into(), vertex }
    }
}
