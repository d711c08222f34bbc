//! Edge — a directed, named property arrow.

use serde::{Deserialize, Serialize};

use super::VertexId;
use super::vertex::{iri_form, is_type_definition};
use crate::geometry::{Ellipse, Point};
use crate::{Error, Result};

/// Opaque edge identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the arrow is drawn. Only affects persistence, never semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "route")]
pub enum EdgeRoute {
    /// Straight arrow from the subject's center to the object's anchor point.
    Straight {
        start: Point,
        end: Point,
        /// Label position along the arrow, kept for deterministic re-encoding.
        anchor: f64,
    },
    /// Curved loop back into the same vertex.
    Loop { arc: Ellipse, label: Point },
}

/// Default label position along a straight arrow.
pub const DEFAULT_LABEL_ANCHOR: f64 = 0.5;

/// A directed property arrow. Subject and object are ids into the owning graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub(crate) id: EdgeId,
    pub(crate) name: String,
    pub(crate) subject: VertexId,
    pub(crate) object: VertexId,
    pub(crate) is_iri: bool,
    pub(crate) route: EdgeRoute,
}

impl Edge {
    pub(crate) fn new(
        id: EdgeId,
        predicate: &str,
        subject: VertexId,
        object: VertexId,
        route: EdgeRoute,
    ) -> Result<Self> {
        let predicate = predicate.trim();
        if predicate.is_empty() {
            return Err(Error::UnclassifiableElement {
                name: predicate.to_string(),
                reason: "predicate name is empty".into(),
            });
        }
        let iri = iri_form(predicate);
        Ok(Self {
            id,
            is_iri: iri.is_some(),
            name: iri.unwrap_or_else(|| predicate.to_string()),
            subject,
            object,
            route,
        })
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Predicate name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subject(&self) -> VertexId {
        self.subject
    }

    pub fn object(&self) -> VertexId {
        self.object
    }

    pub fn is_iri(&self) -> bool {
        self.is_iri
    }

    pub fn route(&self) -> &EdgeRoute {
        &self.route
    }

    pub fn is_self_referential(&self) -> bool {
        self.subject == self.object
    }

    /// `a`, `rdf:type` or the full type IRI.
    pub fn is_type_definition(&self) -> bool {
        is_type_definition(&self.name)
    }
}
