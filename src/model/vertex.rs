//! Vertex in the conceptual graph and its classification.

use serde::{Deserialize, Serialize};

use super::blank::BlankNodeCounter;
use super::edge::EdgeId;
use super::literal::{self, LiteralForm};
use super::vocab;
use crate::geometry::{Boundary, Shape};
use crate::{Error, Result};

/// Opaque vertex identifier, unique within one [`OntologyGraph`](super::OntologyGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u32);

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four vertex variants. Fixed at creation, never reclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    /// Solid ellipse: an ontology-level class.
    GlobalClass,
    /// Dashed ellipse: an instance-level node.
    InstanceClass,
    /// Rectangle whose text is an RDF literal lexical form.
    GlobalLiteral,
    /// Rectangle whose value is filled from CSV data at generation time.
    InstanceLiteral,
}

impl VertexKind {
    pub fn is_class(self) -> bool {
        matches!(self, VertexKind::GlobalClass | VertexKind::InstanceClass)
    }

    pub fn is_literal(self) -> bool {
        !self.is_class()
    }

    pub fn is_instance(self) -> bool {
        matches!(self, VertexKind::InstanceClass | VertexKind::InstanceLiteral)
    }

    /// Persisted instance-or-global flag.
    pub fn flag(self) -> char {
        if self.is_instance() { 'i' } else { 'g' }
    }

    pub fn class(instance: bool) -> Self {
        if instance { VertexKind::InstanceClass } else { VertexKind::GlobalClass }
    }

    pub fn literal(instance: bool) -> Self {
        if instance { VertexKind::InstanceLiteral } else { VertexKind::GlobalLiteral }
    }
}

/// A node in the conceptual graph.
///
/// Edge lists hold ids into the owning graph; the graph keeps them in sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub(crate) id: VertexId,
    pub(crate) name: String,
    pub(crate) kind: VertexKind,
    pub(crate) boundary: Boundary,
    pub(crate) fill: String,
    pub(crate) is_blank: bool,
    pub(crate) is_iri: bool,
    pub(crate) type_definition: Option<String>,
    pub(crate) rdfs_label: Option<String>,
    pub(crate) rdfs_comment: Option<String>,
    /// Declared datatype of a literal (`xsd:integer`, …).
    pub(crate) datatype: Option<String>,
    pub(crate) incoming: Vec<EdgeId>,
    pub(crate) outgoing: Vec<EdgeId>,
}

pub const DEFAULT_FILL: &str = "#ffffff";

impl Vertex {
    pub(crate) fn new(id: VertexId, c: Classification, boundary: Boundary) -> Self {
        let datatype = c.literal.as_ref().map(|form| form.datatype().to_string());
        Self {
            id,
            name: c.name,
            kind: c.kind,
            boundary,
            fill: DEFAULT_FILL.to_string(),
            is_blank: c.is_blank,
            is_iri: c.is_iri,
            type_definition: None,
            rdfs_label: None,
            rdfs_comment: None,
            datatype,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    /// Stored name: prefixed name, `<iri>`, `_:id` or literal text.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VertexKind {
        self.kind
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn fill(&self) -> &str {
        &self.fill
    }

    pub fn is_blank(&self) -> bool {
        self.is_blank
    }

    pub fn is_iri(&self) -> bool {
        self.is_iri
    }

    pub fn is_class(&self) -> bool {
        self.kind.is_class()
    }

    pub fn is_literal(&self) -> bool {
        self.kind.is_literal()
    }

    /// Blank-node identifier without the `_:` marker.
    pub fn blank_id(&self) -> Option<&str> {
        if self.is_blank { self.name.strip_prefix("_:") } else { None }
    }

    /// Visible label. Blank nodes show nothing.
    pub fn display_label(&self) -> &str {
        if self.is_blank { "" } else { &self.name }
    }

    /// Object of the subject's type-definition edge, if any.
    pub fn type_definition(&self) -> Option<&str> {
        self.type_definition.as_deref()
    }

    pub fn rdfs_label(&self) -> Option<&str> {
        self.rdfs_label.as_deref()
    }

    pub fn rdfs_comment(&self) -> Option<&str> {
        self.rdfs_comment.as_deref()
    }

    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    /// Lexical form of a global literal's text.
    pub fn literal_form(&self) -> Option<LiteralForm> {
        match self.kind {
            VertexKind::GlobalLiteral => literal::classify(&self.name),
            _ => None,
        }
    }

    /// Datatype used when the literal is written out: the lexical form's for
    /// global literals, the declared one for instance placeholders.
    pub fn resolved_datatype(&self) -> Option<String> {
        match self.kind {
            VertexKind::GlobalLiteral => self
                .literal_form()
                .map(|f| f.datatype().to_string())
                .or_else(|| self.datatype.clone()),
            VertexKind::InstanceLiteral => self.datatype.clone(),
            _ => None,
        }
    }

    pub fn incoming_edges(&self) -> &[EdgeId] {
        &self.incoming
    }

    /// Outgoing edges, excluding type-definition edges.
    pub fn outgoing_edges(&self) -> &[EdgeId] {
        &self.outgoing
    }

    pub fn center(&self) -> crate::geometry::Point {
        self.boundary.center()
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Result of classifying a freshly drawn element.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub kind: VertexKind,
    pub name: String,
    pub is_blank: bool,
    pub is_iri: bool,
    pub literal: Option<LiteralForm>,
}

/// Classify a new element from its text, boundary shape and stroke.
///
/// Blank-node detection runs first and consumes the next counter value.
/// Then ellipses become classes (dashed ⇒ instance) and rectangles become
/// literals (lexical form ⇒ global, no colon ⇒ instance placeholder,
/// anything else is rejected).
pub fn classify(
    name: &str,
    boundary: &Boundary,
    dashed: bool,
    blanks: &mut BlankNodeCounter,
) -> Result<Classification> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::UnclassifiableElement {
            name: name.to_string(),
            reason: "name is empty".into(),
        });
    }

    if name.starts_with('_') {
        if !boundary.is_ellipse() {
            return Err(Error::UnclassifiableElement {
                name: name.to_string(),
                reason: "blank nodes must be drawn as classes".into(),
            });
        }
        return Ok(Classification {
            kind: VertexKind::class(dashed),
            name: format!("_:{}", blanks.next_id()),
            is_blank: true,
            is_iri: false,
            literal: None,
        });
    }

    let iri = iri_form(name);

    if boundary.is_ellipse() {
        return Ok(Classification {
            kind: VertexKind::class(dashed),
            is_iri: iri.is_some(),
            name: iri.unwrap_or_else(|| name.to_string()),
            is_blank: false,
            literal: None,
        });
    }

    if let Some(form) = literal::classify(name) {
        return Ok(Classification {
            kind: VertexKind::GlobalLiteral,
            name: name.to_string(),
            is_blank: false,
            is_iri: false,
            literal: Some(form),
        });
    }

    if !name.contains(':') {
        return Ok(Classification {
            kind: VertexKind::InstanceLiteral,
            name: name.to_string(),
            is_blank: false,
            is_iri: false,
            literal: None,
        });
    }

    Err(Error::UnclassifiableElement {
        name: name.to_string(),
        reason: "text is neither an RDF literal nor a placeholder name".into(),
    })
}

/// Rebuild a classification for a persisted element whose kind is recorded.
///
/// A recorded `_:id` keeps its identifier (claimed on the counter) unless
/// another vertex already holds it; a repeat, or any other leading
/// underscore, draws a fresh one.
pub fn restore(
    name: &str,
    boundary: &Boundary,
    kind: VertexKind,
    blanks: &mut BlankNodeCounter,
) -> Result<Classification> {
    if kind.is_class() != boundary.is_ellipse() {
        return Err(Error::InvalidContainer(format!(
            "{kind:?} '{name}' has the wrong boundary shape"
        )));
    }
    if name.trim().is_empty() {
        return Err(Error::UnclassifiableElement {
            name: name.to_string(),
            reason: "name is empty".into(),
        });
    }

    if name.starts_with('_') {
        if kind.is_literal() {
            return Err(Error::UnclassifiableElement {
                name: name.to_string(),
                reason: "blank nodes must be drawn as classes".into(),
            });
        }
        let name = match name.strip_prefix("_:") {
            Some(id) if blanks.claim(id) => name.to_string(),
            Some(id) if blanks.is_taken(id) => {
                let fresh = format!("_:{}", blanks.next_id());
                tracing::warn!(recorded = name, renamed = %fresh, "blank node id already in use");
                fresh
            }
            _ => format!("_:{}", blanks.next_id()),
        };
        return Ok(Classification { kind, name, is_blank: true, is_iri: false, literal: None });
    }

    let iri = if kind.is_class() { iri_form(name) } else { None };
    let literal = match kind {
        VertexKind::GlobalLiteral => literal::classify(name),
        _ => None,
    };
    Ok(Classification {
        kind,
        is_iri: iri.is_some(),
        name: iri.unwrap_or_else(|| name.to_string()),
        is_blank: false,
        literal,
    })
}

/// `<iri>` if `name` is an `http:`, `https:` or `mailto:` URI (bracketed or not).
pub fn iri_form(name: &str) -> Option<String> {
    let bare = name
        .strip_prefix('<')
        .and_then(|n| n.strip_suffix('>'))
        .unwrap_or(name);
    let lower = bare.to_ascii_lowercase();
    let is_uri = ["http:", "https:", "mailto:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme));
    is_uri.then(|| format!("<{bare}>"))
}

/// Strip angle brackets from an `<iri>` name.
pub fn bare_iri(name: &str) -> &str {
    name.strip_prefix('<')
        .and_then(|n| n.strip_suffix('>'))
        .unwrap_or(name)
}

/// True for predicates that never become ordinary predicate-object pairs.
pub fn is_type_definition(predicate: &str) -> bool {
    vocab::is_type_predicate(predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Ellipse, Point, Rect};

    fn ellipse() -> Boundary {
        Boundary::Ellipse(Ellipse::new(Point::new(100.0, 100.0), 40.0, 20.0))
    }

    fn rect() -> Boundary {
        Boundary::Rect(Rect::new(Point::new(10.0, 10.0), 60.0, 20.0))
    }

    #[test]
    fn test_class_kinds_follow_stroke() {
        let mut b = BlankNodeCounter::new();
        assert_eq!(classify("ex:Person", &ellipse(), false, &mut b).unwrap().kind, VertexKind::GlobalClass);
        assert_eq!(classify("ex:alice", &ellipse(), true, &mut b).unwrap().kind, VertexKind::InstanceClass);
    }

    #[test]
    fn test_literal_kinds() {
        let mut b = BlankNodeCounter::new();
        let c = classify("\"A person\"@en", &rect(), false, &mut b).unwrap();
        assert_eq!(c.kind, VertexKind::GlobalLiteral);
        assert_eq!(c.literal, Some(LiteralForm::LangString("en".into())));

        let c = classify("42", &rect(), false, &mut b).unwrap();
        assert_eq!(c.kind, VertexKind::GlobalLiteral);

        let c = classify("firstName", &rect(), false, &mut b).unwrap();
        assert_eq!(c.kind, VertexKind::InstanceLiteral);
    }

    #[test]
    fn test_prefixed_literal_is_rejected() {
        let mut b = BlankNodeCounter::new();
        let err = classify("ex:Bar", &rect(), false, &mut b).unwrap_err();
        assert!(matches!(err, Error::UnclassifiableElement { .. }));
    }

    #[test]
    fn test_blank_detection_consumes_counter() {
        let mut b = BlankNodeCounter::new();
        let first = classify("_anything", &ellipse(), false, &mut b).unwrap();
        let second = classify("_", &ellipse(), true, &mut b).unwrap();
        assert!(first.is_blank);
        assert_eq!(first.name, "_:a");
        assert_eq!(second.name, "_:b");
        assert_eq!(second.kind, VertexKind::InstanceClass);
    }

    #[test]
    fn test_iri_is_bracketed() {
        let mut b = BlankNodeCounter::new();
        let c = classify("http://example.org/Person", &ellipse(), false, &mut b).unwrap();
        assert!(c.is_iri);
        assert_eq!(c.name, "<http://example.org/Person>");

        let c = classify("<mailto:ada@example.org>", &ellipse(), false, &mut b).unwrap();
        assert!(c.is_iri);
        assert_eq!(c.name, "<mailto:ada@example.org>");
    }

    #[test]
    fn test_restore_keeps_recorded_blank_id() {
        let mut b = BlankNodeCounter::new();
        let c = restore("_:c", &ellipse(), VertexKind::GlobalClass, &mut b).unwrap();
        assert_eq!(c.name, "_:c");
        assert_eq!(b.next_id(), "d");
    }

    #[test]
    fn test_restore_trusts_recorded_kind() {
        let mut b = BlankNodeCounter::new();
        let c = restore("ex:Bar", &rect(), VertexKind::GlobalLiteral, &mut b).unwrap();
        assert_eq!(c.kind, VertexKind::GlobalLiteral);
        assert!(restore("ex:Bar", &ellipse(), VertexKind::GlobalLiteral, &mut b).is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut b = BlankNodeCounter::new();
        assert!(classify("  ", &ellipse(), false, &mut b).is_err());
    }
}
