//! The graph: sole owner of every vertex and edge.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::blank::BlankNodeCounter;
use super::edge::{DEFAULT_LABEL_ANCHOR, Edge, EdgeId, EdgeRoute};
use super::vertex::{self, Vertex, VertexId, VertexKind};
use crate::geometry::{Boundary, Ellipse, HIT_TOLERANCE, Point, Rect, Shape};
use crate::{Error, Result};

/// Distance from the canvas edge that triggers growth.
pub const CANVAS_MARGIN: f64 = 150.0;
/// How far past the triggering coordinate the canvas grows.
pub const CANVAS_GROWTH: f64 = 300.0;

/// Drawing surface size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

impl Canvas {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Grow so that `p` sits at least [`CANVAS_MARGIN`] inside each edge.
    /// Returns whether anything changed.
    pub fn grow_to_fit(&mut self, p: Point) -> bool {
        let mut grew = false;
        if p.x > self.width - CANVAS_MARGIN {
            self.width = p.x + CANVAS_GROWTH;
            grew = true;
        }
        if p.y > self.height - CANVAS_MARGIN {
            self.height = p.y + CANVAS_GROWTH;
            grew = true;
        }
        grew
    }
}

/// Persisted attributes of a vertex beyond name, shape and kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexAttrs {
    pub fill: Option<String>,
    pub rdfs_label: Option<String>,
    pub rdfs_comment: Option<String>,
    pub datatype: Option<String>,
}

/// The conceptual graph behind one diagram.
///
/// Vertices and edges keep insertion order; that order drives every
/// encoding and rendering. The blank-node counter belongs to the graph, so
/// identifiers are unique per editing session.
#[derive(Debug, Clone, Default)]
pub struct OntologyGraph {
    canvas: Canvas,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    vertex_index: HashMap<VertexId, usize>,
    edge_index: HashMap<EdgeId, usize>,
    blanks: BlankNodeCounter,
    next_vertex_id: u32,
    next_edge_id: u32,
}

impl OntologyGraph {
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas, ..Self::default() }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn blank_counter(&self) -> &BlankNodeCounter {
        &self.blanks
    }

    // ========================================================================
    // Vertex construction
    // ========================================================================

    /// Add a class drawn as an ellipse. `dashed` marks an instance class.
    pub fn add_class(&mut self, name: &str, shape: Ellipse, dashed: bool) -> Result<VertexId> {
        let boundary = Boundary::Ellipse(shape);
        self.check_container(name, &boundary)?;
        let c = vertex::classify(name, &boundary, dashed, &mut self.blanks)?;
        let id = self.allocate_vertex_id();
        Ok(self.insert_vertex(Vertex::new(id, c, boundary)))
    }

    /// Add a literal drawn as a rectangle.
    pub fn add_literal(&mut self, name: &str, shape: Rect) -> Result<VertexId> {
        let boundary = Boundary::Rect(shape);
        self.check_container(name, &boundary)?;
        let c = vertex::classify(name, &boundary, false, &mut self.blanks)?;
        let id = self.allocate_vertex_id();
        Ok(self.insert_vertex(Vertex::new(id, c, boundary)))
    }

    /// Re-create a persisted vertex whose kind is already known.
    pub(crate) fn restore_vertex(
        &mut self,
        name: &str,
        boundary: Boundary,
        kind: VertexKind,
        attrs: VertexAttrs,
    ) -> Result<VertexId> {
        self.check_container(name, &boundary)?;
        let c = vertex::restore(name, &boundary, kind, &mut self.blanks)?;
        let id = self.allocate_vertex_id();
        let mut v = Vertex::new(id, c, boundary);
        if let Some(fill) = attrs.fill {
            v.fill = fill;
        }
        v.rdfs_label = attrs.rdfs_label;
        v.rdfs_comment = attrs.rdfs_comment;
        if attrs.datatype.is_some() {
            v.datatype = attrs.datatype;
        }
        Ok(self.insert_vertex(v))
    }

    fn check_container(&self, name: &str, boundary: &Boundary) -> Result<()> {
        if !boundary.is_well_formed() {
            return Err(Error::InvalidContainer(format!(
                "'{name}' has a degenerate boundary"
            )));
        }
        let c = boundary.center();
        if c.x < 0.0 || c.y < 0.0 {
            return Err(Error::InvalidContainer(format!(
                "'{name}' is not on the canvas (center {c})"
            )));
        }
        Ok(())
    }

    fn allocate_vertex_id(&mut self) -> VertexId {
        self.next_vertex_id += 1;
        VertexId(self.next_vertex_id)
    }

    fn insert_vertex(&mut self, v: Vertex) -> VertexId {
        let id = v.id;
        if self.canvas.grow_to_fit(v.boundary.max_corner()) {
            tracing::debug!(width = self.canvas.width, height = self.canvas.height, "canvas grew");
        }
        self.vertex_index.insert(id, self.vertices.len());
        self.vertices.push(v);
        id
    }

    // ========================================================================
    // Edge construction
    // ========================================================================

    /// Draw a property arrow from `subject` to `object`, aimed at `click`.
    ///
    /// The arrow starts at the subject's center and ends at the anchor point
    /// on the object's boundary. A vertex connected to itself gets a loop.
    pub fn connect(
        &mut self,
        subject: VertexId,
        object: VertexId,
        predicate: &str,
        click: Point,
    ) -> Result<EdgeId> {
        let s = self.require(subject)?;
        let o = self.require(object)?;
        let route = if subject == object {
            loop_route(s.boundary())
        } else {
            let start = s.center();
            let end = o.boundary().snap(start, click);
            EdgeRoute::Straight { start, end, anchor: DEFAULT_LABEL_ANCHOR }
        };
        self.attach_edge(subject, object, predicate, route)
    }

    /// Register an edge with a precomputed route.
    ///
    /// Type-definition predicates set the subject's `type_definition`
    /// instead of joining its outgoing list.
    pub(crate) fn attach_edge(
        &mut self,
        subject: VertexId,
        object: VertexId,
        predicate: &str,
        route: EdgeRoute,
    ) -> Result<EdgeId> {
        if self.require(subject)?.is_literal() {
            return Err(Error::InvalidContainer(format!(
                "literal vertex {subject} cannot be the subject of '{predicate}'"
            )));
        }
        let object_name = self.require(object)?.name.clone();

        self.next_edge_id += 1;
        let id = EdgeId(self.next_edge_id);
        let edge = Edge::new(id, predicate, subject, object, route)?;
        let is_type = edge.is_type_definition();

        self.edge_index.insert(id, self.edges.len());
        self.edges.push(edge);

        if let Some(s) = self.vertex_mut(subject) {
            if is_type {
                s.type_definition = Some(object_name);
            } else {
                s.outgoing.push(id);
            }
        }
        if let Some(o) = self.vertex_mut(object) {
            o.incoming.push(id);
        }
        Ok(id)
    }

    // ========================================================================
    // Removal
    // ========================================================================

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge> {
        let idx = *self
            .edge_index
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("Edge {id}")))?;
        let edge = self.edges.remove(idx);
        self.reindex_edges();

        if let Some(o) = self.vertex_mut(edge.object) {
            o.incoming.retain(|e| *e != id);
        }
        if edge.is_type_definition() {
            let remaining = self
                .edges
                .iter()
                .rev()
                .find(|e| e.subject == edge.subject && e.is_type_definition())
                .map(|e| e.object);
            let type_name = remaining.and_then(|o| self.vertex(o)).map(|v| v.name.clone());
            if let Some(s) = self.vertex_mut(edge.subject) {
                s.type_definition = type_name;
            }
        } else if let Some(s) = self.vertex_mut(edge.subject) {
            s.outgoing.retain(|e| *e != id);
        }
        Ok(edge)
    }

    /// Remove a vertex together with every edge touching it.
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<Vertex> {
        self.require(id)?;
        let incident: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|e| e.subject == id || e.object == id)
            .map(|e| e.id)
            .collect();
        for edge in incident {
            self.remove_edge(edge)?;
        }
        let idx = *self
            .vertex_index
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("Vertex {id}")))?;
        let v = self.vertices.remove(idx);
        self.vertex_index = index_of(&self.vertices, |v| v.id);
        Ok(v)
    }

    fn reindex_edges(&mut self) {
        self.edge_index = index_of(&self.edges, |e| e.id);
    }

    // ========================================================================
    // Attribute setters
    // ========================================================================

    pub fn set_label(&mut self, id: VertexId, label: Option<String>) -> Result<()> {
        self.require_mut(id)?.rdfs_label = label.filter(|l| !l.is_empty());
        Ok(())
    }

    pub fn set_comment(&mut self, id: VertexId, comment: Option<String>) -> Result<()> {
        self.require_mut(id)?.rdfs_comment = comment.filter(|c| !c.is_empty());
        Ok(())
    }

    /// Declare the datatype of a literal placeholder (`xsd:integer`, …).
    pub fn set_datatype(&mut self, id: VertexId, datatype: Option<String>) -> Result<()> {
        let v = self.require_mut(id)?;
        if !v.is_literal() {
            return Err(Error::InvalidContainer(format!("class vertex {id} has no datatype")));
        }
        v.datatype = datatype.filter(|d| !d.is_empty());
        Ok(())
    }

    pub fn set_fill(&mut self, id: VertexId, fill: impl Into<String>) -> Result<()> {
        self.require_mut(id)?.fill = fill.into();
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertex_index.get(&id).map(|&i| &self.vertices[i])
    }

    fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertex_index.get(&id).map(|&i| &mut self.vertices[i])
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_index.get(&id).map(|&i| &self.edges[i])
    }

    pub fn require(&self, id: VertexId) -> Result<&Vertex> {
        self.vertex(id)
            .ok_or_else(|| Error::InvalidContainer(format!("vertex {id} is not in this graph")))
    }

    fn require_mut(&mut self, id: VertexId) -> Result<&mut Vertex> {
        self.vertex_mut(id)
            .ok_or_else(|| Error::NotFound(format!("Vertex {id}")))
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Edges in insertion order, type-definition edges included.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn classes(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter().filter(|v| v.is_class())
    }

    /// Ordinary outgoing edges of `id` (type definitions excluded).
    pub fn outgoing(&self, id: VertexId) -> impl Iterator<Item = &Edge> {
        self.vertex(id)
            .map(|v| v.outgoing.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|e| self.edge(*e))
    }

    pub fn incoming(&self, id: VertexId) -> impl Iterator<Item = &Edge> {
        self.vertex(id)
            .map(|v| v.incoming.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|e| self.edge(*e))
    }

    /// First vertex (in insertion order) whose boundary contains `p`.
    pub fn vertex_at(&self, p: Point, exclude: Option<VertexId>) -> Option<VertexId> {
        self.vertices
            .iter()
            .filter(|v| Some(v.id) != exclude)
            .find(|v| v.boundary.contains(p, HIT_TOLERANCE))
            .map(|v| v.id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Vertex> {
        self.vertices.iter().find(|v| v.name == name)
    }
}

/// Loop arc hung on the top of a vertex boundary.
pub(crate) fn loop_route(boundary: &Boundary) -> EdgeRoute {
    let top = boundary.top();
    let (rx, ry) = match boundary {
        Boundary::Ellipse(e) => (e.rx / 2.0, e.ry / 2.0),
        Boundary::Rect(r) => (r.width / 4.0, r.height / 2.0),
    };
    EdgeRoute::Loop {
        arc: Ellipse::new(top, rx, ry),
        label: Point::new(top.x, top.y - 2.0 * ry),
    }
}

fn index_of<T, K: std::hash::Hash + Eq>(items: &[T], key: impl Fn(&T) -> K) -> HashMap<K, usize> {
    items.iter().enumerate().map(|(i, item)| (key(item), i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ellipse(x: f64, y: f64) -> Ellipse {
        Ellipse::new(Point::new(x, y), 50.0, 25.0)
    }

    fn rect(x: f64, y: f64) -> Rect {
        Rect::new(Point::new(x, y), 80.0, 30.0)
    }

    #[test]
    fn test_connect_anchors_on_object_boundary() {
        let mut g = OntologyGraph::default();
        let person = g.add_class("ex:Person", ellipse(100.0, 100.0), false).unwrap();
        let org = g.add_class("ex:Org", ellipse(400.0, 100.0), false).unwrap();
        let e = g.connect(person, org, "ex:worksFor", Point::new(400.0, 100.0)).unwrap();
        match g.edge(e).unwrap().route() {
            EdgeRoute::Straight { start, end, .. } => {
                assert_eq!(*start, Point::new(100.0, 100.0));
                assert!((end.x - 350.0).abs() < 1e-9);
                assert!((end.y - 100.0).abs() < 1e-9);
            }
            other => panic!("expected straight route, got {other:?}"),
        }
        assert_eq!(g.vertex(person).unwrap().outgoing_edges(), &[e]);
        assert_eq!(g.vertex(org).unwrap().incoming_edges(), &[e]);
    }

    #[test]
    fn test_type_edge_is_diverted() {
        let mut g = OntologyGraph::default();
        let alice = g.add_class("ex:alice", ellipse(100.0, 100.0), true).unwrap();
        let person = g.add_class("ex:Person", ellipse(300.0, 100.0), false).unwrap();
        g.connect(alice, person, "a", Point::new(300.0, 100.0)).unwrap();
        let v = g.vertex(alice).unwrap();
        assert_eq!(v.type_definition(), Some("ex:Person"));
        assert!(v.outgoing_edges().is_empty());
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_removing_type_edge_clears_definition() {
        let mut g = OntologyGraph::default();
        let alice = g.add_class("ex:alice", ellipse(100.0, 100.0), true).unwrap();
        let person = g.add_class("ex:Person", ellipse(300.0, 100.0), false).unwrap();
        let agent = g.add_class("ex:Agent", ellipse(300.0, 300.0), false).unwrap();
        g.connect(alice, person, "rdf:type", Point::new(300.0, 100.0)).unwrap();
        let second = g.connect(alice, agent, "a", Point::new(300.0, 300.0)).unwrap();
        assert_eq!(g.vertex(alice).unwrap().type_definition(), Some("ex:Agent"));
        g.remove_edge(second).unwrap();
        assert_eq!(g.vertex(alice).unwrap().type_definition(), Some("ex:Person"));
    }

    #[test]
    fn test_self_loop() {
        let mut g = OntologyGraph::default();
        let p = g.add_class("ex:Person", ellipse(200.0, 200.0), false).unwrap();
        let e = g.connect(p, p, "ex:knows", Point::new(200.0, 200.0)).unwrap();
        let edge = g.edge(e).unwrap();
        assert!(edge.is_self_referential());
        assert!(matches!(edge.route(), EdgeRoute::Loop { .. }));
    }

    #[test]
    fn test_literal_cannot_be_subject() {
        let mut g = OntologyGraph::default();
        let lit = g.add_literal("42", rect(10.0, 10.0)).unwrap();
        let class = g.add_class("ex:Thing", ellipse(300.0, 100.0), false).unwrap();
        let err = g.connect(lit, class, "ex:p", Point::new(300.0, 100.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidContainer(_)));
    }

    #[test]
    fn test_off_canvas_rejected() {
        let mut g = OntologyGraph::default();
        let err = g.add_class("ex:X", ellipse(-10.0, 50.0), false).unwrap_err();
        assert!(matches!(err, Error::InvalidContainer(_)));
        let err = g.add_literal("1", Rect::new(Point::new(0.0, 0.0), 0.0, 10.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidContainer(_)));
    }

    #[test]
    fn test_canvas_grows_near_edge() {
        let mut g = OntologyGraph::new(Canvas::new(800.0, 600.0));
        g.add_class("ex:Far", ellipse(700.0, 100.0), false).unwrap();
        assert_eq!(g.canvas(), Canvas::new(750.0 + CANVAS_GROWTH, 600.0));
    }

    #[test]
    fn test_remove_vertex_drops_incident_edges() {
        let mut g = OntologyGraph::default();
        let a = g.add_class("ex:A", ellipse(100.0, 100.0), false).unwrap();
        let b = g.add_class("ex:B", ellipse(300.0, 100.0), false).unwrap();
        let c = g.add_class("ex:C", ellipse(100.0, 300.0), false).unwrap();
        g.connect(a, b, "ex:p", Point::new(300.0, 100.0)).unwrap();
        let kept = g.connect(a, c, "ex:q", Point::new(100.0, 300.0)).unwrap();
        g.remove_vertex(b).unwrap();
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.vertex(a).unwrap().outgoing_edges(), &[kept]);
        assert!(g.vertex(c).is_some());
    }

    #[test]
    fn test_vertex_at_hit_test() {
        let mut g = OntologyGraph::default();
        let a = g.add_class("ex:A", ellipse(100.0, 100.0), false).unwrap();
        assert_eq!(g.vertex_at(Point::new(150.0, 100.0), None), Some(a));
        assert_eq!(g.vertex_at(Point::new(150.0, 100.0), Some(a)), None);
        assert_eq!(g.vertex_at(Point::new(400.0, 400.0), None), None);
    }
}
