//! Correlation of CSV columns with graph vertices.

use serde::{Deserialize, Serialize};

use crate::model::prefix::local_name;
use crate::model::{Correlation, OntologyGraph, Vertex, VertexId, VertexKind};
use crate::{Error, Result};

/// Vertices that can take their value from a CSV column: class vertices
/// (the subject IRI's local part) and instance-literal placeholders.
pub fn is_correlatable(v: &Vertex) -> bool {
    v.is_class() || v.kind() == VertexKind::InstanceLiteral
}

/// Outcome of automatic correlation, refined by manual submissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub correlations: Vec<Correlation>,
    /// `(column, header)` pairs that matched no vertex.
    pub unmatched_headers: Vec<(usize, String)>,
    pub unmatched_vertices: Vec<VertexId>,
}

impl CorrelationReport {
    /// Correlation for `vertex`, if any.
    pub fn for_vertex(&self, vertex: VertexId) -> Option<&Correlation> {
        self.correlations.iter().find(|c| c.vertex == vertex)
    }

    pub fn is_complete(&self) -> bool {
        self.unmatched_headers.is_empty() && self.unmatched_vertices.is_empty()
    }

    /// Record a manual correlation.
    ///
    /// Any earlier correlation for the same column or the same vertex is
    /// replaced; the header and vertex leave the unmatched sets, and a
    /// vertex or header displaced by the replacement returns to them.
    pub fn submit(
        &mut self,
        graph: &OntologyGraph,
        column: usize,
        header: impl Into<String>,
        vertex: VertexId,
    ) -> Result<()> {
        let v = graph
            .vertex(vertex)
            .ok_or_else(|| Error::NotFound(format!("vertex {}", vertex.0)))?;
        if !is_correlatable(v) {
            return Err(Error::InvalidContainer(format!(
                "'{}' cannot take values from a CSV column",
                v.name()
            )));
        }

        let header = header.into();
        let mut displaced = Vec::new();
        self.correlations.retain(|c| {
            let keep = c.column != column && c.vertex != vertex;
            if !keep {
                displaced.push(c.clone());
            }
            keep
        });
        for old in displaced {
            if old.vertex != vertex && !self.unmatched_vertices.contains(&old.vertex) {
                self.unmatched_vertices.push(old.vertex);
            }
            if old.column != column && !self.unmatched_headers.iter().any(|(i, _)| *i == old.column) {
                self.unmatched_headers.push((old.column, old.header));
            }
        }

        self.unmatched_headers.retain(|(i, _)| *i != column);
        self.unmatched_vertices.retain(|id| *id != vertex);
        tracing::debug!(column, header = %header, vertex = v.name(), "manual correlation");
        self.correlations.push(Correlation::new(column, header, vertex));
        Ok(())
    }
}

/// Match CSV headers against correlatable vertices.
///
/// A header matches a vertex whose name equals it exactly, or whose local
/// name (after the prefix acronym) equals it case-insensitively. Headers
/// are processed in column order. Class vertices are tried first, then
/// instance-literal placeholders; within each group the first match in
/// vertex order is taken, and neither side can match again.
pub fn correlate(graph: &OntologyGraph, headers: &[String]) -> CorrelationReport {
    let mut available: Vec<&Vertex> = graph.vertices().iter().filter(|v| is_correlatable(v)).collect();
    let mut report = CorrelationReport::default();

    for (column, header) in headers.iter().enumerate() {
        let wanted = header.trim();
        let hit = available
            .iter()
            .position(|v| v.kind().is_class() && matches(v, wanted))
            .or_else(|| available.iter().position(|v| matches(v, wanted)));
        match hit {
            Some(i) => {
                let v = available.remove(i);
                report.correlations.push(Correlation::new(column, header.clone(), v.id()));
            }
            None => report.unmatched_headers.push((column, header.clone())),
        }
    }
    report.unmatched_vertices = available.iter().map(|v| v.id()).collect();

    tracing::debug!(
        matched = report.correlations.len(),
        unmatched_headers = report.unmatched_headers.len(),
        unmatched_vertices = report.unmatched_vertices.len(),
        "correlated CSV headers"
    );
    report
}

fn matches(v: &Vertex, header: &str) -> bool {
    if header.is_empty() {
        return false;
    }
    v.name() == header || local_name(v.name()).eq_ignore_ascii_case(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Ellipse, Point, Rect};

    fn graph() -> (OntologyGraph, VertexId, VertexId, VertexId) {
        let mut g = OntologyGraph::default();
        let name = g.add_class("ex:name", Ellipse::new(Point::new(100.0, 100.0), 40.0, 20.0), true).unwrap();
        let city = g.add_class("ex:City", Ellipse::new(Point::new(300.0, 100.0), 40.0, 20.0), false).unwrap();
        let age = g.add_literal("age", Rect::new(Point::new(100.0, 300.0), 60.0, 20.0)).unwrap();
        g.add_literal("42", Rect::new(Point::new(300.0, 300.0), 60.0, 20.0)).unwrap();
        (g, name, city, age)
    }

    fn headers(h: &[&str]) -> Vec<String> {
        h.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_and_case_insensitive() {
        let (g, name, _, _) = graph();
        let r = correlate(&g, &headers(&["name"]));
        assert_eq!(r.correlations, vec![Correlation::new(0, "name", name)]);

        let r = correlate(&g, &headers(&["Name"]));
        assert_eq!(r.correlations, vec![Correlation::new(0, "Name", name)]);

        let r = correlate(&g, &headers(&["ex:name"]));
        assert_eq!(r.correlations[0].vertex, name);
    }

    #[test]
    fn test_first_match_consumes_both() {
        let (g, name, city, age) = graph();
        let r = correlate(&g, &headers(&["NAME", "name", "city", "AGE", "zip"]));
        assert_eq!(
            r.correlations,
            vec![
                Correlation::new(0, "NAME", name),
                Correlation::new(2, "city", city),
                Correlation::new(3, "AGE", age),
            ]
        );
        assert_eq!(r.unmatched_headers, vec![(1, "name".to_string()), (4, "zip".to_string())]);
        assert!(r.unmatched_vertices.is_empty());
    }

    #[test]
    fn test_class_wins_over_earlier_placeholder() {
        let mut g = OntologyGraph::default();
        let placeholder = g.add_literal("name", Rect::new(Point::new(100.0, 300.0), 60.0, 20.0)).unwrap();
        let class = g.add_class("ex:name", Ellipse::new(Point::new(100.0, 100.0), 40.0, 20.0), false).unwrap();

        let r = correlate(&g, &headers(&["name"]));
        assert_eq!(r.correlations, vec![Correlation::new(0, "name", class)]);
        assert_eq!(r.unmatched_vertices, vec![placeholder]);

        // A second header of the same name falls through to the placeholder.
        let r = correlate(&g, &headers(&["name", "name"]));
        assert_eq!(
            r.correlations,
            vec![Correlation::new(0, "name", class), Correlation::new(1, "name", placeholder)]
        );
    }

    #[test]
    fn test_global_literals_are_not_correlatable() {
        let (g, _, _, _) = graph();
        let r = correlate(&g, &headers(&["42"]));
        assert!(r.correlations.is_empty());
        assert_eq!(r.unmatched_vertices.len(), 3);
    }

    #[test]
    fn test_submit_replaces() {
        let (g, name, city, _) = graph();
        let mut r = correlate(&g, &headers(&["name", "town"]));
        assert_eq!(r.unmatched_headers, vec![(1, "town".to_string())]);

        r.submit(&g, 1, "town", city).unwrap();
        assert_eq!(r.for_vertex(city).unwrap().column, 1);
        assert!(r.unmatched_headers.is_empty());
        assert!(!r.unmatched_vertices.contains(&city));

        // Re-point column 0 at city: name goes back to unmatched, column 1 too.
        r.submit(&g, 0, "name", city).unwrap();
        assert_eq!(r.correlations, vec![Correlation::new(0, "name", city)]);
        assert!(r.unmatched_vertices.contains(&name));
        assert_eq!(r.unmatched_headers, vec![(1, "town".to_string())]);
    }

    #[test]
    fn test_submit_rejects_global_literal() {
        let (g, _, _, _) = graph();
        let lit = g.find_by_name("42").unwrap().id();
        let mut r = CorrelationReport::default();
        assert!(matches!(r.submit(&g, 0, "x", lit), Err(Error::InvalidContainer(_))));
        assert!(matches!(r.submit(&g, 0, "x", VertexId(99)), Err(Error::NotFound(_))));
    }
}
