//! GAT encoder, the structural inverse of [`decode`](super::decode).

use std::fmt::Write as _;

use super::lexer::{FIELD_SEP, RECORD_CLOSE, RECORD_OPEN, RecordTag, escape_field};
use crate::geometry::Boundary;
use crate::model::{Edge, EdgeRoute, OntologyGraph, Vertex};

/// Encode the whole graph: canvas, then vertices, then edges, each in
/// collection order.
pub fn encode(graph: &OntologyGraph) -> String {
    let canvas = graph.canvas();
    let mut out = String::new();
    let _ = write!(out, "{}{}x{}", RecordTag::Canvas.as_char(), canvas.width, canvas.height);

    for v in graph.vertices() {
        push_record(&mut out, vertex_record(v));
    }
    for e in graph.edges() {
        push_record(&mut out, edge_record(e));
    }
    out
}

fn push_record(out: &mut String, (tag, fields): (RecordTag, Vec<String>)) {
    out.push(RECORD_OPEN);
    out.push(tag.as_char());
    let sep = FIELD_SEP.to_string();
    out.push_str(&fields.join(&sep));
    out.push(RECORD_CLOSE);
}

fn vertex_record(v: &Vertex) -> (RecordTag, Vec<String>) {
    let flag = v.kind().flag().to_string();
    match v.boundary() {
        Boundary::Ellipse(e) => (
            RecordTag::Class,
            vec![
                e.center.x.to_string(),
                e.center.y.to_string(),
                e.rx.to_string(),
                e.ry.to_string(),
                escape_field(v.fill()),
                flag,
                escape_field(v.name()),
                escape_field(v.rdfs_label().unwrap_or_default()),
                escape_field(v.rdfs_comment().unwrap_or_default()),
            ],
        ),
        Boundary::Rect(r) => (
            RecordTag::Literal,
            vec![
                r.origin.x.to_string(),
                r.origin.y.to_string(),
                r.width.to_string(),
                r.height.to_string(),
                escape_field(v.fill()),
                flag,
                escape_field(v.name()),
                escape_field(v.datatype().unwrap_or_default()),
            ],
        ),
    }
}

fn edge_record(e: &Edge) -> (RecordTag, Vec<String>) {
    match e.route() {
        EdgeRoute::Straight { start, end, anchor } => (
            RecordTag::Straight,
            vec![
                start.x.to_string(),
                start.y.to_string(),
                end.x.to_string(),
                end.y.to_string(),
                anchor.to_string(),
                escape_field(e.name()),
            ],
        ),
        EdgeRoute::Loop { arc, label } => (
            RecordTag::Loop,
            vec![
                arc.center.x.to_string(),
                arc.center.y.to_string(),
                arc.rx.to_string(),
                arc.ry.to_string(),
                label.x.to_string(),
                label.y.to_string(),
                escape_field(e.name()),
            ],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Ellipse, Point, Rect};

    #[test]
    fn test_encode_layout() {
        let mut g = OntologyGraph::default();
        let person = g.add_class("ex:Person", Ellipse::new(Point::new(100.0, 100.0), 50.0, 25.0), false).unwrap();
        g.set_label(person, Some("A person".into())).unwrap();
        let name = g.add_literal("name", Rect::new(Point::new(300.0, 80.0), 80.0, 40.0)).unwrap();
        g.set_datatype(name, Some("xsd:string".into())).unwrap();
        g.connect(person, name, "ex:hasName", Point::new(310.0, 100.0)).unwrap();

        let text = encode(&g);
        assert_eq!(
            text,
            "G800x600\
             [C100|100|50|25|#ffffff|g|ex:Person|A person|]\
             [L300|80|80|40|#ffffff|i|name|xsd:string]\
             [A100|100|300|100|0.5|ex:hasName]"
        );
    }

    #[test]
    fn test_loop_record() {
        let mut g = OntologyGraph::default();
        let p = g.add_class("ex:Person", Ellipse::new(Point::new(200.0, 200.0), 40.0, 20.0), false).unwrap();
        g.connect(p, p, "ex:knows", Point::new(200.0, 200.0)).unwrap();
        let text = encode(&g);
        assert!(text.ends_with("[R200|180|20|10|200|160|ex:knows]"), "{text}");
    }

    #[test]
    fn test_names_are_escaped() {
        let mut g = OntologyGraph::default();
        let v = g.add_class("ex:A", Ellipse::new(Point::new(100.0, 100.0), 50.0, 25.0), false).unwrap();
        g.set_comment(v, Some("uses | and [brackets]".into())).unwrap();
        assert!(encode(&g).contains(r"uses \| and \[brackets\]"));
    }
}
