//! GAT decoder.
//!
//! Records are processed strictly in order. The canvas record seeds the
//! graph; vertex records must precede any edge that touches them, because
//! edges find their subject and object by hit-testing already decoded
//! vertex boundaries.

use super::lexer::{Record, RecordTag, Token, parse_record, tokenize};
use crate::geometry::{Boundary, Ellipse, Point, Rect, Shape};
use crate::model::edge::EdgeRoute;
use crate::model::{Canvas, OntologyGraph, VertexAttrs, VertexKind};
use crate::{Error, Result};

/// Endpoints within this distance of the re-derived anchor are kept verbatim.
const ANCHOR_EPSILON: f64 = 1e-6;

/// A record that could not be decoded. The rest of the document still was.
#[derive(Debug)]
pub struct RecordError {
    /// Byte offset of the record in the source text.
    pub position: usize,
    /// The raw record text.
    pub record: String,
    pub error: Error,
}

/// Outcome of decoding a document.
#[derive(Debug)]
pub struct Decoded {
    pub graph: OntologyGraph,
    /// Records that were dropped, in source order.
    pub errors: Vec<RecordError>,
}

impl Decoded {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Decode a GAT document.
///
/// Fails outright only when the leading canvas record is missing or
/// malformed; every later record fails on its own.
pub fn decode(text: &str) -> Result<Decoded> {
    let tokens = tokenize(text);
    let mut tokens = tokens.into_iter();

    let first = tokens
        .next()
        .ok_or_else(|| Error::InvalidContainer("empty document".into()))?;
    let mut graph = OntologyGraph::new(parse_canvas(first)?);
    let mut errors = Vec::new();

    for token in tokens {
        if let Err(error) = decode_token(&mut graph, token) {
            tracing::warn!(position = token.span.start, %error, "dropping GAT record");
            errors.push(RecordError {
                position: token.span.start,
                record: token.text.to_string(),
                error,
            });
        }
    }

    tracing::debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        dropped = errors.len(),
        "decoded GAT document"
    );
    Ok(Decoded { graph, errors })
}

fn parse_canvas(token: Token<'_>) -> Result<Canvas> {
    let record = parse_record(token)?;
    if record.tag != RecordTag::Canvas {
        return Err(Error::InvalidContainer(
            "document must start with a canvas-size record".into(),
        ));
    }
    let size = record.field(0, "canvas size")?;
    let (w, h) = size
        .split_once(['x', 'X'])
        .ok_or_else(|| Error::InvalidContainer(format!("malformed canvas size '{size}'")))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && *n > 0.0)
            .ok_or_else(|| Error::InvalidContainer(format!("malformed canvas size '{size}'")))
    };
    Ok(Canvas::new(parse(w)?, parse(h)?))
}

fn decode_token(graph: &mut OntologyGraph, token: Token<'_>) -> Result<()> {
    let record = parse_record(token)?;
    match record.tag {
        RecordTag::Canvas => Err(Error::InvalidContainer(
            "canvas-size record may only appear first".into(),
        )),
        RecordTag::Class => decode_class(graph, &record),
        RecordTag::Literal => decode_literal(graph, &record),
        RecordTag::Straight => decode_straight(graph, &record),
        RecordTag::Loop => decode_loop(graph, &record),
    }
}

fn kind_flag(record: &Record, i: usize) -> Result<bool> {
    match record.field(i, "instance-or-global flag")? {
        "i" => Ok(true),
        "g" => Ok(false),
        other => Err(Error::InvalidContainer(format!(
            "{} record at {}: unknown instance-or-global flag '{other}'",
            record.tag.as_char(),
            record.span.start
        ))),
    }
}

fn decode_class(graph: &mut OntologyGraph, r: &Record) -> Result<()> {
    let shape = Ellipse::new(
        Point::new(r.number(0, "centerX")?, r.number(1, "centerY")?),
        r.number(2, "radiusX")?,
        r.number(3, "radiusY")?,
    );
    let attrs = VertexAttrs {
        fill: r.optional(4),
        rdfs_label: r.optional(7),
        rdfs_comment: r.optional(8),
        datatype: None,
    };
    let kind = VertexKind::class(kind_flag(r, 5)?);
    graph.restore_vertex(r.field(6, "name")?, Boundary::Ellipse(shape), kind, attrs)?;
    Ok(())
}

fn decode_literal(graph: &mut OntologyGraph, r: &Record) -> Result<()> {
    let shape = Rect::new(
        Point::new(r.number(0, "layoutX")?, r.number(1, "layoutY")?),
        r.number(2, "width")?,
        r.number(3, "height")?,
    );
    let attrs = VertexAttrs {
        fill: r.optional(4),
        rdfs_label: None,
        rdfs_comment: None,
        datatype: r.optional(7),
    };
    let kind = VertexKind::literal(kind_flag(r, 5)?);
    graph.restore_vertex(r.field(6, "name")?, Boundary::Rect(shape), kind, attrs)?;
    Ok(())
}

fn decode_straight(graph: &mut OntologyGraph, r: &Record) -> Result<()> {
    let start = Point::new(r.number(0, "startX")?, r.number(1, "startY")?);
    let end = Point::new(r.number(2, "endX")?, r.number(3, "endY")?);
    let anchor = r.number(4, "layout anchor")?;
    let name = r.field(5, "name")?;

    let missing = |p: Point| Error::MissingEndpoint { edge: name.to_string(), x: p.x, y: p.y };
    let subject = graph.vertex_at(start, None).ok_or_else(|| missing(start))?;
    let object = graph.vertex_at(end, Some(subject)).ok_or_else(|| missing(end))?;

    let center = graph.require(subject)?.center();
    let derived = graph.require(object)?.boundary().snap(center, end);
    let route = EdgeRoute::Straight {
        start: if start.distance(center) <= ANCHOR_EPSILON { start } else { center },
        end: if end.distance(derived) <= ANCHOR_EPSILON { end } else { derived },
        anchor,
    };
    graph.attach_edge(subject, object, name, route)?;
    Ok(())
}

fn decode_loop(graph: &mut OntologyGraph, r: &Record) -> Result<()> {
    let arc = Ellipse::new(
        Point::new(r.number(0, "centerX")?, r.number(1, "centerY")?),
        r.number(2, "radiusX")?,
        r.number(3, "radiusY")?,
    );
    let label = Point::new(r.number(4, "layoutX")?, r.number(5, "layoutY")?);
    let name = r.field(6, "name")?;

    let vertex = graph.vertex_at(arc.center, None).ok_or_else(|| Error::MissingEndpoint {
        edge: name.to_string(),
        x: arc.center.x,
        y: arc.center.y,
    })?;
    graph.attach_edge(vertex, vertex, name, EdgeRoute::Loop { arc, label })?;
    Ok(())
}
