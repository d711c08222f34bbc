//! Export — write graphs and instance data to files or any `io::Write`.
//!
//! ```text
//! OntologyGraph ─ write_gat() ──────────────▶ project.gat  ─ load_project() ─▶ OntologyGraph
//!               ─ write_turtle() ───────────▶ ontology.ttl
//! InstanceData  ─ write_instance_turtle() ──▶ data.ttl
//!               ─ write_rdf_xml() ──────────▶ data.rdf
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::gat::{self, Decoded};
use crate::integration::InstanceData;
use crate::model::{OntologyGraph, PrefixTable};
use crate::turtle::{self, TurtleConfig};
use crate::Result;

/// Write the GAT encoding of `graph`.
pub fn write_gat(graph: &OntologyGraph, writer: &mut dyn Write) -> Result<()> {
    writer.write_all(gat::encode(graph).as_bytes())?;
    Ok(())
}

/// Save `graph` as a `.gat` project file.
pub fn save_project(graph: &OntologyGraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, gat::encode(graph))?;
    tracing::debug!(path = %path.display(), "saved project");
    Ok(())
}

/// Load a `.gat` project file. Records that fail to decode are reported in
/// the result, not dropped silently.
pub fn load_project(path: impl AsRef<Path>) -> Result<Decoded> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let decoded = gat::decode(&text)?;
    tracing::debug!(path = %path.display(), dropped = decoded.errors.len(), "loaded project");
    Ok(decoded)
}

/// Write the Turtle rendering of `graph`.
pub fn write_turtle(
    graph: &OntologyGraph,
    prefixes: &PrefixTable,
    config: &TurtleConfig,
    writer: &mut dyn Write,
) -> Result<()> {
    writer.write_all(turtle::convert(graph, prefixes, config).as_bytes())?;
    Ok(())
}

/// Write instance data as full-IRI Turtle triples.
pub fn write_instance_turtle(data: &InstanceData, writer: &mut dyn Write) -> Result<()> {
    for triple in &data.triples {
        writeln!(writer, "{triple}")?;
    }
    Ok(())
}

/// Write instance data as RDF/XML.
#[cfg(feature = "rdf-xml")]
pub fn write_rdf_xml(data: &InstanceData, prefixes: &PrefixTable, writer: &mut dyn Write) -> Result<()> {
    writer.write_all(crate::integration::to_rdf_xml(data, prefixes)?.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Ellipse, Point};
    use crate::integration::{Term, Triple};

    #[test]
    fn test_write_gat_matches_encode() {
        let mut g = OntologyGraph::default();
        g.add_class("ex:A", Ellipse::new(Point::new(100.0, 100.0), 40.0, 20.0), false).unwrap();
        let mut buf = Vec::new();
        write_gat(&g, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), gat::encode(&g));
    }

    #[test]
    fn test_project_file_roundtrip() {
        let mut g = OntologyGraph::default();
        g.add_class("ex:A", Ellipse::new(Point::new(100.0, 100.0), 40.0, 20.0), false).unwrap();
        let path = std::env::temp_dir().join(format!("ontograph-export-{}.gat", std::process::id()));

        save_project(&g, &path).unwrap();
        let loaded = load_project(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(loaded.is_clean());
        assert_eq!(gat::encode(&loaded.graph), gat::encode(&g));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_project("/nonexistent/ontograph/project.gat").unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[test]
    fn test_write_instance_turtle() {
        let data = InstanceData {
            triples: vec![Triple::new(
                Term::Iri("http://example.org/a".into()),
                "http://example.org/p",
                Term::plain("v"),
            )],
            skipped: Vec::new(),
        };
        let mut buf = Vec::new();
        write_instance_turtle(&data, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "<http://example.org/a> <http://example.org/p> \"v\" .\n");
    }
}
