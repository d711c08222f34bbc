//! Well-known RDF, RDFS, OWL and XSD terms.

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

pub const RDF_TYPE_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_LABEL_IRI: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_COMMENT_IRI: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

pub const RDF_TYPE: &str = "rdf:type";
pub const RDF_PROPERTY: &str = "rdf:Property";
pub const RDFS_LABEL: &str = "rdfs:label";
pub const RDFS_COMMENT: &str = "rdfs:comment";
pub const RDFS_DOMAIN: &str = "rdfs:domain";
pub const RDFS_RANGE: &str = "rdfs:range";
pub const RDFS_LITERAL: &str = "rdfs:Literal";
pub const OWL_CLASS: &str = "owl:Class";
pub const OWL_OBJECT_PROPERTY: &str = "owl:ObjectProperty";
pub const OWL_DATATYPE_PROPERTY: &str = "owl:DatatypeProperty";

pub const XSD_STRING: &str = "xsd:string";
pub const XSD_BOOLEAN: &str = "xsd:boolean";
pub const XSD_INTEGER: &str = "xsd:integer";
pub const XSD_DECIMAL: &str = "xsd:decimal";
pub const XSD_DOUBLE: &str = "xsd:double";
pub const RDF_LANG_STRING: &str = "rdf:langString";

/// Acronyms whose terms are built-in vocabulary, never declared as properties.
pub const BUILTIN_ACRONYMS: &[&str] = &["rdf", "rdfs", "owl", "xsd"];

/// XSD datatypes whose values are written bare in Turtle.
const BARE_XSD_LOCAL_NAMES: &[&str] = &[
    "boolean",
    "integer",
    "decimal",
    "double",
    "float",
    "int",
    "long",
    "short",
    "byte",
    "nonNegativeInteger",
    "nonPositiveInteger",
    "positiveInteger",
    "negativeInteger",
    "unsignedInt",
    "unsignedLong",
    "unsignedShort",
    "unsignedByte",
];

/// Whether `predicate` is the RDF type predicate in any of its spellings:
/// `a`, `rdf:type`, or the full IRI with or without angle brackets.
pub fn is_type_predicate(predicate: &str) -> bool {
    let bare = predicate
        .strip_prefix('<')
        .and_then(|p| p.strip_suffix('>'))
        .unwrap_or(predicate);
    predicate == "a" || predicate == RDF_TYPE || bare == RDF_TYPE_IRI
}

/// Local name of an XSD datatype given as `xsd:x` or as a full IRI.
pub fn xsd_local_name(datatype: &str) -> Option<&str> {
    let bare = datatype
        .strip_prefix('<')
        .and_then(|d| d.strip_suffix('>'))
        .unwrap_or(datatype);
    bare.strip_prefix("xsd:").or_else(|| bare.strip_prefix(XSD_NS))
}

/// Namespace of a built-in vocabulary acronym, used when a prefix table
/// leaves it undeclared.
pub fn standard_namespace(acronym: &str) -> Option<&'static str> {
    match acronym {
        "rdf" => Some(RDF_NS),
        "rdfs" => Some(RDFS_NS),
        "owl" => Some(OWL_NS),
        "xsd" => Some(XSD_NS),
        _ => None,
    }
}

/// `xsd:string` or no datatype at all.
pub fn is_string_datatype(datatype: Option<&str>) -> bool {
    match datatype {
        None => true,
        Some(dt) => dt.is_empty() || xsd_local_name(dt) == Some("string"),
    }
}

/// Numeric and boolean XSD datatypes.
pub fn is_bare_datatype(datatype: &str) -> bool {
    xsd_local_name(datatype).is_some_and(|local| BARE_XSD_LOCAL_NAMES.contains(&local))
}
