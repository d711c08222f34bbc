//! # GAT — diagram persistence format
//!
//! A flat, bracket-delimited, escaped text format. Order is significant.
//!
//! ```text
//! G<width>x<height>[<record>][<record>]...
//! ```
//!
//! | Tag | Record | Fields (`|`-separated) |
//! |-----|--------|------------------------|
//! | `G` | canvas size | none; always first, unbracketed |
//! | `C` | class | centerX, centerY, radiusX, radiusY, fill, flag, name, rdfs-label, rdfs-comment |
//! | `L` | literal | layoutX, layoutY, width, height, fill, flag, name, datatype |
//! | `A` | straight edge | startX, startY, endX, endY, layout-anchor, name |
//! | `R` | self-referential edge | centerX, centerY, radiusX, radiusY, layoutX, layoutY, name |
//!
//! `flag` is `g` (global) or `i` (instance). Inside field values a
//! backslash escapes `\`, `|`, `[` and `]`; `\n` and `\r` stand for line
//! breaks.

pub mod decode;
pub mod encode;
pub mod lexer;

pub use decode::{Decoded, RecordError, decode};
pub use encode::encode;

/// Conventional file extension for GAT documents.
pub const FILE_EXTENSION: &str = "gat";
