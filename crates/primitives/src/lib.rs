#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Value types shared across the margin overlay engine.
//!
//! This crate holds the leaf vocabulary: line identity tokens, buffer spans,
//! annotation tags, and selection snapshots. It has no async surface and no
//! I/O; everything here is plain data passed between the renderer seam, the
//! glyph registry, and the reconciliation engine.

mod line;
mod selection;
mod tag;

pub use line::{LineIdentity, LineSpan, VisibleLine};
pub use selection::{DocumentUri, SelectionSnapshot};
pub use tag::{AnnotationTag, TagKind};
