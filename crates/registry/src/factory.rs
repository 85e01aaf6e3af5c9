use std::sync::Arc;

use ledge_primitives::{AnnotationTag, TagKind, VisibleLine};

/// Geometry of a materialized margin glyph.
///
/// Appearance is owned by the host's rendering layer; the engine only needs
/// enough geometry to position the element and compute its base offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphVisual {
	pub width: f32,
	pub height: f32,
}

impl GlyphVisual {
	pub fn new(width: f32, height: f32) -> Self {
		Self { width, height }
	}
}

/// Capability to produce a visual element for one tag on one line.
///
/// Returning `None` means "no decoration for this tag"; the engine treats a
/// panicking factory the same way and keeps reconciling.
pub trait GlyphFactory: Send + Sync {
	fn produce(&self, line: &VisibleLine, tag: &AnnotationTag) -> Option<GlyphVisual>;
}

/// Source of a glyph factory for one tag kind.
///
/// Provider lists are the raw, possibly process-wide input from which each
/// engine instance builds its own [`crate::GlyphRegistry`]. A provider whose
/// `kind` is the placeholder is skipped at build time.
pub trait GlyphFactoryProvider: Send + Sync {
	fn kind(&self) -> TagKind;
	fn create_factory(&self) -> Arc<dyn GlyphFactory>;
}
