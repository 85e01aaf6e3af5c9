use serde::{Deserialize, Serialize};

/// Opaque, renderer-supplied token identifying one logical line instance.
///
/// The renderer keeps the token stable while a line is merely scrolled or
/// repositioned. A line whose content or position changes enough to require
/// re-layout is issued a *new* identity and must be treated as removed+added,
/// never patched in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineIdentity(pub u64);

/// Half-open byte span `[start, end)` of a line within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
	pub start: u32,
	pub end: u32,
}

impl LineSpan {
	/// Creates a new span. `end < start` is normalized to an empty span.
	pub fn new(start: u32, end: u32) -> Self {
		Self {
			start,
			end: end.max(start),
		}
	}

	/// Returns the span length in bytes.
	pub fn len(&self) -> u32 {
		self.end - self.start
	}

	/// Returns true when the span covers no bytes.
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Returns true when the two spans share at least one byte.
	pub fn intersects(&self, other: &LineSpan) -> bool {
		self.start < other.end && other.start < self.end
	}

	/// Returns true when `offset` falls inside the span.
	pub fn contains(&self, offset: u32) -> bool {
		offset >= self.start && offset < self.end
	}
}

/// Per-line report from the renderer: identity, buffer span, and layout
/// geometry in view-relative pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleLine {
	pub identity: LineIdentity,
	pub span: LineSpan,
	/// Vertical position of the line's top edge.
	pub top: f32,
	/// Rendered line height.
	pub height: f32,
}

impl VisibleLine {
	pub fn new(identity: LineIdentity, span: LineSpan, top: f32, height: f32) -> Self {
		Self {
			identity,
			span,
			top,
			height,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn span_intersection_is_half_open() {
		let a = LineSpan::new(0, 10);
		let b = LineSpan::new(10, 20);
		let c = LineSpan::new(9, 11);

		assert!(!a.intersects(&b));
		assert!(a.intersects(&c));
		assert!(b.intersects(&c));
	}

	#[test]
	fn empty_span_intersects_nothing() {
		let empty = LineSpan::new(5, 5);
		let covering = LineSpan::new(0, 10);

		assert!(!empty.intersects(&covering));
		assert!(!covering.intersects(&empty));
	}

	#[test]
	fn inverted_span_normalizes_to_empty() {
		let span = LineSpan::new(8, 3);
		assert!(span.is_empty());
		assert_eq!(span.len(), 0);
	}
}
