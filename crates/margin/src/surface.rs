//! Paint-order layered element surfaces.
//!
//! Each registered glyph kind paints on its own layer, indexed by the
//! registry's paint order, so per-line ordering needs no z-stack sorting.
//! Elements live in a slab arena and are addressed by [`ElementHandle`];
//! the engine never holds element pointers.

use ledge_registry::GlyphVisual;
use slab::Slab;
use tracing::warn;

/// Stable handle to one materialized element on one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHandle {
	order: u32,
	key: usize,
}

#[derive(Debug, Clone, Copy)]
struct Element {
	top: f32,
	visual: GlyphVisual,
}

#[derive(Debug, Default)]
struct Surface {
	elements: Slab<Element>,
}

/// One surface per paint order, plus a whole-stack viewport offset.
///
/// The viewport offset repositions the entire margin in one move when the
/// viewport top changes; it is distinct from per-line repositioning and
/// does not touch individual elements.
#[derive(Debug)]
pub struct SurfaceStack {
	surfaces: Vec<Surface>,
	viewport_top: f32,
}

impl SurfaceStack {
	/// Creates a stack with one layer per registered glyph kind.
	pub fn new(layer_count: usize) -> Self {
		let mut surfaces = Vec::with_capacity(layer_count);
		surfaces.resize_with(layer_count, Surface::default);
		Self {
			surfaces,
			viewport_top: 0.0,
		}
	}

	/// Materializes an element on the layer for `order`.
	///
	/// Returns `None` when `order` has no layer, which indicates a descriptor
	/// that never went through the registry build.
	pub fn insert(&mut self, order: u32, top: f32, visual: GlyphVisual) -> Option<ElementHandle> {
		let Some(surface) = self.surfaces.get_mut(order as usize) else {
			warn!(order, "no paint surface for glyph order");
			return None;
		};
		let key = surface.elements.insert(Element { top, visual });
		Some(ElementHandle { order, key })
	}

	/// Releases an element. Removing a handle twice is logged and ignored.
	pub fn remove(&mut self, handle: ElementHandle) {
		let Some(surface) = self.surfaces.get_mut(handle.order as usize) else {
			warn!(order = handle.order, "remove on unknown paint surface");
			return;
		};
		if surface.elements.try_remove(handle.key).is_none() {
			warn!(order = handle.order, key = handle.key, "element already released");
		}
	}

	/// Repositions an element vertically.
	pub fn set_top(&mut self, handle: ElementHandle, top: f32) {
		if let Some(element) = self.surfaces.get_mut(handle.order as usize).and_then(|s| s.elements.get_mut(handle.key)) {
			element.top = top;
		} else {
			warn!(order = handle.order, key = handle.key, "set_top on released element");
		}
	}

	/// Current top of an element, if it is live.
	pub fn top(&self, handle: ElementHandle) -> Option<f32> {
		self.surfaces.get(handle.order as usize).and_then(|s| s.elements.get(handle.key)).map(|e| e.top)
	}

	/// Geometry of an element, if it is live.
	pub fn visual(&self, handle: ElementHandle) -> Option<GlyphVisual> {
		self.surfaces.get(handle.order as usize).and_then(|s| s.elements.get(handle.key)).map(|e| e.visual)
	}

	/// Releases every element on every layer.
	pub fn clear(&mut self) {
		for surface in &mut self.surfaces {
			surface.elements.clear();
		}
	}

	/// Total live elements across all layers.
	pub fn element_count(&self) -> usize {
		self.surfaces.iter().map(|s| s.elements.len()).sum()
	}

	/// Number of paint layers.
	pub fn layer_count(&self) -> usize {
		self.surfaces.len()
	}

	/// Moves the whole stack to a new viewport top.
	pub fn set_viewport_top(&mut self, top: f32) {
		self.viewport_top = top;
	}

	pub fn viewport_top(&self) -> f32 {
		self.viewport_top
	}
}

#[cfg(test)]
mod tests;
