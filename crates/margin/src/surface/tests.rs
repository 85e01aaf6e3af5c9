use ledge_registry::GlyphVisual;

use crate::surface::SurfaceStack;

fn glyph() -> GlyphVisual {
	GlyphVisual::new(12.0, 12.0)
}

#[test]
fn insert_and_remove_round_trip() {
	let mut stack = SurfaceStack::new(2);

	let a = stack.insert(0, 10.0, glyph()).unwrap();
	let b = stack.insert(1, 26.0, glyph()).unwrap();
	assert_eq!(stack.element_count(), 2);
	assert_eq!(stack.top(a), Some(10.0));
	assert_eq!(stack.top(b), Some(26.0));

	stack.remove(a);
	assert_eq!(stack.element_count(), 1);
	assert_eq!(stack.top(a), None);
	assert_eq!(stack.top(b), Some(26.0));
}

#[test]
fn set_top_repositions_without_reallocating() {
	let mut stack = SurfaceStack::new(1);

	let handle = stack.insert(0, 10.0, glyph()).unwrap();
	stack.set_top(handle, 42.0);

	assert_eq!(stack.top(handle), Some(42.0));
	assert_eq!(stack.element_count(), 1);
	assert_eq!(stack.visual(handle), Some(glyph()));
}

#[test]
fn double_remove_is_ignored() {
	let mut stack = SurfaceStack::new(1);

	let handle = stack.insert(0, 0.0, glyph()).unwrap();
	stack.remove(handle);
	stack.remove(handle);

	assert_eq!(stack.element_count(), 0);
}

#[test]
fn insert_on_unknown_order_is_rejected() {
	let mut stack = SurfaceStack::new(1);
	assert!(stack.insert(5, 0.0, glyph()).is_none());
	assert_eq!(stack.element_count(), 0);
}

#[test]
fn clear_releases_all_layers() {
	let mut stack = SurfaceStack::new(3);
	for order in 0..3 {
		stack.insert(order, 0.0, glyph()).unwrap();
		stack.insert(order, 16.0, glyph()).unwrap();
	}
	assert_eq!(stack.element_count(), 6);

	stack.clear();
	assert_eq!(stack.element_count(), 0);
	assert_eq!(stack.layer_count(), 3);
}

#[test]
fn viewport_top_is_a_whole_stack_offset() {
	let mut stack = SurfaceStack::new(1);
	let handle = stack.insert(0, 8.0, glyph()).unwrap();

	stack.set_viewport_top(120.0);

	// Per-element tops are untouched; the stack offset moves everything.
	assert_eq!(stack.viewport_top(), 120.0);
	assert_eq!(stack.top(handle), Some(8.0));
}
