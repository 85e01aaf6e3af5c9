use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ledge_primitives::{AnnotationTag, TagKind, VisibleLine};

use crate::factory::{GlyphFactory, GlyphFactoryProvider, GlyphVisual};
use crate::registry::GlyphRegistry;

struct FixedGlyph(f32);

impl GlyphFactory for FixedGlyph {
	fn produce(&self, _line: &VisibleLine, _tag: &AnnotationTag) -> Option<GlyphVisual> {
		Some(GlyphVisual::new(self.0, self.0))
	}
}

struct Provider {
	kind: TagKind,
	width: f32,
	created: Arc<AtomicU64>,
}

impl Provider {
	fn new(kind: &'static str, width: f32) -> Arc<dyn GlyphFactoryProvider> {
		Arc::new(Self {
			kind: TagKind::from_static(kind),
			width,
			created: Arc::new(AtomicU64::new(0)),
		})
	}
}

impl GlyphFactoryProvider for Provider {
	fn kind(&self) -> TagKind {
		self.kind.clone()
	}

	fn create_factory(&self) -> Arc<dyn GlyphFactory> {
		self.created.fetch_add(1, Ordering::Relaxed);
		Arc::new(FixedGlyph(self.width))
	}
}

fn line() -> VisibleLine {
	VisibleLine::new(ledge_primitives::LineIdentity(1), ledge_primitives::LineSpan::new(0, 10), 0.0, 16.0)
}

#[test]
fn orders_follow_provider_sequence() {
	let registry = GlyphRegistry::build(&[
		Provider::new("comment", 8.0),
		Provider::new("bookmark", 8.0),
		Provider::new("diff", 8.0),
	]);

	assert_eq!(registry.len(), 3);
	assert_eq!(registry.resolve(&"comment".into()).unwrap().order, 0);
	assert_eq!(registry.resolve(&"bookmark".into()).unwrap().order, 1);
	assert_eq!(registry.resolve(&"diff".into()).unwrap().order, 2);

	let kinds: Vec<&str> = registry.ordered_kinds().map(TagKind::as_str).collect();
	assert_eq!(kinds, ["comment", "bookmark", "diff"]);
}

#[test]
fn first_registration_wins_for_duplicate_kind() {
	let registry = GlyphRegistry::build(&[Provider::new("comment", 8.0), Provider::new("comment", 99.0)]);

	assert_eq!(registry.len(), 1);
	let descriptor = registry.resolve(&"comment".into()).unwrap();
	assert_eq!(descriptor.order, 0);

	let visual = descriptor.factory.produce(&line(), &AnnotationTag::marker("comment")).unwrap();
	assert_eq!(visual.width, 8.0);
}

#[test]
fn placeholder_kind_is_never_registered() {
	let registry = GlyphRegistry::build(&[Provider::new("", 8.0), Provider::new("comment", 8.0)]);

	assert_eq!(registry.len(), 1);
	assert_eq!(registry.resolve(&"comment".into()).unwrap().order, 0);
	assert!(registry.resolve(&TagKind::EMPTY).is_none());
}

#[test]
fn resolve_unknown_kind_returns_none() {
	let registry = GlyphRegistry::build(&[Provider::new("comment", 8.0)]);
	assert!(registry.resolve(&"unknown".into()).is_none());
}

#[test]
fn empty_provider_list_builds_empty_registry() {
	let registry = GlyphRegistry::build(&[]);
	assert!(registry.is_empty());
	assert_eq!(registry.ordered_kinds().count(), 0);
}
