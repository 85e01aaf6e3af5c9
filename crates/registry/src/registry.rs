use std::sync::Arc;

use ledge_primitives::TagKind;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::factory::{GlyphFactory, GlyphFactoryProvider};

/// A registered glyph factory with its resolved paint order.
pub struct GlyphDescriptor {
	pub kind: TagKind,
	/// Paint order within a line, ascending. Assigned by first-seen sequence
	/// over the provider list, dense in `0..registry.len()`.
	pub order: u32,
	pub factory: Arc<dyn GlyphFactory>,
}

/// Per-instance table mapping tag kinds to glyph descriptors.
///
/// Built once from a provider list; the type exposes no mutation after
/// [`GlyphRegistry::build`]. Duplicate kind registration is a silent no-op
/// (first registration wins) and placeholder kinds are never registered.
pub struct GlyphRegistry {
	descriptors: Vec<GlyphDescriptor>,
	by_kind: FxHashMap<TagKind, usize>,
}

impl GlyphRegistry {
	/// Builds a registry from a provider list.
	pub fn build(providers: &[Arc<dyn GlyphFactoryProvider>]) -> Self {
		let mut descriptors = Vec::with_capacity(providers.len());
		let mut by_kind = FxHashMap::default();

		for provider in providers {
			let kind = provider.kind();
			if kind.is_placeholder() {
				debug!("skipping glyph factory provider with placeholder kind");
				continue;
			}
			if by_kind.contains_key(&kind) {
				debug!(kind = %kind, "duplicate glyph factory registration ignored");
				continue;
			}

			let order = descriptors.len() as u32;
			by_kind.insert(kind.clone(), descriptors.len());
			descriptors.push(GlyphDescriptor {
				kind,
				order,
				factory: provider.create_factory(),
			});
		}

		Self { descriptors, by_kind }
	}

	/// Resolves the descriptor for a tag kind.
	pub fn resolve(&self, kind: &TagKind) -> Option<&GlyphDescriptor> {
		self.by_kind.get(kind).map(|&idx| &self.descriptors[idx])
	}

	/// Registered kinds in ascending paint order.
	pub fn ordered_kinds(&self) -> impl Iterator<Item = &TagKind> {
		self.descriptors.iter().map(|d| &d.kind)
	}

	/// Number of registered kinds, which is also the paint-layer count.
	pub fn len(&self) -> usize {
		self.descriptors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.descriptors.is_empty()
	}
}

#[cfg(test)]
mod tests;
