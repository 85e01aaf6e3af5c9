//! Identity-keyed decoration cache and the reconciliation pass.
//!
//! [`ReconcileEngine`] owns the cache of which decorations are currently
//! materialized for which lines and diffs it against every layout tick:
//!
//! - Reformatted lines carry *new* identities; their records are built from
//!   scratch (tag query, factory resolve, element materialization).
//! - Translated lines keep their identity; their decorations are repositioned
//!   from the cached base offset, never recreated.
//! - Still-visible lines untouched by the tick are carried forward unchanged.
//! - Everything left in the old cache afterwards is evicted and its elements
//!   released from the paint surfaces.
//!
//! # Error Handling
//!
//! - Tag kind with no registered factory: warn, skip the tag
//! - Factory panic: warn, skip the tag, keep the rest of the line
//! - Translate event for an untracked identity: debug, skip (benign race
//!   between the renderer's event streams)

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use ledge_primitives::{LineIdentity, TagKind, VisibleLine};
use ledge_registry::GlyphRegistry;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::collab::{LayoutSource, TagAggregator};
use crate::surface::{ElementHandle, SurfaceStack};

/// One visual element bound to a single tag instance on a single line.
#[derive(Debug, Clone)]
pub struct Decoration {
	pub kind: TagKind,
	/// Paint order from the registry.
	pub order: u32,
	/// Vertical offset within the line, derived once at creation. Re-querying
	/// element layout later is unreliable, so repositioning always starts
	/// from this cached value.
	pub base_top: f32,
	pub handle: ElementHandle,
}

/// All decorations currently materialized for one line, in ascending paint
/// order.
#[derive(Debug)]
pub struct LineRecord {
	pub identity: LineIdentity,
	pub decorations: SmallVec<[Decoration; 4]>,
}

/// Counters for one reconciliation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
	/// Decorations materialized this pass.
	pub created: usize,
	/// Lines repositioned in place.
	pub translated: usize,
	/// Lines carried forward unchanged.
	pub carried: usize,
	/// Line records evicted, elements released.
	pub evicted: usize,
	/// Tags skipped because no factory is registered for their kind.
	pub skipped_unknown_kind: usize,
	/// Tags skipped because the factory panicked.
	pub skipped_factory_failure: usize,
	/// Translate events referencing an identity the cache never saw.
	pub orphan_translates: usize,
}

/// The line reconciliation engine.
///
/// Exclusively owns its cache and every element it materialized; callers must
/// serialize access (the margin component wraps it in a mutex). One instance
/// per editor view.
pub struct ReconcileEngine {
	registry: GlyphRegistry,
	tags: Arc<dyn TagAggregator>,
	layout: Arc<dyn LayoutSource>,
	cache: FxHashMap<LineIdentity, LineRecord>,
	surfaces: SurfaceStack,
}

impl ReconcileEngine {
	/// Creates an engine with an empty cache and one paint layer per
	/// registered glyph kind.
	pub fn new(registry: GlyphRegistry, tags: Arc<dyn TagAggregator>, layout: Arc<dyn LayoutSource>) -> Self {
		let surfaces = SurfaceStack::new(registry.len());
		Self {
			registry,
			tags,
			layout,
			cache: FxHashMap::default(),
			surfaces,
		}
	}

	/// Clears all state and runs a full pass treating every visible line as
	/// new.
	pub fn initialize(&mut self) -> ReconcileStats {
		self.refresh()
	}

	/// Clears all decorations and replays the current visible-line set.
	///
	/// Used when upstream annotation data changed independently of layout and
	/// a full repaint is the simplest correct recovery.
	pub fn refresh(&mut self) -> ReconcileStats {
		self.clear();
		let visible = self.layout.visible_lines();
		self.on_layout_changed(&visible, &[])
	}

	/// Runs one reconciliation pass over a layout tick.
	pub fn on_layout_changed(&mut self, reformatted: &[VisibleLine], translated: &[VisibleLine]) -> ReconcileStats {
		let mut stats = ReconcileStats::default();
		let mut next: FxHashMap<LineIdentity, LineRecord> = FxHashMap::default();

		// New or reformatted lines: build records from scratch. An identity
		// already tracked (renderer reused it) or repeated within the tick is
		// evicted first so the cache never holds two records per identity.
		for line in reformatted {
			if let Some(stale) = self.cache.remove(&line.identity) {
				self.evict(stale, &mut stats);
			}
			let record = self.build_record(line, &mut stats);
			if let Some(duplicate) = next.insert(line.identity, record) {
				self.evict(duplicate, &mut stats);
			}
		}

		// Translated lines: same identity, new vertical position. Reposition
		// from the cached base offset without recreating elements.
		for line in translated {
			if next.contains_key(&line.identity) {
				// Rebuilt earlier in this tick; the fresh record already
				// carries the new position.
				continue;
			}
			match self.cache.remove(&line.identity) {
				Some(record) => {
					for decoration in &record.decorations {
						self.surfaces.set_top(decoration.handle, decoration.base_top + line.top);
					}
					stats.translated += 1;
					next.insert(line.identity, record);
				}
				None => {
					// Benign race: the renderer emitted a translate for a
					// line this cache never saw.
					debug!(identity = line.identity.0, "translate event for untracked line");
					stats.orphan_translates += 1;
				}
			}
		}

		// Carry forward still-visible lines the tick did not mention.
		for line in self.layout.visible_lines() {
			if next.contains_key(&line.identity) {
				continue;
			}
			if let Some(record) = self.cache.remove(&line.identity) {
				stats.carried += 1;
				next.insert(line.identity, record);
			}
		}

		// Whatever stayed behind is no longer visible.
		let stale = std::mem::take(&mut self.cache);
		for (_, record) in stale {
			self.evict(record, &mut stats);
		}

		self.cache = next;
		stats
	}

	/// Releases every element and clears the cache.
	pub fn clear(&mut self) {
		let records = std::mem::take(&mut self.cache);
		for (_, record) in records {
			for decoration in record.decorations {
				self.surfaces.remove(decoration.handle);
			}
		}
		self.surfaces.clear();
	}

	/// Moves the whole margin surface to a new viewport top.
	pub fn set_viewport_top(&mut self, top: f32) {
		self.surfaces.set_viewport_top(top);
	}

	/// Number of lines currently tracked.
	pub fn record_count(&self) -> usize {
		self.cache.len()
	}

	/// Live elements across all paint surfaces.
	pub fn element_count(&self) -> usize {
		self.surfaces.element_count()
	}

	/// The record for a line, if tracked.
	pub fn record(&self, identity: LineIdentity) -> Option<&LineRecord> {
		self.cache.get(&identity)
	}

	/// The paint surfaces, for host composition.
	pub fn surfaces(&self) -> &SurfaceStack {
		&self.surfaces
	}

	fn build_record(&mut self, line: &VisibleLine, stats: &mut ReconcileStats) -> LineRecord {
		let mut decorations: SmallVec<[Decoration; 4]> = SmallVec::new();

		for tag in self.tags.tags(line.span) {
			let Some(descriptor) = self.registry.resolve(&tag.kind) else {
				// Configuration gap, not a failure: the host shipped a tag
				// kind without registering a factory for it.
				warn!(kind = %tag.kind, "no glyph factory for tag kind, skipping");
				stats.skipped_unknown_kind += 1;
				continue;
			};

			let produced = catch_unwind(AssertUnwindSafe(|| descriptor.factory.produce(line, &tag)));
			let visual = match produced {
				Ok(Some(visual)) => visual,
				Ok(None) => continue,
				Err(_) => {
					warn!(kind = %tag.kind, "glyph factory panicked, skipping tag");
					stats.skipped_factory_failure += 1;
					continue;
				}
			};

			// Base offset is computed exactly once, at creation.
			let base_top = ((line.height - visual.height) / 2.0).max(0.0);
			let Some(handle) = self.surfaces.insert(descriptor.order, base_top + line.top, visual) else {
				stats.skipped_factory_failure += 1;
				continue;
			};

			decorations.push(Decoration {
				kind: descriptor.kind.clone(),
				order: descriptor.order,
				base_top,
				handle,
			});
		}

		// Tags arrive in discovery order; records store paint order.
		decorations.sort_by_key(|d| d.order);
		stats.created += decorations.len();

		LineRecord {
			identity: line.identity,
			decorations,
		}
	}

	fn evict(&mut self, record: LineRecord, stats: &mut ReconcileStats) {
		for decoration in record.decorations {
			self.surfaces.remove(decoration.handle);
		}
		stats.evicted += 1;
	}
}
