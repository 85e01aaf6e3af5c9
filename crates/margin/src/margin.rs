//! Host-facing margin component: lifecycle, visibility, and event routing.

use std::sync::Arc;

use ledge_primitives::{SelectionSnapshot, VisibleLine};
use ledge_registry::{GlyphFactoryProvider, GlyphRegistry};
use parking_lot::Mutex;
use tracing::debug;

use crate::collab::{AnnotationService, HostPanel, LayoutSource, TagAggregator};
use crate::config::MarginConfig;
use crate::error::MarginError;
use crate::reconcile::{ReconcileEngine, ReconcileStats};
use crate::selection::{SelectionPipeline, SelectionPipelineHandle};

/// Builder collecting the collaborators an [`AnnotationMargin`] requires.
///
/// `build` fails fast with [`MarginError::MissingCollaborator`] when a seam
/// was never wired; a margin without its collaborators indicates a
/// host-wiring bug, not a runtime condition.
#[derive(Default)]
pub struct AnnotationMarginBuilder {
	config: MarginConfig,
	tags: Option<Arc<dyn TagAggregator>>,
	layout: Option<Arc<dyn LayoutSource>>,
	host_panel: Option<Arc<dyn HostPanel>>,
	annotations: Option<Arc<dyn AnnotationService>>,
	providers: Vec<Arc<dyn GlyphFactoryProvider>>,
}

impl AnnotationMarginBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn config(mut self, config: MarginConfig) -> Self {
		self.config = config;
		self
	}

	pub fn tag_aggregator(mut self, tags: Arc<dyn TagAggregator>) -> Self {
		self.tags = Some(tags);
		self
	}

	pub fn layout_source(mut self, layout: Arc<dyn LayoutSource>) -> Self {
		self.layout = Some(layout);
		self
	}

	pub fn host_panel(mut self, host_panel: Arc<dyn HostPanel>) -> Self {
		self.host_panel = Some(host_panel);
		self
	}

	pub fn annotation_service(mut self, annotations: Arc<dyn AnnotationService>) -> Self {
		self.annotations = Some(annotations);
		self
	}

	/// Appends glyph factory providers. The list may be process-wide; the
	/// registry resolved from it at `on_session_ready` is per-instance.
	pub fn providers(mut self, providers: impl IntoIterator<Item = Arc<dyn GlyphFactoryProvider>>) -> Self {
		self.providers.extend(providers);
		self
	}

	pub fn build(self) -> Result<AnnotationMargin, MarginError> {
		Ok(AnnotationMargin {
			config: self.config,
			tags: self.tags.ok_or(MarginError::MissingCollaborator("tag aggregator"))?,
			layout: self.layout.ok_or(MarginError::MissingCollaborator("layout source"))?,
			host_panel: self.host_panel.ok_or(MarginError::MissingCollaborator("host panel"))?,
			annotations: self.annotations.ok_or(MarginError::MissingCollaborator("annotation service"))?,
			providers: self.providers,
			inner: Mutex::new(Inner::default()),
		})
	}
}

#[derive(Default)]
struct Inner {
	engine: Option<ReconcileEngine>,
	pipeline: Option<SelectionPipelineHandle>,
	initialized: bool,
	visible: bool,
	disposed: bool,
}

/// The annotation margin component.
///
/// One instance per editor view. All layout-facing operations serialize on an
/// internal mutex, which also guards `on_session_ready` against re-entrant
/// ready signals; the guarded flag makes repeated ready calls cheap no-ops.
pub struct AnnotationMargin {
	config: MarginConfig,
	tags: Arc<dyn TagAggregator>,
	layout: Arc<dyn LayoutSource>,
	host_panel: Arc<dyn HostPanel>,
	annotations: Arc<dyn AnnotationService>,
	providers: Vec<Arc<dyn GlyphFactoryProvider>>,
	inner: Mutex<Inner>,
}

impl AnnotationMargin {
	pub fn builder() -> AnnotationMarginBuilder {
		AnnotationMarginBuilder::new()
	}

	/// Initializes the margin for a new session.
	///
	/// Builds the per-instance glyph registry, resets the cache, spawns the
	/// selection pipeline, and runs the initial full reconciliation.
	/// Idempotent: a second ready signal while already initialized is a
	/// no-op. Must be called within a Tokio runtime (the pipeline task is
	/// spawned here).
	pub fn on_session_ready(&self) -> Result<(), MarginError> {
		let mut inner = self.inner.lock();
		self.ensure_live(&inner)?;
		if inner.initialized {
			debug!("session ready while already initialized, ignoring");
			return Ok(());
		}

		let registry = GlyphRegistry::build(&self.providers);
		let mut engine = ReconcileEngine::new(registry, Arc::clone(&self.tags), Arc::clone(&self.layout));
		engine.initialize();
		inner.engine = Some(engine);
		inner.pipeline = Some(SelectionPipeline::spawn(&self.config, Arc::clone(&self.annotations), Arc::clone(&self.host_panel)));
		inner.initialized = true;
		inner.visible = true;
		Ok(())
	}

	/// Tears the session down.
	///
	/// Releases every materialized element, clears the cache, shuts the
	/// pipeline down, and resets the initialized flag so a later session
	/// ready re-initializes from scratch. Safe to call from any state,
	/// including before any `on_session_ready` and repeatedly.
	pub fn on_session_logout(&self) -> Result<(), MarginError> {
		let mut inner = self.inner.lock();
		self.ensure_live(&inner)?;
		Self::teardown(&mut inner);
		Ok(())
	}

	/// Terminal disposal. Every later call fails with
	/// [`MarginError::Disposed`].
	pub fn dispose(&self) -> Result<(), MarginError> {
		let mut inner = self.inner.lock();
		self.ensure_live(&inner)?;
		Self::teardown(&mut inner);
		inner.disposed = true;
		Ok(())
	}

	/// Routes a layout tick into the reconciliation engine.
	///
	/// Before the session is ready this is a no-op; renderer callbacks may
	/// race the ready signal.
	pub fn on_layout_changed(&self, reformatted: &[VisibleLine], translated: &[VisibleLine]) -> Result<ReconcileStats, MarginError> {
		let mut inner = self.inner.lock();
		self.ensure_live(&inner)?;
		match inner.engine.as_mut() {
			Some(engine) => Ok(engine.on_layout_changed(reformatted, translated)),
			None => {
				debug!("layout tick before initialization, ignoring");
				Ok(ReconcileStats::default())
			}
		}
	}

	/// Clears and replays all decorations against the current visible set.
	pub fn refresh(&self) -> Result<ReconcileStats, MarginError> {
		let mut inner = self.inner.lock();
		self.ensure_live(&inner)?;
		match inner.engine.as_mut() {
			Some(engine) => Ok(engine.refresh()),
			None => Ok(ReconcileStats::default()),
		}
	}

	/// Repositions the whole margin surface for a viewport-top change.
	pub fn on_viewport_top_changed(&self, top: f32) -> Result<(), MarginError> {
		let mut inner = self.inner.lock();
		self.ensure_live(&inner)?;
		if let Some(engine) = inner.engine.as_mut() {
			engine.set_viewport_top(top);
		}
		Ok(())
	}

	/// Feeds a selection change into the debounce pipeline.
	pub fn on_selection_changed(&self, snapshot: SelectionSnapshot) -> Result<(), MarginError> {
		let inner = self.inner.lock();
		self.ensure_live(&inner)?;
		match inner.pipeline.as_ref() {
			Some(pipeline) => {
				pipeline.notify(snapshot);
			}
			None => debug!("selection change before initialization, ignoring"),
		}
		Ok(())
	}

	pub fn show(&self) -> Result<(), MarginError> {
		self.toggle(true)
	}

	pub fn hide(&self) -> Result<(), MarginError> {
		self.toggle(false)
	}

	pub fn toggle(&self, visible: bool) -> Result<(), MarginError> {
		let mut inner = self.inner.lock();
		self.ensure_live(&inner)?;
		inner.visible = visible;
		Ok(())
	}

	/// True while initialized, visible, and not disposed.
	pub fn is_enabled(&self) -> bool {
		let inner = self.inner.lock();
		!inner.disposed && inner.initialized && inner.visible
	}

	/// Width the host should reserve for the margin.
	pub fn current_width(&self) -> f32 {
		if self.is_enabled() { self.config.width } else { 0.0 }
	}

	/// Live decoration elements, for host diagnostics.
	pub fn decoration_count(&self) -> usize {
		self.inner.lock().engine.as_ref().map_or(0, ReconcileEngine::element_count)
	}

	fn ensure_live(&self, inner: &Inner) -> Result<(), MarginError> {
		if inner.disposed {
			return Err(MarginError::Disposed);
		}
		Ok(())
	}

	fn teardown(inner: &mut Inner) {
		if let Some(mut engine) = inner.engine.take() {
			engine.clear();
		}
		if let Some(pipeline) = inner.pipeline.take() {
			pipeline.shutdown();
		}
		inner.initialized = false;
		inner.visible = false;
	}
}
