#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Viewport-synchronized annotation margin engine.
//!
//! Keeps per-line glyph decorations correct while a virtualized text renderer
//! scrolls, reflows, and edits the document underneath them. Only a window of
//! lines exists as live objects at any time and reflowed lines are recreated
//! under new identities, so the engine runs an identity-keyed reconciliation
//! pass on every layout tick instead of repainting the whole margin.
//!
//! # Main Types
//!
//! - [`AnnotationMargin`] - host-facing component tying lifecycle, engine,
//!   and pipeline together
//! - [`ReconcileEngine`] - the incremental diff over the line cache
//! - [`SelectionPipeline`] - debounced selection-to-annotation requests
//!
//! # Architecture
//!
//! ```text
//! renderer layout tick ─► AnnotationMargin ─► ReconcileEngine ─► SurfaceStack
//! selection change ─────► SelectionPipeline ─► AnnotationService
//! ```
//!
//! Layout events and selection events never share mutable state: the pipeline
//! only reads host-panel visibility, so the reconciliation pass stays
//! single-threaded per engine instance.

/// Collaborator seams owned by the host.
pub mod collab;
/// Margin configuration.
pub mod config;
mod error;
/// Identity-keyed decoration cache and the reconciliation pass.
pub mod reconcile;
/// Debounced selection sampling and annotation dispatch.
pub mod selection;
/// Paint-order layered element surfaces.
pub mod surface;

mod margin;

pub use collab::{AnnotationRequest, AnnotationService, HostPanel, LayoutSource, TagAggregator};
pub use config::MarginConfig;
pub use error::{AnnotationError, MarginError};
pub use margin::{AnnotationMargin, AnnotationMarginBuilder};
pub use reconcile::{ReconcileEngine, ReconcileStats};
pub use selection::{SelectionPipeline, SelectionPipelineHandle};
pub use surface::{ElementHandle, SurfaceStack};
