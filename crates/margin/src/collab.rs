//! Seams to the host: tag discovery, layout queries, panel visibility, and
//! the downstream annotation service.

use async_trait::async_trait;
use ledge_primitives::{AnnotationTag, DocumentUri, LineIdentity, LineSpan, VisibleLine};
use tokio_util::sync::CancellationToken;

use crate::error::AnnotationError;

/// Source of per-line annotation tags.
///
/// Queried once per reformatted line on every reconciliation pass, so
/// implementations must be cheap and repeatable.
pub trait TagAggregator: Send + Sync {
	fn tags(&self, span: LineSpan) -> Vec<AnnotationTag>;
}

/// Renderer-side layout queries.
pub trait LayoutSource: Send + Sync {
	/// Current visible-line set, in document order.
	fn visible_lines(&self) -> Vec<VisibleLine>;
	/// Current vertical position of a line, if it is still live.
	fn line_top(&self, identity: LineIdentity) -> Option<f32>;
}

/// Host panel visibility query.
pub trait HostPanel: Send + Sync {
	fn is_panel_visible(&self, panel: &str) -> bool;
}

/// Payload of one downstream annotation-preparation call.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRequest {
	pub document: DocumentUri,
	pub span: Option<LineSpan>,
	pub text: String,
	pub has_unsaved_changes: bool,
}

/// Downstream annotation service.
///
/// The call may suspend; cancellation is cooperative through the provided
/// token and a cancelled call reports [`AnnotationError::Cancelled`].
#[async_trait]
pub trait AnnotationService: Send + Sync {
	async fn prepare_annotation(&self, request: AnnotationRequest, cancel: CancellationToken) -> Result<(), AnnotationError>;
}
