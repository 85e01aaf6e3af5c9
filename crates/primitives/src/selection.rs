use serde::{Deserialize, Serialize};

use crate::line::LineSpan;

/// Identity of the document a selection or annotation request refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentUri(String);

impl DocumentUri {
	pub fn new(uri: impl Into<String>) -> Self {
		Self(uri.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// One observation of the editor selection, sampled by the debounce pipeline.
///
/// `generation` increases monotonically per pipeline; only the
/// highest-generation snapshot inside a quiet window may produce a downstream
/// call, and earlier snapshots in that window are discarded, not queued.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
	pub generation: u64,
	pub document: DocumentUri,
	pub has_selection: bool,
	/// Anchor span of the selection, when one exists.
	pub span: Option<LineSpan>,
	/// Selected text, empty when `has_selection` is false.
	pub text: String,
	pub has_unsaved_changes: bool,
}

impl SelectionSnapshot {
	/// Creates a snapshot describing an empty selection.
	pub fn empty(document: DocumentUri) -> Self {
		Self {
			generation: 0,
			document,
			has_selection: false,
			span: None,
			text: String::new(),
			has_unsaved_changes: false,
		}
	}

	/// Creates a snapshot describing a non-empty selection.
	pub fn selected(document: DocumentUri, span: LineSpan, text: impl Into<String>, has_unsaved_changes: bool) -> Self {
		Self {
			generation: 0,
			document,
			has_selection: true,
			span: Some(span),
			text: text.into(),
			has_unsaved_changes,
		}
	}
}
