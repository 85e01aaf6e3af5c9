//! Debounced selection sampling and annotation dispatch.
//!
//! [`SelectionPipeline`] owns a background task running the state machine
//! `Idle -> Sampling -> Dispatching -> Idle`. Raw selection changes land in a
//! single-slot watch channel, so the latest snapshot always wins and earlier
//! ones inside a quiet window are discarded, not queued. The task awaits each
//! downstream call before sampling again, which keeps at most one dispatch in
//! flight per editor instance.
//!
//! Cancellation is cooperative: superseded snapshots are simply never acted
//! on, and the pipeline token is handed through to in-flight calls so the
//! host can impose external timeouts.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ledge_primitives::SelectionSnapshot;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::collab::{AnnotationRequest, AnnotationService, HostPanel};
use crate::config::MarginConfig;
use crate::error::AnnotationError;

/// Handle to a running selection pipeline.
pub struct SelectionPipelineHandle {
	tx: watch::Sender<Option<SelectionSnapshot>>,
	generation: AtomicU64,
	cancel: CancellationToken,
	shared: Arc<PipelineShared>,
}

#[derive(Default)]
struct PipelineShared {
	dispatches: AtomicU64,
	last_outcome: Mutex<Option<Result<(), AnnotationError>>>,
}

impl SelectionPipelineHandle {
	/// Feeds a raw selection change into the pipeline.
	///
	/// Stamps the snapshot with the next generation and resets the quiet
	/// window. Returns the stamped generation.
	pub fn notify(&self, mut snapshot: SelectionSnapshot) -> u64 {
		let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
		snapshot.generation = generation;
		self.tx.send_replace(Some(snapshot));
		generation
	}

	/// Requests cooperative shutdown of the pipeline task.
	pub fn shutdown(&self) {
		self.cancel.cancel();
	}

	/// Total downstream calls dispatched so far.
	pub fn dispatch_count(&self) -> u64 {
		self.shared.dispatches.load(Ordering::Acquire)
	}

	/// Outcome of the most recent dispatch, if any completed.
	pub fn last_outcome(&self) -> Option<Result<(), AnnotationError>> {
		self.shared.last_outcome.lock().clone()
	}
}

impl Drop for SelectionPipelineHandle {
	fn drop(&mut self) {
		self.cancel.cancel();
	}
}

/// The debounce pipeline: samples selection changes and issues at most one
/// coalesced annotation request per quiet window.
pub struct SelectionPipeline;

impl SelectionPipeline {
	/// Spawns the pipeline task. Must be called within a Tokio runtime.
	pub fn spawn(config: &MarginConfig, service: Arc<dyn AnnotationService>, host_panel: Arc<dyn HostPanel>) -> SelectionPipelineHandle {
		let (tx, rx) = watch::channel(None);
		let cancel = CancellationToken::new();
		let shared = Arc::new(PipelineShared::default());

		tokio::spawn(run(
			rx,
			config.quiet_window(),
			config.panel.clone(),
			service,
			host_panel,
			cancel.clone(),
			Arc::clone(&shared),
		));

		SelectionPipelineHandle {
			tx,
			generation: AtomicU64::new(0),
			cancel,
			shared,
		}
	}
}

async fn run(
	mut rx: watch::Receiver<Option<SelectionSnapshot>>,
	quiet_window: std::time::Duration,
	panel: String,
	service: Arc<dyn AnnotationService>,
	host_panel: Arc<dyn HostPanel>,
	cancel: CancellationToken,
	shared: Arc<PipelineShared>,
) {
	loop {
		// Idle: wait for the first change of a new sampling cycle.
		tokio::select! {
			_ = cancel.cancelled() => return,
			changed = rx.changed() => {
				if changed.is_err() {
					return;
				}
			}
		}

		// Sampling: every newer snapshot restarts the quiet window.
		loop {
			tokio::select! {
				_ = cancel.cancelled() => return,
				_ = tokio::time::sleep(quiet_window) => break,
				changed = rx.changed() => {
					if changed.is_err() {
						return;
					}
				}
			}
		}

		// Dispatching: gates, then exactly one downstream call. Snapshots
		// arriving while the call is in flight coalesce in the watch slot
		// and start the next cycle after completion.
		let Some(snapshot) = rx.borrow_and_update().clone() else {
			continue;
		};
		if !snapshot.has_selection {
			debug!(generation = snapshot.generation, "selection empty, skipping dispatch");
			continue;
		}
		if !host_panel.is_panel_visible(&panel) {
			debug!(generation = snapshot.generation, "host panel hidden, skipping dispatch");
			continue;
		}

		let generation = snapshot.generation;
		let request = AnnotationRequest {
			document: snapshot.document,
			span: snapshot.span,
			text: snapshot.text,
			has_unsaved_changes: snapshot.has_unsaved_changes,
		};
		let outcome = service.prepare_annotation(request, cancel.child_token()).await;
		shared.dispatches.fetch_add(1, Ordering::AcqRel);
		if let Err(err) = &outcome {
			warn!(generation, error = %err, "annotation preparation failed");
		}
		*shared.last_outcome.lock() = Some(outcome);
	}
}
