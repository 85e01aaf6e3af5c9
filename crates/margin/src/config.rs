use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for one margin instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginConfig {
	/// Quiet window after the last selection change before a coalesced
	/// annotation request fires, in milliseconds.
	#[serde(default = "default_quiet_window_ms")]
	pub quiet_window_ms: u64,
	/// Margin width in pixels while enabled and visible.
	#[serde(default = "default_width")]
	pub width: f32,
	/// Host panel whose visibility gates annotation dispatch.
	#[serde(default = "default_panel")]
	pub panel: String,
}

fn default_quiet_window_ms() -> u64 {
	300
}

fn default_width() -> f32 {
	20.0
}

fn default_panel() -> String {
	"annotations".to_string()
}

impl MarginConfig {
	/// Quiet window as a [`Duration`].
	pub fn quiet_window(&self) -> Duration {
		Duration::from_millis(self.quiet_window_ms)
	}
}

impl Default for MarginConfig {
	fn default() -> Self {
		Self {
			quiet_window_ms: default_quiet_window_ms(),
			width: default_width(),
			panel: default_panel(),
		}
	}
}
