//! User-facing application settings.

use serde::{Deserialize, Serialize};

/// Default zoom applied when a mind map is opened.
pub const DEFAULT_MIND_MAP_SCALE: f32 = 1.0;

/// Flags and values stored in the key-value settings store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Fetch link previews for URLs found in mind map descriptions.
    pub show_ogp_preview: bool,
    /// Schedule a reminder at each task's due date.
    pub remind_task_deadline: bool,
    pub default_mind_map_scale: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            show_ogp_preview: true,
            remind_task_deadline: true,
            default_mind_map_scale: DEFAULT_MIND_MAP_SCALE,
        }
    }
}

/// Returns whether `scale` can be stored as the default map scale.
pub fn is_valid_scale(scale: f32) -> bool {
    scale.is_finite() && scale > 0.0
}
