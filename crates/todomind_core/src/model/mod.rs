//! Domain model for tasks, mind maps and settings.
//!
//! # Responsibility
//! - Define canonical records used by core business logic.
//! - Keep hierarchy as id references instead of object links.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Timestamps are Unix epoch milliseconds.

pub mod mind_map;
pub mod settings;
pub mod task;
pub mod task_tree;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
