//! Core domain logic for TodoMind.
//! This crate is the single source of truth for task and mind map rules.

pub mod db;
pub mod listing;
pub mod logging;
pub mod model;
pub mod ogp;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use listing::ordering::{next_reversed_order, sort_for_display, swap_reversed_order};
pub use listing::status_filter::{
    filter_by_mind_map, filter_by_status, progress_rate, StatusTab, STATUS_TABS,
};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::mind_map::{MindMap, MindMapId};
pub use model::settings::AppSettings;
pub use model::task::{Task, TaskId, TaskStatus};
pub use model::task_tree::TaskTree;
pub use ogp::{HttpPageFetcher, OgpError, OgpPreview, PageFetcher};
pub use repo::mind_map_repo::{MindMapRepository, SqliteMindMapRepository};
pub use repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::editor::{EditTarget, MindMapEditor, TaskEditor};
pub use service::link_preview_service::LinkPreviewService;
pub use service::mind_map_service::{MindMapService, MindMapServiceError};
pub use service::reminder_service::{
    plan_reminder, ReminderError, ReminderPlan, ReminderScheduler, ReminderService,
};
pub use service::settings_service::{SettingsError, SettingsService};
pub use service::task_service::{TaskService, TaskServiceError};
pub use service::undo::{UndoOutcome, UndoSlot, DEFAULT_UNDO_WINDOW};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
