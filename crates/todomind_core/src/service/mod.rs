//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep host UI layers decoupled from storage details.

pub mod editor;
pub mod link_preview_service;
pub mod mind_map_service;
pub mod reminder_service;
pub mod settings_service;
pub mod task_service;
pub mod undo;
