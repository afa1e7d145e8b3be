//! Mind map domain model.
//!
//! # Invariants
//! - `is_completed` is user-set and never derived from task statuses.
//! - `ogp_preview` is an in-memory cache; it is never persisted.

use crate::model::now_epoch_ms;
use crate::ogp::OgpPreview;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable mind map identifier.
pub type MindMapId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MindMapValidationError {
    NonFiniteCoordinate,
}

impl Display for MindMapValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteCoordinate => write!(f, "mind map coordinates must be finite"),
        }
    }
}

impl Error for MindMapValidationError {}

/// Named, colored container of tasks with a root node position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMap {
    pub id: MindMapId,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
    pub is_completed: bool,
    /// ARGB color.
    pub color: Option<u32>,
    pub x: f32,
    pub y: f32,
    #[serde(skip)]
    pub ogp_preview: Option<OgpPreview>,
}

impl MindMap {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: MindMapId) -> Self {
        let now = now_epoch_ms();
        Self {
            id,
            title: None,
            description: None,
            created_at: now,
            updated_at: now,
            is_completed: false,
            color: None,
            x: 0.0,
            y: 0.0,
            ogp_preview: None,
        }
    }

    /// `#RRGGBB` rendering of `color`, alpha dropped.
    pub fn color_hex(&self) -> Option<String> {
        self.color
            .map(|argb| format!("#{:06X}", argb & 0x00FF_FFFF))
    }

    pub fn validate(&self) -> Result<(), MindMapValidationError> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(MindMapValidationError::NonFiniteCoordinate);
        }
        Ok(())
    }
}

impl Default for MindMap {
    fn default() -> Self {
        Self::new()
    }
}
