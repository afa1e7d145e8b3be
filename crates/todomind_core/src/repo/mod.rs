//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Repositories refuse connections whose schema is not fully migrated.
//! - Missing rows surface as `RepoError::NotFound`, not as silent no-ops.

pub mod mind_map_repo;
pub mod settings_repo;
pub mod task_repo;

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::mind_map::MindMapValidationError;
use crate::model::task::TaskValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity kind named in `RepoError::NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Task,
    MindMap,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Task => f.write_str("task"),
            Self::MindMap => f.write_str("mind map"),
        }
    }
}

/// Shared repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    InvalidTask(TaskValidationError),
    InvalidMindMap(MindMapValidationError),
    Db(DbError),
    NotFound { kind: EntityKind, id: Uuid },
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted row cannot be converted into a valid record.
    InvalidData(String),
}

impl RepoError {
    pub fn task_not_found(id: Uuid) -> Self {
        Self::NotFound {
            kind: EntityKind::Task,
            id,
        }
    }

    pub fn mind_map_not_found(id: Uuid) -> Self {
        Self::NotFound {
            kind: EntityKind::MindMap,
            id,
        }
    }

    /// Stable code used in structured log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTask(_) | Self::InvalidMindMap(_) => "validation_failed",
            Self::Db(_) => "db_error",
            Self::NotFound { .. } => "not_found",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTask(err) => write!(f, "{err}"),
            Self::InvalidMindMap(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTask(err) => Some(err),
            Self::InvalidMindMap(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::UninitializedConnection { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidTask(value)
    }
}

impl From<MindMapValidationError> for RepoError {
    fn from(value: MindMapValidationError) -> Self {
        Self::InvalidMindMap(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn parse_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

fn parse_color(value: Option<i64>, column: &'static str) -> RepoResult<Option<u32>> {
    value
        .map(|raw| {
            u32::try_from(raw).map_err(|_| {
                RepoError::InvalidData(format!("invalid color value `{raw}` in {column}"))
            })
        })
        .transpose()
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
