//! Key-value settings store over the `settings` table.

use super::{ensure_connection_ready, RepoResult};
use crate::model::now_epoch_ms;
use rusqlite::{params, Connection, OptionalExtension};

/// Raw string key-value access. Typed decoding lives in `SettingsService`.
pub trait SettingsRepository {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>>;
    /// Inserts or replaces one value.
    fn set_value(&self, key: &str, value: &str) -> RepoResult<()>;
    fn remove_value(&self, key: &str) -> RepoResult<()>;
}

pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set_value(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value, now_epoch_ms()],
        )?;
        Ok(())
    }

    fn remove_value(&self, key: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?1;", [key])?;
        Ok(())
    }
}
