//! Mind map repository contract and SQLite implementation.
//!
//! # Invariants
//! - Deleting a mind map deletes its tasks (`ON DELETE CASCADE`).
//! - Lists are ordered `created_at DESC, id ASC`.
//! - `ogp_preview` is never written or read here.

use super::{
    bool_to_int, ensure_connection_ready, parse_bool, parse_color, parse_uuid, RepoError,
    RepoResult,
};
use crate::model::mind_map::{MindMap, MindMapId};
use crate::model::now_epoch_ms;
use rusqlite::{params, Connection, Row};

const MIND_MAP_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    is_completed,
    color,
    x,
    y,
    created_at,
    updated_at
FROM mind_maps";

/// Repository interface for mind map persistence.
pub trait MindMapRepository {
    fn create_mind_map(&self, mind_map: &MindMap) -> RepoResult<MindMapId>;
    fn update_mind_map(&self, mind_map: &MindMap) -> RepoResult<()>;
    fn get_mind_map(&self, id: MindMapId) -> RepoResult<Option<MindMap>>;
    fn list_mind_maps(&self) -> RepoResult<Vec<MindMap>>;
    /// Hard delete; owned tasks go with it.
    fn delete_mind_map(&self, id: MindMapId) -> RepoResult<()>;
}

/// SQLite-backed mind map repository.
pub struct SqliteMindMapRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMindMapRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MindMapRepository for SqliteMindMapRepository<'_> {
    fn create_mind_map(&self, mind_map: &MindMap) -> RepoResult<MindMapId> {
        mind_map.validate()?;

        self.conn.execute(
            "INSERT INTO mind_maps (
                id,
                title,
                description,
                is_completed,
                color,
                x,
                y,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                mind_map.id.to_string(),
                mind_map.title.as_deref(),
                mind_map.description.as_deref(),
                bool_to_int(mind_map.is_completed),
                mind_map.color.map(i64::from),
                f64::from(mind_map.x),
                f64::from(mind_map.y),
                mind_map.created_at,
                mind_map.updated_at,
            ],
        )?;

        Ok(mind_map.id)
    }

    fn update_mind_map(&self, mind_map: &MindMap) -> RepoResult<()> {
        mind_map.validate()?;

        let changed = self.conn.execute(
            "UPDATE mind_maps
             SET
                title = ?1,
                description = ?2,
                is_completed = ?3,
                color = ?4,
                x = ?5,
                y = ?6,
                updated_at = ?7
             WHERE id = ?8;",
            params![
                mind_map.title.as_deref(),
                mind_map.description.as_deref(),
                bool_to_int(mind_map.is_completed),
                mind_map.color.map(i64::from),
                f64::from(mind_map.x),
                f64::from(mind_map.y),
                now_epoch_ms(),
                mind_map.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::mind_map_not_found(mind_map.id));
        }
        Ok(())
    }

    fn get_mind_map(&self, id: MindMapId) -> RepoResult<Option<MindMap>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MIND_MAP_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_mind_map_row(row)?));
        }
        Ok(None)
    }

    fn list_mind_maps(&self) -> RepoResult<Vec<MindMap>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MIND_MAP_SELECT_SQL} ORDER BY created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_mind_map_row(row)?);
        }
        Ok(items)
    }

    fn delete_mind_map(&self, id: MindMapId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM mind_maps WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::mind_map_not_found(id));
        }
        Ok(())
    }
}

fn parse_mind_map_row(row: &Row<'_>) -> RepoResult<MindMap> {
    let id_text: String = row.get("id")?;

    Ok(MindMap {
        id: parse_uuid(&id_text, "mind_maps.id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        is_completed: parse_bool(row.get("is_completed")?, "mind_maps.is_completed")?,
        color: parse_color(row.get("color")?, "mind_maps.color")?,
        x: row.get::<_, f64>("x")? as f32,
        y: row.get::<_, f64>("y")? as f32,
        ogp_preview: None,
    })
}
