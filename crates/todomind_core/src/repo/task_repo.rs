//! Task repository contract and SQLite implementation.
//!
//! # Invariants
//! - Soft-deleted rows (`is_deleted=1`) are hidden unless asked for.
//! - Lists are ordered `reversed_order DESC, created_at ASC, id ASC`.
//! - Status text is decoded leniently; an unknown value reads as
//!   `InProgress` instead of failing the load.

use super::{
    bool_to_int, ensure_connection_ready, parse_bool, parse_color, parse_uuid, RepoError,
    RepoResult,
};
use crate::model::mind_map::MindMapId;
use crate::model::now_epoch_ms;
use crate::model::task::{Task, TaskId, TaskStatus};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    mind_map_id,
    title,
    description,
    created_at,
    updated_at,
    due_at,
    hierarchy,
    parent_task_id,
    position,
    x,
    y,
    reversed_order,
    color,
    status
FROM tasks";

/// Filter options for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskListQuery {
    pub mind_map_id: Option<MindMapId>,
    pub status: Option<TaskStatus>,
    pub include_deleted: bool,
}

/// Repository interface for task persistence.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    /// Full-record update. Stamps `updated_at` with the current time.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId, include_deleted: bool) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    /// Writes several sort keys in one transaction.
    fn set_reversed_orders(&self, orders: &[(TaskId, i64)]) -> RepoResult<()>;
    /// Highest sort key among active and pending-undo tasks.
    fn max_reversed_order(&self) -> RepoResult<Option<i64>>;
    fn soft_delete_task(&self, id: TaskId) -> RepoResult<()>;
    fn restore_task(&self, id: TaskId) -> RepoResult<()>;
    /// Removes a soft-deleted row for good. Children are detached.
    fn purge_task(&self, id: TaskId) -> RepoResult<()>;
    /// Removes every soft-deleted row. Returns how many went.
    fn purge_deleted(&self) -> RepoResult<usize>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                mind_map_id,
                title,
                description,
                created_at,
                updated_at,
                due_at,
                hierarchy,
                parent_task_id,
                position,
                x,
                y,
                reversed_order,
                color,
                status,
                is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, 0);",
            params![
                task.id.to_string(),
                task.mind_map_id.map(|id| id.to_string()),
                task.title.as_deref(),
                task.description.as_deref(),
                task.created_at,
                task.updated_at,
                task.due_at,
                task.hierarchy,
                task.parent_task_id.map(|id| id.to_string()),
                task.position,
                task.x.map(f64::from),
                task.y.map(f64::from),
                task.reversed_order,
                task.color.map(i64::from),
                task.status.as_str(),
            ],
        )?;

        Ok(task.id)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                mind_map_id = ?1,
                title = ?2,
                description = ?3,
                updated_at = ?4,
                due_at = ?5,
                hierarchy = ?6,
                parent_task_id = ?7,
                position = ?8,
                x = ?9,
                y = ?10,
                reversed_order = ?11,
                color = ?12,
                status = ?13
             WHERE id = ?14
               AND is_deleted = 0;",
            params![
                task.mind_map_id.map(|id| id.to_string()),
                task.title.as_deref(),
                task.description.as_deref(),
                now_epoch_ms(),
                task.due_at,
                task.hierarchy,
                task.parent_task_id.map(|id| id.to_string()),
                task.position,
                task.x.map(f64::from),
                task.y.map(f64::from),
                task.reversed_order,
                task.color.map(i64::from),
                task.status.as_str(),
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::task_not_found(task.id));
        }
        Ok(())
    }

    fn get_task(&self, id: TaskId, include_deleted: bool) -> RepoResult<Option<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE id = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_deleted {
            sql.push_str(" AND is_deleted = 0");
        }
        if let Some(mind_map_id) = query.mind_map_id {
            sql.push_str(" AND mind_map_id = ?");
            bind_values.push(Value::Text(mind_map_id.to_string()));
        }
        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }
        sql.push_str(" ORDER BY reversed_order DESC, created_at ASC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn set_reversed_orders(&self, orders: &[(TaskId, i64)]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let now = now_epoch_ms();
        for (id, order) in orders {
            let changed = tx.execute(
                "UPDATE tasks
                 SET reversed_order = ?2,
                     updated_at = ?3
                 WHERE id = ?1
                   AND is_deleted = 0;",
                params![id.to_string(), order, now],
            )?;
            if changed == 0 {
                // Dropping `tx` rolls back the keys written so far.
                return Err(RepoError::task_not_found(*id));
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn max_reversed_order(&self) -> RepoResult<Option<i64>> {
        let max = self
            .conn
            .query_row("SELECT MAX(reversed_order) FROM tasks;", [], |row| {
                row.get::<_, Option<i64>>(0)
            })?;
        Ok(max)
    }

    fn soft_delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET is_deleted = 1,
                 updated_at = ?2
             WHERE id = ?1;",
            params![id.to_string(), now_epoch_ms()],
        )?;
        if changed == 0 {
            return Err(RepoError::task_not_found(id));
        }
        Ok(())
    }

    fn restore_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET is_deleted = 0,
                 updated_at = ?2
             WHERE id = ?1;",
            params![id.to_string(), now_epoch_ms()],
        )?;
        if changed == 0 {
            return Err(RepoError::task_not_found(id));
        }
        Ok(())
    }

    fn purge_task(&self, id: TaskId) -> RepoResult<()> {
        // Children keep their rows; `ON DELETE SET NULL` clears the parent ref.
        let changed = self.conn.execute(
            "DELETE FROM tasks
             WHERE id = ?1
               AND is_deleted = 1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::task_not_found(id));
        }
        Ok(())
    }

    fn purge_deleted(&self) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM tasks WHERE is_deleted = 1;", [])?;
        Ok(removed)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "tasks.id")?;

    let mind_map_id = row
        .get::<_, Option<String>>("mind_map_id")?
        .map(|value| parse_uuid(&value, "tasks.mind_map_id"))
        .transpose()?;
    let parent_task_id = row
        .get::<_, Option<String>>("parent_task_id")?
        .map(|value| parse_uuid(&value, "tasks.parent_task_id"))
        .transpose()?;

    let status_text: String = row.get("status")?;

    Ok(Task {
        id,
        mind_map_id,
        title: row.get("title")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        due_at: row.get("due_at")?,
        hierarchy: row.get("hierarchy")?,
        parent_task_id,
        position: row.get("position")?,
        x: row.get::<_, Option<f64>>("x")?.map(|value| value as f32),
        y: row.get::<_, Option<f64>>("y")?.map(|value| value as f32),
        reversed_order: row.get("reversed_order")?,
        color: parse_color(row.get("color")?, "tasks.color")?,
        status: TaskStatus::decode(&status_text),
    })
}

/// Reads the soft-delete flag of one row, including deleted rows.
pub fn is_task_deleted(conn: &Connection, id: TaskId) -> RepoResult<Option<bool>> {
    let mut stmt = conn.prepare("SELECT is_deleted FROM tasks WHERE id = ?1;")?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_bool(row.get(0)?, "tasks.is_deleted")?)),
        None => Ok(None),
    }
}
