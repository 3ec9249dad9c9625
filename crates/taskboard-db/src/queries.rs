use crate::models::{CompletedTaskRow, TaskRow, UserRow};
use crate::Database;
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

impl Database {
    // -- Users --

    /// Returns `None` when the email is already registered; no row is written.
    pub fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<Option<i64>> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (name, email, password) VALUES (?1, ?2, ?3)
                 ON CONFLICT(email) DO NOTHING",
                (name, email, password_hash),
            )?;
            if inserted == 0 {
                return Ok(None);
            }
            Ok(Some(conn.last_insert_rowid()))
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, name, email, password, created_at FROM users WHERE email = ?1",
                    [email],
                    user_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, name, email, password, created_at FROM users WHERE id = ?1",
                    [id],
                    user_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Administrative removal. Tasks and completed tasks go with the user.
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| Ok(conn.execute("DELETE FROM users WHERE id = ?1", [id])? > 0))
    }

    // -- Tasks --

    pub fn insert_task(&self, user_id: i64, name: &str, due: NaiveDate) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO tasks (task_name, task_due, user_id) VALUES (?1, ?2, ?3)",
                params![name, due, user_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_task(&self, id: i64) -> Result<Option<TaskRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, task_name, task_due, user_id FROM tasks WHERE id = ?1",
                    [id],
                    task_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_tasks(&self, user_id: i64) -> Result<Vec<TaskRow>> {
        self.with_conn(|conn| query_tasks(conn, user_id))
    }

    pub fn delete_task(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| Ok(conn.execute("DELETE FROM tasks WHERE id = ?1", [id])? > 0))
    }

    // -- Completed tasks --

    pub fn get_completed_task(&self, id: i64) -> Result<Option<CompletedTaskRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, completed_task_name, completed_task_due, user_id
                     FROM completed_tasks WHERE id = ?1",
                    [id],
                    completed_task_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_completed_tasks(&self, user_id: i64) -> Result<Vec<CompletedTaskRow>> {
        self.with_conn(|conn| query_completed_tasks(conn, user_id))
    }

    pub fn delete_completed_task(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            Ok(conn.execute("DELETE FROM completed_tasks WHERE id = ?1", [id])? > 0)
        })
    }

    // -- Moves --

    /// Move the given tasks into `completed_tasks` in a single transaction.
    /// Ids that don't exist or belong to another user are skipped.
    /// Returns how many tasks were moved.
    pub fn complete_tasks(&self, user_id: i64, task_ids: &[i64]) -> Result<usize> {
        if task_ids.is_empty() {
            return Ok(0);
        }

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut moved = 0;

            for &task_id in task_ids {
                let copied = tx.execute(
                    "INSERT INTO completed_tasks (completed_task_name, completed_task_due, user_id)
                     SELECT task_name, task_due, user_id FROM tasks WHERE id = ?1 AND user_id = ?2",
                    params![task_id, user_id],
                )?;
                if copied == 0 {
                    debug!("Task {} not found for user {}, skipping", task_id, user_id);
                    continue;
                }
                tx.execute("DELETE FROM tasks WHERE id = ?1", [task_id])?;
                moved += 1;
            }

            tx.commit()?;
            Ok(moved)
        })
    }

    /// Move one completed task back into `tasks` in a single transaction.
    /// Returns the new task id, or `None` if the user has no such completed task.
    pub fn retrieve_task(&self, user_id: i64, completed_id: i64) -> Result<Option<i64>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let copied = tx.execute(
                "INSERT INTO tasks (task_name, task_due, user_id)
                 SELECT completed_task_name, completed_task_due, user_id
                 FROM completed_tasks WHERE id = ?1 AND user_id = ?2",
                params![completed_id, user_id],
            )?;
            if copied == 0 {
                return Ok(None);
            }
            let task_id = tx.last_insert_rowid();

            tx.execute("DELETE FROM completed_tasks WHERE id = ?1", [completed_id])?;
            tx.commit()?;
            Ok(Some(task_id))
        })
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        task_name: row.get(1)?,
        task_due: row.get(2)?,
        user_id: row.get(3)?,
    })
}

fn completed_task_from_row(row: &Row<'_>) -> rusqlite::Result<CompletedTaskRow> {
    Ok(CompletedTaskRow {
        id: row.get(0)?,
        completed_task_name: row.get(1)?,
        completed_task_due: row.get(2)?,
        user_id: row.get(3)?,
    })
}

fn query_tasks(conn: &Connection, user_id: i64) -> Result<Vec<TaskRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, task_name, task_due, user_id FROM tasks
         WHERE user_id = ?1
         ORDER BY task_due, id",
    )?;

    let rows = stmt
        .query_map([user_id], task_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_completed_tasks(conn: &Connection, user_id: i64) -> Result<Vec<CompletedTaskRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, completed_task_name, completed_task_due, user_id FROM completed_tasks
         WHERE user_id = ?1
         ORDER BY id",
    )?;

    let rows = stmt
        .query_map([user_id], completed_task_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
