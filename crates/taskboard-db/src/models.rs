//! Database row types. These map directly to SQLite rows and stay distinct
//! from the taskboard-types view models so the DB layer keeps the password hash.

use chrono::NaiveDate;
use taskboard_types::models::{CompletedTask, Task, User};

pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

pub struct TaskRow {
    pub id: i64,
    pub task_name: String,
    pub task_due: NaiveDate,
    pub user_id: i64,
}

pub struct CompletedTaskRow {
    pub id: i64,
    pub completed_task_name: String,
    pub completed_task_due: NaiveDate,
    pub user_id: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            name: row.task_name,
            due: row.task_due,
            user_id: row.user_id,
        }
    }
}

impl From<CompletedTaskRow> for CompletedTask {
    fn from(row: CompletedTaskRow) -> Self {
        CompletedTask {
            id: row.id,
            name: row.completed_task_name,
            due: row.completed_task_due,
            user_id: row.user_id,
        }
    }
}
