use chrono::NaiveDate;
use serde::Serialize;

/// The signed-in user as exposed to views. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub due: NaiveDate,
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletedTask {
    pub id: i64,
    pub name: String,
    pub due: NaiveDate,
    pub user_id: i64,
}
