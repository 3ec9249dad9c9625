use serde::Deserialize;

// -- Auth --

/// Fields are defaulted so a missing input reaches validation as an empty
/// string instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Display name. The signup form posts it as `username`.
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// -- Tasks --

#[derive(Debug, Default, Deserialize)]
pub struct AddTaskForm {
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub task_due_date: String,
}

/// Checkbox selection from the home page. `completed` repeats once per ticked task.
#[derive(Debug, Default, Deserialize)]
pub struct CompleteTasksForm {
    #[serde(default)]
    pub completed: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RetrieveTaskForm {
    #[serde(default)]
    pub task_id: String,
}
