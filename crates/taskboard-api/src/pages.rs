use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};

use taskboard_types::models::Task;

use crate::auth::{AppState, run_db};
use crate::error::ApiError;
use crate::middleware::Identity;
use crate::views::page_context;

pub async fn home(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, ApiError> {
    let today = chrono::Local::now().date_naive();

    let tasks: Vec<Task> = match &identity.0 {
        Some(user) => {
            let user_id = user.id;
            run_db(&state, move |db| db.list_tasks(user_id))
                .await?
                .into_iter()
                .map(Task::from)
                .collect()
        }
        None => vec![],
    };

    let mut context = page_context(identity.0.as_ref());
    context.insert("date", &today);
    context.insert("tasks", &tasks);
    Ok(state.views.render("index.html", &context)?.into_response())
}

pub async fn about_me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, ApiError> {
    let context = page_context(identity.0.as_ref());
    Ok(state.views.render("about.html", &context)?.into_response())
}
