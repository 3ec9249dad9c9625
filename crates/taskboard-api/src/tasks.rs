use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use chrono::NaiveDate;
use tracing::{info, warn};

use taskboard_types::api::{AddTaskForm, CompleteTasksForm, RetrieveTaskForm};
use taskboard_types::models::CompletedTask;

use crate::auth::{AppState, run_db};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::views::page_context;

/// Due dates arrive from `<input type="date">` as ISO calendar dates.
const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

pub async fn add_task_form(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    state
        .views
        .form("add-task.html", Some(&user), None, StatusCode::OK)
}

pub async fn add_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<AddTaskForm>,
) -> Result<Response, ApiError> {
    let name = form.task_name.trim().to_string();
    if name.is_empty() {
        return state.views.form(
            "add-task.html",
            Some(&user),
            Some("Task name is required"),
            StatusCode::BAD_REQUEST,
        );
    }

    let Ok(due) = NaiveDate::parse_from_str(form.task_due_date.trim(), DUE_DATE_FORMAT) else {
        return state.views.form(
            "add-task.html",
            Some(&user),
            Some("Invalid due date, expected YYYY-MM-DD"),
            StatusCode::BAD_REQUEST,
        );
    };

    let user_id = user.id;
    let task_id = run_db(&state, move |db| db.insert_task(user_id, &name, due)).await?;
    info!("User {} added task {} due {}", user_id, task_id, due);

    Ok(Redirect::to("/").into_response())
}

/// Move every selected task into the completed list in one transaction.
pub async fn complete_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<CompleteTasksForm>,
) -> Result<Response, ApiError> {
    let task_ids = form
        .completed
        .iter()
        .map(|id| id.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ApiError::BadRequest("Invalid task id".into()))?;

    if !task_ids.is_empty() {
        let user_id = user.id;
        let requested = task_ids.len();
        let moved = run_db(&state, move |db| db.complete_tasks(user_id, &task_ids)).await?;
        info!("User {} completed {} of {} selected tasks", user_id, moved, requested);
    }

    Ok(Redirect::to("/").into_response())
}

pub async fn view_completed_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    let user_id = user.id;
    let tasks: Vec<CompletedTask> = run_db(&state, move |db| db.list_completed_tasks(user_id))
        .await?
        .into_iter()
        .map(CompletedTask::from)
        .collect();

    let mut context = page_context(Some(&user));
    context.insert("tasks", &tasks);
    Ok(state.views.render("completed_tasks.html", &context)?.into_response())
}

/// Move one completed task back to the active list.
pub async fn retrieve_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<RetrieveTaskForm>,
) -> Result<Response, ApiError> {
    let Ok(completed_id) = form.task_id.trim().parse::<i64>() else {
        warn!("User {} tried to restore malformed task id {:?}", user.id, form.task_id);
        return Err(ApiError::NotFound);
    };

    let user_id = user.id;
    match run_db(&state, move |db| db.retrieve_task(user_id, completed_id)).await? {
        Some(task_id) => {
            info!("User {} restored completed task {} as task {}", user_id, completed_id, task_id);
            Ok(Redirect::to("/").into_response())
        }
        None => {
            warn!("User {} has no completed task {}", user_id, completed_id);
            Err(ApiError::NotFound)
        }
    }
}
