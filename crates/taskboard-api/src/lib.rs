pub mod auth;
pub mod error;
pub mod middleware;
pub mod pages;
pub mod tasks;
pub mod views;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::auth::AppState;
use crate::middleware::{require_auth, resolve_session};

/// Build the full application router.
///
/// Session resolution wraps every route; the guarded routes additionally
/// sit behind [`require_auth`], which answers 403 before the handler runs.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(pages::home))
        .route("/about_me", get(pages::about_me))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/signup", get(auth::signup_form).post(auth::signup))
        .route("/logout_user", get(auth::logout));

    let protected_routes = Router::new()
        .route("/add_task", get(tasks::add_task_form).post(tasks::add_task))
        .route("/completed_tasks", post(tasks::complete_tasks))
        .route("/view-completed_tasks", get(tasks::view_completed_tasks))
        .route("/retrive_task", post(tasks::retrieve_task))
        .route_layer(axum_middleware::from_fn(require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), resolve_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
