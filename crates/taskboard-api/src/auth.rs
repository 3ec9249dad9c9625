use std::sync::{Arc, LazyLock};

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    Form,
    cookie::{Cookie, CookieJar, SameSite},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{debug, info, warn};

use taskboard_db::Database;
use taskboard_types::api::{LoginForm, SignupForm};

use crate::error::ApiError;
use crate::middleware::{Claims, Identity, SESSION_COOKIE};
use crate::views::Views;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub views: Views,
    pub sessions: SessionConfig,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl: chrono::Duration,
}

/// Hash checked when the email is unknown, so both login failures cost one verification.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("taskboard-dummy-password").ok());

/// Run a blocking DB call off the async runtime.
pub async fn run_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let value = tokio::task::spawn_blocking(move || f(&state.db)).await??;
    Ok(value)
}

pub async fn signup_form(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, ApiError> {
    state
        .views
        .form("signup-form.html", identity.0.as_ref(), None, StatusCode::OK)
}

pub async fn signup(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response, ApiError> {
    let user = identity.0.as_ref();
    let email = form.email.trim().to_string();
    let name = form.username.trim().to_string();

    if email.is_empty() || name.is_empty() || form.password.is_empty() {
        return state.views.form(
            "signup-form.html",
            user,
            Some("Name, email and password are required"),
            StatusCode::BAD_REQUEST,
        );
    }

    // Check if email is taken
    let lookup = email.clone();
    if run_db(&state, move |db| db.get_user_by_email(&lookup)).await?.is_some() {
        return state
            .views
            .form("signup-form.html", user, Some("Email already exists"), StatusCode::CONFLICT);
    }

    let password = form.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let user_id = run_db(&state, move |db| db.create_user(&name, &email, &password_hash)).await?;

    // Lost a race with a concurrent signup for the same email
    let Some(user_id) = user_id else {
        return state
            .views
            .form("signup-form.html", user, Some("Email already exists"), StatusCode::CONFLICT);
    };

    info!("User {} signed up", user_id);
    let token = create_token(&state.sessions, user_id)?;
    Ok((jar.add(session_cookie(token)), Redirect::to("/")).into_response())
}

pub async fn login_form(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, ApiError> {
    state
        .views
        .form("login-form.html", identity.0.as_ref(), None, StatusCode::OK)
}

pub async fn login(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let email = form.email.trim().to_string();
    let user = run_db(&state, move |db| db.get_user_by_email(&email)).await?;

    let password = form.password;
    let (user, verified) = tokio::task::spawn_blocking(move || {
        let verified = match &user {
            Some(user) => verify_password(&password, &user.password),
            None => {
                if let Some(dummy) = DUMMY_HASH.as_deref() {
                    let _ = verify_password(&password, dummy);
                }
                false
            }
        };
        (user, verified)
    })
    .await?;

    let current = identity.0.as_ref();
    match user {
        None => {
            debug!("Login refused: no such user");
            state
                .views
                .form("login-form.html", current, Some("No user exists"), StatusCode::UNAUTHORIZED)
        }
        Some(user) if !verified => {
            warn!("Login refused for user {}: incorrect password", user.id);
            state
                .views
                .form("login-form.html", current, Some("Incorrect Password"), StatusCode::UNAUTHORIZED)
        }
        Some(user) => {
            info!("User {} logged in", user.id);
            let token = create_token(&state.sessions, user.id)?;
            Ok((jar.add(session_cookie(token)), Redirect::to("/")).into_response())
        }
    }
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let removal = Cookie::build(SESSION_COOKIE).path("/");
    (jar.remove(removal), Redirect::to("/"))
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn create_token(sessions: &SessionConfig, user_id: i64) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (chrono::Utc::now() + sessions.ttl).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(sessions.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Argon2id with a fresh random salt per call.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
