use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use taskboard_types::models::User;

use crate::auth::{AppState, run_db};
use crate::error::ApiError;

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, kept as a string so a malformed value decodes and resolves to anonymous.
    pub sub: String,
    pub exp: usize,
}

/// Who is making the request. Inserted on every request by [`resolve_session`].
#[derive(Debug, Clone)]
pub struct Identity(pub Option<User>);

/// The authenticated user. Only present behind [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Resolve the session cookie to a stored user.
///
/// A missing, forged, or expired token, or one naming a user that no longer
/// exists, leaves the request anonymous. Only storage failures are errors.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let jar = CookieJar::from_headers(req.headers());
    let user_id = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| decode_user_id(cookie.value(), &state.sessions.secret));

    let user = match user_id {
        Some(id) => {
            let row = run_db(&state, move |db| db.get_user_by_id(id)).await?;
            if row.is_none() {
                debug!("Session names unknown user {}, treating as anonymous", id);
            }
            row.map(User::from)
        }
        None => None,
    };

    req.extensions_mut().insert(Identity(user));
    Ok(next.run(req).await)
}

/// Reject anonymous requests with 403 before the handler runs.
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<Identity>()
        .and_then(|identity| identity.0.clone())
        .ok_or(ApiError::Forbidden)?;

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

pub fn decode_user_id(token: &str, secret: &str) -> Option<i64> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;

    token_data.claims.sub.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token(sub: &str, exp: i64, secret: &str) -> String {
        let claims = Claims { sub: sub.to_string(), exp: exp as usize };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn in_an_hour() -> i64 {
        (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp()
    }

    #[test]
    fn valid_token_yields_user_id() {
        assert_eq!(decode_user_id(&token("7", in_an_hour(), "s3cret"), "s3cret"), Some(7));
    }

    #[test]
    fn malformed_subject_is_anonymous() {
        assert_eq!(decode_user_id(&token("seven", in_an_hour(), "s3cret"), "s3cret"), None);
    }

    #[test]
    fn wrong_secret_is_anonymous() {
        assert_eq!(decode_user_id(&token("7", in_an_hour(), "s3cret"), "other"), None);
    }

    #[test]
    fn expired_token_is_anonymous() {
        let long_ago = (chrono::Utc::now() - chrono::Duration::days(2)).timestamp();
        assert_eq!(decode_user_id(&token("7", long_ago, "s3cret"), "s3cret"), None);
    }

    #[test]
    fn garbage_is_anonymous() {
        assert_eq!(decode_user_id("not-a-jwt", "s3cret"), None);
    }
}
