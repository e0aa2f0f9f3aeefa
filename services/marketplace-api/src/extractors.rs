//! Axum extractors for authentication

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use hearth_types::UserId;

use crate::state::AppState;

/// Authenticated user extracted from the bearer token
///
/// The token only proves identity. Role and plan always come from the
/// profile row at request time, so a stale token can never carry a
/// privilege the database no longer grants.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: Option<String>,
}

/// JWT claims we accept
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[allow(dead_code)]
    exp: i64,
}

/// Error response for auth failures
#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    error: AuthErrorDetail,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetail {
    code: &'static str,
    message: &'static str,
}

/// Auth rejection type
pub struct AuthRejection {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = AuthErrorResponse {
            error: AuthErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = extract_bearer_token(parts)?;

        let key = DecodingKey::from_secret(app_state.config.auth_jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);

        let claims = jsonwebtoken::decode::<Claims>(&token, &key, &validation)
            .map_err(|e| {
                tracing::debug!(error = ?e, "Token validation failed");
                AuthRejection {
                    status: StatusCode::UNAUTHORIZED,
                    code: "INVALID_TOKEN",
                    message: "Invalid or expired token",
                }
            })?
            .claims;

        let user_id = UserId::parse(&claims.sub).map_err(|_| AuthRejection {
            status: StatusCode::UNAUTHORIZED,
            code: "INVALID_TOKEN",
            message: "Token subject is not a user id",
        })?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
        })
    }
}

/// Extract a bearer token from the Authorization header
fn extract_bearer_token(parts: &Parts) -> Result<String, AuthRejection> {
    if let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header.to_str().map_err(|_| AuthRejection {
            status: StatusCode::BAD_REQUEST,
            code: "INVALID_HEADER",
            message: "Invalid Authorization header encoding",
        })?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.to_string());
        }
    }

    Err(AuthRejection {
        status: StatusCode::UNAUTHORIZED,
        code: "MISSING_TOKEN",
        message: "No authentication token provided",
    })
}

/// Optional auth extractor - doesn't fail if no auth is provided
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(OptionalAuthUser(Some(user))),
            Err(_) => Ok(OptionalAuthUser(None)),
        }
    }
}
