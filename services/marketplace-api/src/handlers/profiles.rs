//! Profile handlers

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use hearth_db::CreateProfile;
use hearth_types::{Profile, Role, SubscriptionPlan, UserId};

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::handlers::shared::{record_op_duration, validate_name};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub full_name: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: UserId,
    pub full_name: String,
    pub role: Role,
    pub subscription_plan: SubscriptionPlan,
    pub created_at: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            full_name: profile.full_name,
            role: profile.role,
            subscription_plan: profile.subscription_plan,
            created_at: profile.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/profiles/me
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state
        .repos
        .profiles
        .find_by_id(user.user_id.0)
        .await?
        .ok_or_else(|| ApiError::NotFound("profile".into()))?
        .to_domain()
        .map_err(ApiError::Database)?;

    Ok(Json(profile.into()))
}

/// POST /api/v1/profiles
///
/// Register the caller's profile. The id comes from the token; only the
/// display name and role are caller-chosen. Admin cannot be self-assigned.
pub async fn create_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let start = Instant::now();

    validate_name(&req.full_name, "full_name")?;
    let role = parse_signup_role(&req.role)?;

    if state
        .repos
        .profiles
        .find_by_id(user.user_id.0)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Profile already exists".into()));
    }

    let row = state
        .repos
        .profiles
        .create(CreateProfile {
            id: user.user_id.0,
            full_name: req.full_name.trim().to_string(),
            role: role.as_str().to_string(),
        })
        .await?;

    record_op_duration("create_profile", start, true);
    tracing::info!(user_id = %user.user_id, role = %role, "Profile created");

    Ok(Json(row.to_domain().map_err(ApiError::Database)?.into()))
}

/// PUT /api/v1/profiles/me/role
pub async fn update_role(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let start = Instant::now();

    let role = parse_signup_role(&req.role)?;

    state
        .repos
        .profiles
        .find_by_id(user.user_id.0)
        .await?
        .ok_or_else(|| ApiError::NotFound("profile".into()))?;

    state
        .repos
        .profiles
        .update_role(user.user_id.0, role.as_str())
        .await?;

    let profile = state
        .repos
        .profiles
        .find_by_id(user.user_id.0)
        .await?
        .ok_or_else(|| ApiError::NotFound("profile".into()))?
        .to_domain()
        .map_err(ApiError::Database)?;

    record_op_duration("update_role", start, true);
    tracing::info!(user_id = %user.user_id, role = %role, "Role updated");

    Ok(Json(profile.into()))
}

/// Roles a user may pick for themselves
fn parse_signup_role(role: &str) -> Result<Role, ApiError> {
    let role: Role = role
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid role: {role}")))?;

    if role == Role::Admin {
        return Err(ApiError::Forbidden("Admin role cannot be self-assigned".into()));
    }

    Ok(role)
}
