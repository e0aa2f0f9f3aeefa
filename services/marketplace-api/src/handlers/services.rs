//! Service listing handlers

use axum::extract::{Query, State};
use axum::Json;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use hearth_billing_core::pricing;
use hearth_db::CreateService;
use hearth_types::{Role, ServiceId, ServiceListing, SubscriptionPlan, UserId};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AuthUser, OptionalAuthUser};
use crate::handlers::shared::{record_op_duration, validate_name, validate_price, validate_text};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListServicesQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: BigDecimal,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub created_by: UserId,
    pub image_url: Option<String>,
    pub created_at: String,
    /// Price after the caller's plan discount; present when authenticated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_price: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<BigDecimal>,
}

impl ServiceResponse {
    fn from_listing(listing: ServiceListing, plan: Option<SubscriptionPlan>) -> Self {
        let quoted = plan.map(|p| pricing::quote(&listing.price, p));
        Self {
            id: listing.id,
            name: listing.name,
            description: listing.description,
            price: listing.price,
            created_by: listing.created_by,
            image_url: listing.image_url,
            created_at: listing.created_at.to_rfc3339(),
            final_price: quoted.as_ref().map(|q| q.final_price.clone()),
            savings: quoted.map(|q| q.savings),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/services
///
/// Public listing. When the caller is authenticated, each listing also
/// carries the price quoted at their current subscription plan.
pub async fn list_services(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Query(query): Query<ListServicesQuery>,
) -> ApiResult<Json<Vec<ServiceResponse>>> {
    let start = Instant::now();

    let limit = query.limit.clamp(1, 100);
    let offset = query.offset.max(0);

    // The plan comes from the profile row, never from the token.
    let plan = match user {
        Some(user) => match state.repos.profiles.find_by_id(user.user_id.0).await? {
            Some(profile) => Some(profile.plan().map_err(ApiError::Database)?),
            None => None,
        },
        None => None,
    };

    let rows = state.repos.services.list(limit, offset).await?;
    let listings = rows
        .into_iter()
        .map(|r| ServiceResponse::from_listing(r.to_domain(), plan))
        .collect();

    record_op_duration("list_services", start, true);

    Ok(Json(listings))
}

/// GET /api/v1/services/mine
///
/// Listings published by the calling provider.
pub async fn list_my_services(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<ServiceResponse>>> {
    let start = Instant::now();

    let rows = state.repos.services.list_by_provider(user.user_id.0).await?;
    let listings = rows
        .into_iter()
        .map(|r| ServiceResponse::from_listing(r.to_domain(), None))
        .collect();

    record_op_duration("list_my_services", start, true);

    Ok(Json(listings))
}

/// POST /api/v1/services
///
/// Providers publish a listing. Customers get 403.
pub async fn create_service(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateServiceRequest>,
) -> ApiResult<Json<ServiceResponse>> {
    let start = Instant::now();

    validate_name(&req.name, "name")?;
    validate_text(&req.description, "description")?;
    validate_price(&req.price)?;

    let profile = state
        .repos
        .profiles
        .find_by_id(user.user_id.0)
        .await?
        .ok_or_else(|| ApiError::NotFound("profile".into()))?;

    if profile.role().map_err(ApiError::Database)? != Role::ServiceProvider {
        return Err(ApiError::Forbidden(
            "Only providers can publish services".into(),
        ));
    }

    let row = state
        .repos
        .services
        .create(CreateService {
            id: ServiceId::new().0,
            name: req.name.trim().to_string(),
            description: req.description.trim().to_string(),
            price: req.price,
            created_by: user.user_id.0,
            image_url: req.image_url,
        })
        .await?;

    metrics::counter!("marketplace_services_created_total").increment(1);
    record_op_duration("create_service", start, true);

    tracing::info!(service_id = %row.id, provider_id = %user.user_id, "Service listing created");

    Ok(Json(ServiceResponse::from_listing(row.to_domain(), None)))
}
