//! Hearth Marketplace API
//!
//! HTTP service for the home-services marketplace: service listings, the
//! booking lifecycle, and subscription-discounted payments.
//!
//! ## REST Endpoints
//!
//! - `GET /api/v1/services` - List service listings
//! - `POST /api/v1/services` - Publish a listing (provider)
//! - `GET /api/v1/services/mine` - List own listings (provider)
//! - `GET /api/v1/profiles/me` - Get own profile
//! - `POST /api/v1/profiles` - Register a profile
//! - `PUT /api/v1/profiles/me/role` - Change own role
//! - `POST /api/v1/bookings` - Request a booking (customer)
//! - `GET /api/v1/bookings` - List own bookings
//! - `POST /api/v1/bookings/{id}/accept` - Accept a request (provider)
//! - `POST /api/v1/bookings/{id}/decline` - Decline a request (provider)
//! - `POST /api/v1/bookings/{id}/start` - Start work (provider)
//! - `POST /api/v1/bookings/{id}/complete` - Finish work (provider)
//! - `POST /api/v1/bookings/{id}/feedback` - Rate a completed booking (customer)
//! - `GET /api/v1/payments/summary` - Outstanding payments with discounts
//! - `POST /api/v1/payments/checkout` - Checkout session for a booking
//! - `POST /api/v1/subscriptions/checkout` - Checkout session for a plan
//! - `POST /webhooks/stripe` - Stripe webhook handler
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

mod config;
mod error;
mod events;
mod extractors;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::connect_info::IntoMakeServiceWithConnectInfo;
use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use hearth_billing_core::{BillingService, StripeProvider, WebhookHandler};
use hearth_booking_core::BookingService;
use hearth_db::Repositories;

use crate::config::Config;
use crate::events::TracingEventPublisher;
use crate::handlers::{health, ready};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("marketplace_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Hearth Marketplace API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(http_port = config.http_port, "Configuration loaded");

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Create database pool
    let pool = hearth_db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Apply pending migrations
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Migrations applied");

    // Create repositories
    let repos = Repositories::new(pool.clone());

    // Create domain services
    let bookings = BookingService::new(repos.clone(), Arc::new(TracingEventPublisher));
    let provider = StripeProvider::new(config.billing.clone());
    let billing = BillingService::new(repos.clone(), Arc::new(provider), config.billing.clone());
    let webhooks = WebhookHandler::new(&config.billing.stripe_webhook_secret);

    // Create application state
    let state = AppState::new(bookings, billing, webhooks, repos, pool, config.clone());

    // Build HTTP router
    let app = build_router(state, metrics_handle);

    // Start server
    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    run_http_server(app, http_addr).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    // API v1 routes
    let api_v1 = Router::new()
        // Service listings
        .route("/services", get(handlers::list_services))
        .route("/services", post(handlers::create_service))
        .route("/services/mine", get(handlers::list_my_services))
        // Profiles
        .route("/profiles", post(handlers::create_profile))
        .route("/profiles/me", get(handlers::get_profile))
        .route("/profiles/me/role", put(handlers::update_role))
        // Booking lifecycle
        .route("/bookings", post(handlers::create_booking))
        .route("/bookings", get(handlers::list_bookings))
        .route("/bookings/{id}/accept", post(handlers::accept_booking))
        .route("/bookings/{id}/decline", post(handlers::decline_booking))
        .route("/bookings/{id}/start", post(handlers::start_booking))
        .route("/bookings/{id}/complete", post(handlers::complete_booking))
        .route("/bookings/{id}/feedback", post(handlers::submit_feedback))
        // Payments
        .route("/payments/summary", get(handlers::payment_summary))
        .route("/payments/checkout", post(handlers::booking_checkout))
        // Subscriptions
        .route("/subscriptions/checkout", post(handlers::plan_checkout));

    // Webhook route (separate - uses raw body, no JSON parsing)
    let webhook_routes = Router::new().route("/webhooks/stripe", post(handlers::stripe_webhook));

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    // Combine all routes
    Router::new()
        .nest("/api/v1", api_v1)
        .merge(webhook_routes)
        .layer(middleware)
        .merge(health_routes) // Health routes without timeout
        .merge(metrics_route) // Metrics route without timeout
        .with_state(state)
}

async fn run_http_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let service: IntoMakeServiceWithConnectInfo<Router, SocketAddr> =
        app.into_make_service_with_connect_info();

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    // Most handlers are a handful of single-row queries; checkout calls
    // out to Stripe, hence the long tail.
    let latency_buckets = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.2, 0.5, 1.0, 2.5];

    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            latency_buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("marketplace_operation_duration_seconds".to_string()),
            latency_buckets,
        )?;

    let handle = builder.install_recorder()?;

    // Register metrics with descriptions
    metrics::describe_counter!(
        "marketplace_bookings_created_total",
        "Total booking requests created"
    );
    metrics::describe_counter!(
        "marketplace_booking_transitions_total",
        "Total booking lifecycle transitions by action"
    );
    metrics::describe_counter!(
        "marketplace_feedback_submitted_total",
        "Total feedback submissions"
    );
    metrics::describe_counter!(
        "marketplace_services_created_total",
        "Total service listings published"
    );
    metrics::describe_counter!(
        "marketplace_checkouts_created_total",
        "Total checkout sessions created by kind"
    );
    metrics::describe_counter!(
        "marketplace_webhooks_processed_total",
        "Total webhooks processed by status"
    );
    metrics::describe_counter!(
        "marketplace_plans_applied_total",
        "Total subscription plans applied from webhooks"
    );
    metrics::describe_counter!(
        "booking_events_total",
        "Total booking events published by kind"
    );
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request latency in seconds"
    );
    metrics::describe_histogram!(
        "marketplace_operation_duration_seconds",
        "Operation latency in seconds by operation type"
    );

    Ok(handle)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
