pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::db::Database;
use crate::user_auth::{self, UserAuthService};
use state::AppState;

/// Build the full application router
pub fn build_router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(user_auth::handlers::register))
        .route("/login", post(user_auth::handlers::login));

    // Public browsing: anyone can look at listings
    let public_routes = Router::new()
        .route("/items", get(handlers::items::list_items))
        .route("/items/{item_id}", get(handlers::items::get_item));

    // Everything that acts as a user requires a JWT
    let private_routes = Router::new()
        // Users
        .route("/users/me", get(user_auth::handlers::me))
        // Items
        .route("/items", post(handlers::items::create_item))
        .route("/items/mine", get(handlers::items::my_items))
        .route("/items/{item_id}", put(handlers::items::update_item))
        .route("/items/{item_id}", delete(handlers::items::delete_item))
        // Swaps
        .route("/swaps", get(handlers::swaps::list_swaps))
        .route("/swaps/propose", post(handlers::swaps::propose_swap))
        .route("/swaps/{swap_id}", get(handlers::swaps::get_swap))
        .route("/swaps/{swap_id}/accept", put(handlers::swaps::accept_swap))
        .route("/swaps/{swap_id}/reject", put(handlers::swaps::reject_swap))
        .route("/swaps/{swap_id}/cancel", put(handlers::swaps::cancel_swap))
        .route(
            "/swaps/{swap_id}/complete",
            put(handlers::swaps::complete_swap),
        )
        // Redemptions
        .route("/redemptions", get(handlers::redemptions::list_redemptions))
        .route(
            "/redemptions/items/{item_id}",
            post(handlers::redemptions::redeem_item),
        )
        .route(
            "/redemptions/items/{item_id}",
            get(handlers::redemptions::get_redemption_status),
        )
        .route(
            "/redemptions/{redemption_id}/shipped",
            put(handlers::redemptions::mark_shipped),
        )
        .route(
            "/redemptions/{redemption_id}/received",
            put(handlers::redemptions::mark_received),
        )
        .route(
            "/redemptions/{redemption_id}/cancel",
            put(handlers::redemptions::cancel_redemption),
        )
        // Notifications
        .route(
            "/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/notifications/unread",
            get(handlers::notifications::list_unread),
        )
        .route(
            "/notifications/read",
            put(handlers::notifications::mark_many_read),
        )
        .route(
            "/notifications/{notification_id}/read",
            put(handlers::notifications::mark_notification_read),
        )
        .route(
            "/notifications/{notification_id}",
            delete(handlers::notifications::delete_notification),
        )
        // Points
        .route("/points/balance", get(handlers::points::get_balance))
        .route("/points/history", get(handlers::points::get_history))
        .route("/points/reconcile", get(handlers::points::reconcile))
        .layer(from_fn_with_state(
            state.clone(),
            user_auth::middleware::jwt_auth_middleware,
        ));

    Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1/auth", auth_routes)
        // The JWT layer was applied to private_routes only, so the merge
        // keeps public browsing unauthenticated
        .nest("/api/v1", public_routes.merge(private_routes))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start the HTTP gateway
pub async fn run_server(config: &AppConfig, db: Arc<Database>) -> anyhow::Result<()> {
    let user_auth = Arc::new(UserAuthService::new(
        db.pool().clone(),
        config.jwt_secret.clone(),
        config.rewards,
    ));

    let state = Arc::new(AppState::new(db, user_auth, config.rewards));
    let app = build_router(state);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    info!("Gateway listening on http://{}", addr);
    info!("API docs at http://{}/docs", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
