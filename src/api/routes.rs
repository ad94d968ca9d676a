use crate::auth::jwt::AuthService;
use crate::AppState;
use axum::{
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use std::sync::Arc;

/// Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn create_router(auth_service: Arc<AuthService>) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/health", get(health))
        .route("/auth/register", post(crate::api::handlers::auth::register))
        .route("/auth/login", post(crate::api::handlers::auth::login))
        .route(
            "/auth/refresh",
            post(crate::api::handlers::auth::refresh_token),
        )
        .route(
            "/auth/google",
            post(crate::api::handlers::auth::google_sign_in),
        )
        .route("/auth/otp/send", post(crate::api::handlers::auth::send_otp))
        .route(
            "/auth/otp/confirm",
            post(crate::api::handlers::auth::confirm_otp),
        )
        .route(
            "/auth/reset",
            post(crate::api::handlers::auth::request_password_reset),
        );

    let protected_routes = Router::new()
        // Calendar routes
        .route("/calendar/grid", get(crate::api::handlers::calendar::grid))
        .route(
            "/events",
            get(crate::api::handlers::calendar::list_events)
                .post(crate::api::handlers::calendar::create_event),
        )
        .route(
            "/events/next-deadline",
            get(crate::api::handlers::calendar::next_deadline),
        )
        .route(
            "/events/{event_id}",
            delete(crate::api::handlers::calendar::delete_event),
        )
        // Chat routes
        .route(
            "/chat/rooms/{room_id}/messages",
            get(crate::api::handlers::chat::list_messages)
                .post(crate::api::handlers::chat::send_message),
        )
        .route(
            "/chat/rooms/{room_id}/stream",
            get(crate::api::handlers::chat::stream_messages),
        )
        // Dashboard page routes
        .route("/faculty", get(crate::api::handlers::pages::list_faculty))
        .route(
            "/faculty/{member_id}/actions",
            get(crate::api::handlers::pages::faculty_actions)
                .post(crate::api::handlers::pages::invoke_faculty_action),
        )
        .route(
            "/categories",
            get(crate::api::handlers::pages::list_categories),
        )
        .route("/contacts", get(crate::api::handlers::pages::list_contacts))
        .route(
            "/notifications",
            get(crate::api::handlers::pages::list_notifications),
        )
        .route(
            "/notifications/{notification_id}/read",
            post(crate::api::handlers::pages::mark_notification_read),
        )
        .route("/reports", get(crate::api::handlers::pages::list_reports))
        // Preference routes
        .route(
            "/settings",
            get(crate::api::handlers::settings::get_settings)
                .put(crate::api::handlers::settings::update_settings),
        )
        .layer(middleware::from_fn(move |req, next| {
            crate::auth::middleware::auth_middleware(auth_service.clone(), req, next)
        }));

    public_routes.merge(protected_routes)
}
