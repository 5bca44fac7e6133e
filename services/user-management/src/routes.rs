use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use bunkmate_auth::{auth_middleware, AuthContext};

use crate::handlers;
use crate::services::AppState;

pub fn create_routes(auth_ctx: AuthContext) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/password-reset", post(handlers::request_password_reset))
        .route(
            "/auth/password-reset/confirm",
            post(handlers::confirm_password_reset),
        );

    let protected = Router::new()
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::get_current_user))
        .route("/users/me", put(handlers::update_profile))
        .route("/users/blocked-hostels", get(handlers::list_blocked_hostels))
        .route(
            "/users/blocked-hostels/:hostel_id",
            post(handlers::block_hostel),
        )
        .route(
            "/users/blocked-hostels/:hostel_id",
            delete(handlers::unblock_hostel),
        )
        // Owner console
        .route("/users", get(handlers::list_users))
        .route("/users/:user_id/status", post(handlers::set_user_status))
        .route_layer(middleware::from_fn_with_state(auth_ctx, auth_middleware));

    public.merge(protected)
}
