use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use bunkmate_auth::{auth_middleware, AuthContext};

use crate::handlers;
use crate::services::AppState;

pub fn create_routes(auth_ctx: AuthContext) -> Router<AppState> {
    let public = Router::new().route("/health", get(handlers::health_check));

    let protected = Router::new()
        .route("/notifications", get(handlers::list_notifications))
        .route("/notifications/unread-count", get(handlers::unread_count))
        .route("/notifications/read-all", post(handlers::mark_all_read))
        .route(
            "/notifications/:notification_id/read",
            post(handlers::mark_read),
        )
        .route_layer(middleware::from_fn_with_state(auth_ctx, auth_middleware));

    public.merge(protected)
}
