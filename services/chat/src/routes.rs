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
        .route("/chat/messages", post(handlers::send_message))
        .route("/chat/threads", get(handlers::list_threads))
        .route("/chat/threads/:thread_id/messages", get(handlers::get_messages))
        .route("/chat/threads/:thread_id/messages", post(handlers::reply))
        .route_layer(middleware::from_fn_with_state(auth_ctx, auth_middleware));

    public.merge(protected)
}
