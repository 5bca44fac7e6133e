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
        .route("/bookings", post(handlers::create_booking))
        .route("/bookings", get(handlers::list_my_bookings))
        // Owner console (static segments before the :booking_id matcher)
        .route("/bookings/owner", get(handlers::list_owner_bookings))
        .route("/bookings/owner/stats", get(handlers::owner_stats))
        .route("/bookings/export", get(handlers::export_bookings))
        .route("/bookings/:booking_id", get(handlers::get_booking))
        .route("/bookings/:booking_id/cancel", post(handlers::cancel_booking))
        .route(
            "/bookings/:booking_id/status",
            post(handlers::set_booking_status),
        )
        .route_layer(middleware::from_fn_with_state(auth_ctx, auth_middleware));

    public.merge(protected)
}
