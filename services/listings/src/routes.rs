use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use bunkmate_auth::{auth_middleware, optional_auth_middleware, AuthContext};

use crate::handlers;
use crate::services::AppState;

pub fn create_routes(auth_ctx: AuthContext) -> Router<AppState> {
    // Search runs with optional viewer context so blocked hostels can be
    // filtered for signed-in travelers without requiring a login.
    let search = Router::new()
        .route("/hostels", get(handlers::search_hostels))
        .route_layer(middleware::from_fn_with_state(
            auth_ctx.clone(),
            optional_auth_middleware,
        ));

    let public = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/hostels/:hostel_id", get(handlers::get_hostel))
        .route("/hostels/:hostel_id/reviews", get(handlers::list_reviews));

    let protected = Router::new()
        // Owner console
        .route("/hostels", post(handlers::create_hostel))
        .route("/hostels/owner/mine", get(handlers::list_owner_hostels))
        .route("/hostels/:hostel_id", put(handlers::update_hostel))
        .route("/hostels/:hostel_id", delete(handlers::delete_hostel))
        // Reviews and wishlist
        .route("/hostels/:hostel_id/reviews", post(handlers::submit_review))
        .route("/wishlist", get(handlers::list_wishlist))
        .route("/wishlist/toggle", post(handlers::toggle_wishlist))
        .route("/wishlist/:hostel_id/status", get(handlers::wishlist_status))
        .route_layer(middleware::from_fn_with_state(auth_ctx, auth_middleware));

    search.merge(public).merge(protected)
}
