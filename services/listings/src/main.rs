mod config;
mod filters;
mod handlers;
mod models;
mod routes;
mod services;

use axum::{
    http::{Method, StatusCode},
    middleware,
    response::Json,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bunkmate_auth::{rate_limit_middleware, AuthContext, JwtService};
use bunkmate_common::ApiResponse;
use bunkmate_database::create_pool;

use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bunkmate_listings=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();

    let db_pool = create_pool(&config.database).await?;
    bunkmate_database::run_migrations(&db_pool).await?;

    let redis_service = bunkmate_common::RedisService::new(&config.redis).await?;
    let jwt_service = JwtService::new(&config.jwt.secret);

    let auth_ctx = AuthContext {
        jwt_service,
        redis_service: redis_service.clone(),
    };

    let app_state = services::AppState {
        db_pool,
        redis_service,
        config: config.clone(),
    };

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .allow_origin(Any);

    let app = routes::create_routes(auth_ctx.clone())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::from_fn_with_state(auth_ctx, rate_limit_middleware)),
        )
        .with_state(app_state)
        .fallback(handler_404);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))
            .await?;

    tracing::info!(
        "Listings Service listening on {}:{}",
        config.server.host,
        config.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}

async fn handler_404() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error("Endpoint not found".to_string())),
    )
}
