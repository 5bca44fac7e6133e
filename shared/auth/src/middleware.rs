use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use bunkmate_common::{AppError, RedisKeys, RedisService, UserRole};

use crate::jwt::{Claims, JwtService};

// Shared state for the auth layers; independent of each service's own state.
#[derive(Clone)]
pub struct AuthContext {
    pub jwt_service: JwtService,
    pub redis_service: RedisService,
}

// Validates the JWT and the Redis-backed session, then stores the claims in
// request extensions for handlers to pick up via Extension<Claims>.
pub async fn auth_middleware(
    State(ctx): State<AuthContext>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_token_from_headers(&headers).ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = ctx
        .jwt_service
        .validate_token(&token)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    // A token is only good while its session lives; logout revokes it.
    let session = ctx
        .redis_service
        .get_session(&claims.sub)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    if session.is_none() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

// Same as auth_middleware but requests without a valid token pass through
// anonymously. Used by the public listing search so blocked hostels can be
// filtered for signed-in travelers.
pub async fn optional_auth_middleware(
    State(ctx): State<AuthContext>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token_from_headers(&headers) {
        if let Ok(claims) = ctx.jwt_service.validate_token(&token) {
            if let Ok(Some(_)) = ctx.redis_service.get_session(&claims.sub).await {
                request.extensions_mut().insert(claims);
            }
        }
    }

    next.run(request).await
}

// Fixed-window rate limiting keyed by user when authenticated, else by
// forwarded address. Fails open when Redis is unavailable.
pub async fn rate_limit_middleware(
    State(ctx): State<AuthContext>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user_id = extract_token_from_headers(&headers)
        .and_then(|token| ctx.jwt_service.validate_token(&token).ok())
        .map(|claims| claims.sub);

    let subject = match &user_id {
        Some(id) => id.clone(),
        None => headers
            .get("x-forwarded-for")
            .or_else(|| headers.get("x-real-ip"))
            .and_then(|h| h.to_str().ok())
            .unwrap_or("anonymous")
            .to_string(),
    };

    let key = RedisKeys::rate_limit(&subject, request.uri().path());
    let limit = if user_id.is_some() { 100 } else { 20 };

    let allowed = ctx
        .redis_service
        .check_rate_limit(&key, limit, 60)
        .await
        .unwrap_or(true);

    if !allowed {
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    Ok(next.run(request).await)
}

// Handler-side role guard for owner console operations.
pub fn require_owner(claims: &Claims) -> Result<(), AppError> {
    if claims.role != UserRole::Owner {
        return Err(AppError::Authorization(
            "Owner role required".to_string(),
        ));
    }
    Ok(())
}

fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("Authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    auth_str.strip_prefix("Bearer ").map(|token| token.to_string())
}
