use axum::{
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use models::user::Role;
use service::auth::domain::AuthUser;

use crate::errors::ApiError;
use crate::state::ServerState;

pub const TOKEN_COOKIE: &str = "authToken";

/// Exact paths and prefixes reachable without a token.
pub fn is_public_path(path: &str) -> bool {
    matches!(
        path,
        "/health" | "/api/users/register" | "/api/auth/login" | "/api/auth/logout"
    ) || path.starts_with("/docs")
        || path.starts_with("/api-docs")
}

/// Role required by a path prefix; `None` means any authenticated user.
pub fn required_role(path: &str) -> Option<Role> {
    if path.starts_with("/admin/") {
        Some(Role::Admin)
    } else if path.starts_with("/api/") {
        Some(Role::Customer)
    } else {
        None
    }
}

/// Pull the token out of a raw `Cookie` header value.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|kv| kv.strip_prefix("authToken="))
        .filter(|t| !t.is_empty())
}

/// Access-control gate applied to the whole router.
///
/// Order matters: preflight and public paths short-circuit; then the token
/// is extracted, validated, checked against the denylist, resolved to a
/// user, and finally role-matched against the path prefix. The resolved
/// user is stored in request extensions for handlers.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    let path = req.uri().path().to_string();
    if is_public_path(&path) {
        return Ok(next.run(req).await);
    }

    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let token = token_from_cookie_header(cookie_header)
        .ok_or_else(|| ApiError::unauthorized("no token found"))?
        .to_string();

    let claims = state.tokens.decode(&token).map_err(|e| {
        warn!(path = %path, error = %e, "token validation failed");
        ApiError::unauthorized("invalid or expired token")
    })?;

    if state.revocations.is_revoked(&claims.jti).await? {
        warn!(path = %path, jti = %claims.jti, "revoked token presented");
        return Err(ApiError::unauthorized("token revoked"));
    }

    let user = models::user::find_by_username(&state.db, &claims.sub)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::unauthorized("unknown user"))?;

    if let Some(required) = required_role(&path) {
        if user.role != required {
            warn!(path = %path, username = %user.username, role = ?user.role, "role mismatch");
            return Err(ApiError::forbidden("insufficient role"));
        }
    }

    req.extensions_mut().insert(AuthUser {
        id: user.id,
        username: user.username,
        role: user.role,
    });
    Ok(next.run(req).await)
}
