use std::sync::Arc;

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use uuid::Uuid;

use models::user::Role;
use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::AuthConfig;
use service::auth::AuthService;

use crate::errors::ApiError;
use crate::gate::TOKEN_COOKIE;
use crate::state::ServerState;

#[derive(Serialize)]
pub struct RegisterOutput {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub message: &'static str,
    pub username: String,
    pub role: Role,
}

fn auth_service(state: &ServerState) -> AuthService<SeaOrmAuthRepository> {
    let repo = Arc::new(SeaOrmAuthRepository { db: state.db.clone() });
    AuthService::new(repo, state.tokens.clone(), AuthConfig::default())
}

#[utoipa::path(post, path = "/api/users/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 200, description = "Registered"),
        (status = 400, description = "Bad Request"),
        (status = 409, description = "Conflict")
    ))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<Json<RegisterOutput>, ApiError> {
    let user = auth_service(&state).register(input).await?;
    Ok(Json(RegisterOutput { user_id: user.id, username: user.username, role: user.role }))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged In"),
        (status = 401, description = "Unauthorized")
    ))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), ApiError> {
    let session = auth_service(&state).login(input).await?;

    let mut cookie = Cookie::new(TOKEN_COOKIE, session.token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::None);
    cookie.set_max_age(time::Duration::seconds(state.tokens.ttl_secs()));
    let jar = jar.add(cookie);

    Ok((
        jar,
        Json(LoginOutput {
            message: "login successful",
            username: session.user.username,
            role: session.user.role,
        }),
    ))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "auth",
    responses(
        (status = 200, description = "Logged Out"),
        (status = 401, description = "No token")
    ))]
pub async fn logout(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let token = jar
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::unauthorized("no token found"))?;

    auth_service(&state)
        .logout(&token, state.revocations.as_ref())
        .await?;

    let mut removal = Cookie::from(TOKEN_COOKIE);
    removal.set_path("/");
    let jar = jar.remove(removal);
    Ok((jar, Json(serde_json::json!({"message": "logout successful"}))))
}
