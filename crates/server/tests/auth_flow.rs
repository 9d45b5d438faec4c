use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::Service;
use uuid::Uuid;

mod common_support;
use common_support::build_app;

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn register_and_login_flow() -> anyhow::Result<()> {
    let Some(mut app) = build_app().await? else { return Ok(()) };

    let username = format!("user_{}", Uuid::new_v4());
    let password = "S3curePass!";

    let resp = app
        .call(json_post(
            "/api/users/register",
            json!({"username": username, "password": password}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .call(json_post(
            "/api/auth/login",
            json!({"username": username, "password": password}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .headers()
        .get("set-cookie")
        .expect("set-cookie")
        .to_str()?;
    assert!(cookie.starts_with("authToken="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=None"));
    assert!(cookie.contains("Max-Age=3600"));
    Ok(())
}

#[tokio::test]
async fn login_wrong_password_sets_no_cookie() -> anyhow::Result<()> {
    let Some(mut app) = build_app().await? else { return Ok(()) };

    let username = format!("user_{}", Uuid::new_v4());
    let resp = app
        .call(json_post(
            "/api/users/register",
            json!({"username": username, "password": "StrongPass123"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .call(json_post(
            "/api/auth/login",
            json!({"username": username, "password": "wrong"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get("set-cookie").is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts() -> anyhow::Result<()> {
    let Some(mut app) = build_app().await? else { return Ok(()) };

    let username = format!("user_{}", Uuid::new_v4());
    let body = json!({"username": username, "password": "StrongPass123"});
    let resp = app.call(json_post("/api/users/register", body.clone())).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app.call(json_post("/api/users/register", body)).await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn register_short_password_rejected() -> anyhow::Result<()> {
    let Some(mut app) = build_app().await? else { return Ok(()) };

    let resp = app
        .call(json_post(
            "/api/users/register",
            json!({"username": format!("user_{}", Uuid::new_v4()), "password": "short"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn logout_without_cookie_is_unauthorized() -> anyhow::Result<()> {
    let Some(mut app) = build_app().await? else { return Ok(()) };

    let resp = app
        .call(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = axum::body::to_bytes(resp.into_body(), 64 * 1024).await?;
    let v: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(v["error"], "no token found");
    Ok(())
}

#[tokio::test]
async fn logout_revokes_the_session() -> anyhow::Result<()> {
    let Some(mut app) = build_app().await? else { return Ok(()) };

    let username = format!("user_{}", Uuid::new_v4());
    let password = "S3curePass!";
    let resp = app
        .call(json_post(
            "/api/users/register",
            json!({"username": username, "password": password}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app
        .call(json_post(
            "/api/auth/login",
            json!({"username": username, "password": password}),
        ))
        .await?;
    let set_cookie = resp.headers().get("set-cookie").expect("cookie").to_str()?;
    let cookie_pair = set_cookie.split(';').next().expect("cookie pair").to_string();

    // works before logout
    let resp = app
        .call(
            Request::builder()
                .uri("/api/cart/count")
                .header("cookie", &cookie_pair)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // logout clears and revokes
    let resp = app
        .call(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .header("cookie", &cookie_pair)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let clearing = resp.headers().get("set-cookie").expect("clearing cookie").to_str()?;
    assert!(clearing.starts_with("authToken=;") || clearing.contains("Max-Age=0"));

    // same token is now dead even though it has not expired
    let resp = app
        .call(
            Request::builder()
                .uri("/api/cart/count")
                .header("cookie", &cookie_pair)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
