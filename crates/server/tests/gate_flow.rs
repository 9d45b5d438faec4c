use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::Service;
use uuid::Uuid;

mod common_support;
use common_support::build_app;

async fn login_cookie(
    app: &mut Router,
    username: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<String> {
    let req = Request::builder()
        .method("POST")
        .uri("/api/users/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"username": username, "password": password, "role": role}).to_string(),
        ))?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"username": username, "password": password}).to_string(),
        ))?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp
        .headers()
        .get("set-cookie")
        .expect("set-cookie")
        .to_str()?;
    Ok(set_cookie.split(';').next().expect("pair").to_string())
}

#[tokio::test]
async fn protected_route_requires_token() -> anyhow::Result<()> {
    let Some(mut app) = build_app().await? else { return Ok(()) };

    let resp = app
        .call(Request::builder().uri("/api/cart").body(Body::empty())?)
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .call(
            Request::builder()
                .uri("/api/cart")
                .header("cookie", "authToken=not.a.token")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn admin_prefix_rejects_customers() -> anyhow::Result<()> {
    let Some(mut app) = build_app().await? else { return Ok(()) };

    let username = format!("cust_{}", Uuid::new_v4());
    let cookie = login_cookie(&mut app, &username, "S3curePass!", "CUSTOMER").await?;

    let req = Request::builder()
        .method("POST")
        .uri("/admin/products")
        .header("content-type", "application/json")
        .header("cookie", &cookie)
        .body(Body::from(
            json!({"name": "Nope", "price": 1.0, "stock": 1}).to_string(),
        ))?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn customer_prefix_rejects_admins() -> anyhow::Result<()> {
    let Some(mut app) = build_app().await? else { return Ok(()) };

    let username = format!("admin_{}", Uuid::new_v4());
    let cookie = login_cookie(&mut app, &username, "S3curePass!", "ADMIN").await?;

    let resp = app
        .call(
            Request::builder()
                .uri("/api/cart")
                .header("cookie", &cookie)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admin_can_manage_catalog_and_customer_can_shop() -> anyhow::Result<()> {
    let Some(mut app) = build_app().await? else { return Ok(()) };

    let admin = format!("admin_{}", Uuid::new_v4());
    let admin_cookie = login_cookie(&mut app, &admin, "S3curePass!", "ADMIN").await?;

    // admin creates a product
    let req = Request::builder()
        .method("POST")
        .uri("/admin/products")
        .header("content-type", "application/json")
        .header("cookie", &admin_cookie)
        .body(Body::from(
            json!({"name": format!("Gate Widget {}", Uuid::new_v4()), "description": "x", "price": 19.99, "stock": 5}).to_string(),
        ))?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), 64 * 1024).await?;
    let product: serde_json::Value = serde_json::from_slice(&body)?;
    let product_id = product["id"].as_str().expect("product id").to_string();

    // customer adds it to the cart
    let customer = format!("cust_{}", Uuid::new_v4());
    let customer_cookie = login_cookie(&mut app, &customer, "S3curePass!", "CUSTOMER").await?;

    let req = Request::builder()
        .method("POST")
        .uri("/api/cart/items")
        .header("content-type", "application/json")
        .header("cookie", &customer_cookie)
        .body(Body::from(
            json!({"product_id": product_id, "quantity": 2}).to_string(),
        ))?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .call(
            Request::builder()
                .uri("/api/cart/count")
                .header("cookie", &customer_cookie)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), 64 * 1024).await?;
    let v: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(v["count"], 2);

    // listing includes product details and line totals
    let resp = app
        .call(
            Request::builder()
                .uri("/api/cart")
                .header("cookie", &customer_cookie)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), 64 * 1024).await?;
    let v: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(v["items"].as_array().expect("items").len(), 1);

    // clear the cart
    let resp = app
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/api/cart")
                .header("cookie", &customer_cookie)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    let Some(mut app) = build_app().await? else { return Ok(()) };

    let resp = app
        .call(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}
