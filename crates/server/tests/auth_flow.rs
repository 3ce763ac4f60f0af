use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::Service;

use configs::{AuthConfig, CatalogConfig};
use server::routes;
use server::ServerState;
use service::auth::Argon2Hashing;
use service::user::NewUser;
use service::{Repositories, Services};

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

async fn build_app() -> anyhow::Result<Router> {
    let auth = AuthConfig { jwt_secret: "test-secret".into(), ..AuthConfig::default() };
    let services = Services::new(Repositories::in_memory(), Arc::new(Argon2Hashing::default()), &auth, &CatalogConfig::default());
    services
        .users
        .add(NewUser {
            username: "jane".into(),
            email: "jane@example.com".into(),
            password: "S3curePass!".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            role_id: 3,
        })
        .await?;
    Ok(routes::build_router(ServerState::new(services), cors()))
}

async fn body_json(resp: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "username": username, "password": password }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_login_me_and_password_flow() -> anyhow::Result<()> {
    let mut app = build_app().await?;

    let resp = app.call(login_request("jane", "S3curePass!")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_default();
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("HttpOnly"));
    let session = body_json(resp).await?;
    let token = session["token"].as_str().unwrap_or_default().to_string();
    assert_eq!(session["user"]["username"], "jane");
    assert_eq!(session["user"]["role"], "Employee");
    assert!(session["user"].get("password").is_none());

    // bearer header
    let req = Request::builder()
        .uri("/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await?["email"], "jane@example.com");

    // cookie fallback
    let req = Request::builder()
        .uri("/auth/me")
        .header(header::COOKIE, format!("auth_token={token}"))
        .body(Body::empty())?;
    assert_eq!(app.call(req).await?.status(), StatusCode::OK);

    let req = Request::builder()
        .method("PUT")
        .uri("/auth/password")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "current_password": "S3curePass!", "new_password": "EvenB3tterPass" }).to_string()))?;
    assert_eq!(app.call(req).await?.status(), StatusCode::NO_CONTENT);

    assert_eq!(app.call(login_request("jane", "S3curePass!")).await?.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.call(login_request("jane", "EvenB3tterPass")).await?.status(), StatusCode::OK);

    let req = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header(header::COOKIE, format!("auth_token={token}"))
        .body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let cleared = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_default();
    assert!(cleared.starts_with("auth_token=;"));
    assert!(cleared.contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn test_login_failures_are_generic() -> anyhow::Result<()> {
    let mut app = build_app().await?;

    let unknown = body_json(app.call(login_request("nobody", "S3curePass!")).await?).await?;
    let wrong = body_json(app.call(login_request("jane", "wrong-password")).await?).await?;
    assert_eq!(unknown, wrong);
    assert_eq!(unknown["error"], "Unauthorized");
    assert_eq!(unknown["code"], 1004);
    Ok(())
}

#[tokio::test]
async fn test_protected_routes_need_a_valid_token() -> anyhow::Result<()> {
    let mut app = build_app().await?;

    let req = Request::builder().uri("/companies").body(Body::empty())?;
    assert_eq!(app.call(req).await?.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/companies")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())?;
    assert_eq!(app.call(req).await?.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/companies")
        .header(header::AUTHORIZATION, "Bearer not.a.jwt")
        .body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await?["detail"], "invalid or expired token");

    // public routes stay open
    let req = Request::builder().uri("/health").body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await?["status"], "ok");

    let req = Request::builder().uri("/api-docs/openapi.json").body(Body::empty())?;
    assert_eq!(app.call(req).await?.status(), StatusCode::OK);
    Ok(())
}
