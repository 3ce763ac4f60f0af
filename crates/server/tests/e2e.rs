use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::Service;

use configs::{AuthConfig, CatalogConfig};
use server::routes;
use server::ServerState;
use service::auth::Argon2Hashing;
use service::user::NewUser;
use service::{Repositories, Services};

struct TestApp {
    router: Router,
}

impl TestApp {
    async fn new() -> anyhow::Result<Self> {
        let auth = AuthConfig { jwt_secret: "e2e-secret".into(), ..AuthConfig::default() };
        let services = Services::new(Repositories::in_memory(), Arc::new(Argon2Hashing::default()), &auth, &CatalogConfig::default());
        for (username, role_id) in [("admin", 1), ("manager", 2), ("clerk", 3)] {
            services
                .users
                .add(NewUser {
                    username: username.into(),
                    email: format!("{username}@example.com"),
                    password: "S3curePass!".into(),
                    first_name: username.into(),
                    last_name: "Tester".into(),
                    role_id,
                })
                .await?;
        }
        Ok(Self { router: routes::build_router(ServerState::new(services), tower_http::cors::CorsLayer::very_permissive()) })
    }

    async fn send(&mut self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<Response> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(v) => builder.header(header::CONTENT_TYPE, "application/json").body(Body::from(v.to_string()))?,
            None => builder.body(Body::empty())?,
        };
        Ok(self.router.call(req).await?)
    }

    async fn login(&mut self, username: &str) -> anyhow::Result<String> {
        let resp = self
            .send(Method::POST, "/auth/login", None, Some(json!({ "username": username, "password": "S3curePass!" })))
            .await?;
        assert_eq!(resp.status(), StatusCode::OK);
        Ok(json_of(resp).await?["token"].as_str().unwrap_or_default().to_string())
    }
}

async fn json_of(resp: Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn test_catalog_chain_with_role_gates() -> anyhow::Result<()> {
    let mut app = TestApp::new().await?;
    let manager = app.login("manager").await?;
    let clerk = app.login("clerk").await?;

    let company = json!({ "name": "Acme", "address": "1 Main St", "phone": "555-0100" });
    let resp = app.send(Method::POST, "/companies", Some(&clerk), Some(company.clone())).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_of(resp).await?["code"], 1005);

    let resp = app.send(Method::POST, "/companies", Some(&manager), Some(company.clone())).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let company_id = json_of(resp).await?["id"].as_i64().unwrap_or_default();

    let dup = json!({ "name": "Other", "address": "1 Main St", "phone": "555-0999" });
    let resp = app.send(Method::POST, "/companies", Some(&manager), Some(dup)).await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(json_of(resp).await?["detail"], "company with the same address already exists");

    let product = json!({ "name": "Widget", "company_id": company_id, "price": "12.50" });
    let resp = app.send(Method::POST, "/products", Some(&manager), Some(product)).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product = json_of(resp).await?;
    let product_id = product["id"].as_i64().unwrap_or_default();
    assert_eq!(product["registration_number"].to_string().len(), 7);

    let orphan = json!({ "name": "Gadget", "company_id": 9999, "price": "1.00" });
    let resp = app.send(Method::POST, "/products", Some(&manager), Some(orphan)).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // employees record sales; price defaults to the product's
    let resp = app
        .send(Method::POST, "/product-sales", Some(&clerk), Some(json!({ "product_id": product_id, "amount": 3 })))
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let sale = json_of(resp).await?;
    assert_eq!(sale["price_per_unit"], "12.50");
    let sale_id = sale["id"].as_i64().unwrap_or_default();

    let resp = app.send(Method::GET, "/product-sales?product_name=WIDG&page_size=5", Some(&clerk), None).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = json_of(resp).await?;
    assert_eq!(page["total_count"], 1);
    assert_eq!(page["page_size"], 5);

    let resp = app.send(Method::DELETE, &format!("/companies/{company_id}"), Some(&manager), None).await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let resp = app.send(Method::DELETE, &format!("/products/{product_id}"), Some(&manager), None).await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = app.send(Method::DELETE, &format!("/product-sales/{sale_id}"), Some(&clerk), None).await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = app.send(Method::DELETE, &format!("/products/{product_id}"), Some(&clerk), None).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = app.send(Method::DELETE, &format!("/products/{product_id}"), Some(&manager), None).await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = app.send(Method::DELETE, &format!("/companies/{company_id}"), Some(&manager), None).await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.send(Method::GET, &format!("/companies/{company_id}"), Some(&clerk), None).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_company_listing_pages() -> anyhow::Result<()> {
    let mut app = TestApp::new().await?;
    let admin = app.login("admin").await?;
    for i in 0..5 {
        let body = json!({ "name": format!("Acme {i}"), "address": format!("{i} Main St"), "phone": format!("555-010{i}") });
        assert_eq!(app.send(Method::POST, "/companies", Some(&admin), Some(body)).await?.status(), StatusCode::CREATED);
    }

    let resp = app.send(Method::GET, "/companies?name=acme&page_index=2&page_size=2", Some(&admin), None).await?;
    let page = json_of(resp).await?;
    assert_eq!(page["total_count"], 5);
    assert_eq!(page["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(page["items"][0]["name"], "Acme 4");

    let resp = app.send(Method::GET, "/companies?page_index=9", Some(&admin), None).await?;
    let page = json_of(resp).await?;
    assert_eq!(page["total_count"], 5);
    assert_eq!(page["items"].as_array().map(Vec::len), Some(0));

    let resp = app.send(Method::GET, "/companies?page_index=18446744073709551615&page_size=100", Some(&admin), None).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = json_of(resp).await?;
    assert_eq!(page["total_count"], 5);
    assert_eq!(page["items"].as_array().map(Vec::len), Some(0));

    let resp = app
        .send(Method::POST, "/products", Some(&admin), Some(json!({ "name": "Dust", "company_id": 1, "price": "0.004" })))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_of(resp).await?["code"], 1001);
    Ok(())
}

#[tokio::test]
async fn test_user_administration() -> anyhow::Result<()> {
    let mut app = TestApp::new().await?;
    let admin = app.login("admin").await?;
    let clerk = app.login("clerk").await?;

    let resp = app.send(Method::GET, "/users", Some(&clerk), None).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app.send(Method::GET, "/users?role_id=3", Some(&admin), None).await?;
    let page = json_of(resp).await?;
    assert_eq!(page["total_count"], 1);
    let clerk_id = page["items"][0]["id"].as_i64().unwrap_or_default();

    // self read allowed, reading others is not
    let resp = app.send(Method::GET, &format!("/users/{clerk_id}"), Some(&clerk), None).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app.send(Method::GET, &format!("/users/{}", clerk_id - 1), Some(&clerk), None).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .send(Method::PUT, "/users/me", Some(&clerk), Some(json!({ "username": "clerk2", "email": "clerk2@example.com" })))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_of(resp).await?["username"], "clerk2");

    let resp = app
        .send(Method::PUT, "/users/me", Some(&clerk), Some(json!({ "username": "admin", "email": "x@example.com" })))
        .await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = app
        .send(
            Method::PUT,
            &format!("/users/{clerk_id}"),
            Some(&admin),
            Some(json!({ "username": "clerk2", "email": "clerk2@example.com", "role_id": 2 })),
        )
        .await?;
    assert_eq!(json_of(resp).await?["role"], "Manager");

    let new_user = json!({
        "username": "fresh", "email": "fresh@example.com", "password": "S3curePass!",
        "first_name": "Fresh", "last_name": "Hire", "role_id": 7
    });
    let resp = app.send(Method::POST, "/users", Some(&admin), Some(new_user)).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app.send(Method::DELETE, &format!("/users/{clerk_id}"), Some(&admin), None).await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.send(Method::GET, "/roles", Some(&admin), None).await?;
    let roles = json_of(resp).await?;
    assert_eq!(roles.as_array().map(Vec::len), Some(3));
    assert_eq!(roles[0]["name"], "Admin");
    Ok(())
}
