#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use realestate::{
    api::{create_router, AppState},
    config::{
        listings::ListingFixture,
        sync::{sync_listings_from_fixture, SeedReport},
        Settings,
    },
    db::{self, DbPool},
};
use std::path::Path;
use tower::ServiceExt;

/// In-memory database seeded with the bundled fixture
pub async fn seeded_pool() -> DbPool {
    let pool = db::init_pool("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let report = reseed(&pool).await;
    assert_eq!(report.added, 8);

    pool
}

/// Run the bundled fixture through the seeder again, as `serve` does at startup
pub async fn reseed(pool: &DbPool) -> SeedReport {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/listings.yaml");
    let fixture = ListingFixture::from_file(&path).expect("Failed to load fixture");
    sync_listings_from_fixture(pool, &fixture)
        .await
        .expect("Failed to seed fixture")
}

pub fn app(pool: DbPool, settings: Settings) -> Router {
    let state = AppState {
        pool,
        settings: settings.clone(),
    };
    create_router(state, &settings)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// `name=value` of the session cookie set by a response, ready for a `Cookie` header
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
