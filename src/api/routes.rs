use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

#[cfg(not(test))]
use {
    axum::extract::ConnectInfo,
    std::net::IpAddr,
    std::sync::Arc,
    tower_governor::{governor::GovernorConfigBuilder, key_extractor::KeyExtractor, GovernorLayer},
    tracing::warn,
};

use crate::api::handlers::{self as api_handlers, AppState};
use crate::config::Settings;
use crate::web::handlers as web_handlers;

/// Directory served under `/static`
pub const STATIC_DIR: &str = "static";

/// Create the router with all endpoints (API + Web UI)
#[cfg_attr(test, allow(unused_variables))]
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    #[cfg_attr(test, allow(unused_mut))]
    let mut api_routes = Router::new()
        // Listings
        .route("/properties", get(api_handlers::list_properties))
        .route("/properties/:id", get(api_handlers::get_property))
        .route("/properties/:id/reviews", get(api_handlers::list_reviews))
        // Stats
        .route("/stats", get(api_handlers::get_stats))
        // Admin (session cookie required)
        .route("/admin/properties", post(api_handlers::create_property))
        .route("/admin/properties/:id", delete(api_handlers::delete_property))
        .with_state(state.clone());

    // Rate limiting only in non-test builds. Clients are keyed by peer IP,
    // falling back to 127.0.0.1 when the connection info is missing.
    // Behind a reverse proxy, have the proxy set X-Real-IP / X-Forwarded-For
    // and switch to SmartIpKeyExtractor.
    #[cfg(not(test))]
    {
        #[derive(Clone, Copy, Debug)]
        struct FallbackIpKeyExtractor;

        impl KeyExtractor for FallbackIpKeyExtractor {
            type Key = IpAddr;

            fn extract<B>(
                &self,
                req: &axum::http::Request<B>,
            ) -> Result<Self::Key, tower_governor::GovernorError> {
                let extensions = req.extensions();
                if let Some(ConnectInfo(addr)) =
                    extensions.get::<ConnectInfo<std::net::SocketAddr>>()
                {
                    return Ok(addr.ip());
                }
                if let Some(addr) = extensions.get::<std::net::SocketAddr>() {
                    return Ok(addr.ip());
                }
                Ok(IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)))
            }
        }

        let governor_conf = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            // One token every 1000/rate ms, i.e. `api_rate_limit` per second
            .per_millisecond((1000 / settings.server.api_rate_limit.max(1)).max(1))
            .burst_size(settings.server.api_rate_limit as u32 * 2)
            .finish();

        match governor_conf {
            Some(config) => {
                api_routes = api_routes.layer(GovernorLayer {
                    config: Arc::new(config),
                });
            }
            None => warn!("Invalid API rate limit settings, rate limiting disabled"),
        }
    }

    let api_routes = api_routes;

    // Web UI routes
    let web_routes = Router::new()
        .route("/", get(web_handlers::index))
        .route("/properties", get(web_handlers::properties_page))
        .route("/property/:id", get(web_handlers::property_detail))
        .route("/property/:id/reviews", post(web_handlers::submit_review))
        .route("/about", get(web_handlers::about_page))
        .route(
            "/contact",
            get(web_handlers::contact_page).post(web_handlers::contact_submit),
        )
        .route(
            "/login",
            get(web_handlers::login_page).post(web_handlers::login_submit),
        )
        .route(
            "/register",
            get(web_handlers::register_page).post(web_handlers::register_submit),
        )
        .route("/logout", post(web_handlers::logout))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route(
            "/login",
            get(web_handlers::admin_login_page).post(web_handlers::admin_login_submit),
        )
        .route("/dashboard", get(web_handlers::admin_dashboard))
        .route("/properties", get(web_handlers::admin_properties))
        .route(
            "/properties/add",
            get(web_handlers::admin_add_property_page)
                .post(web_handlers::admin_add_property_submit),
        )
        .route(
            "/properties/bulk-delete",
            post(web_handlers::admin_bulk_delete),
        )
        .route(
            "/properties/:id/delete",
            post(web_handlers::admin_delete_property),
        )
        .route("/properties/:id/state", post(web_handlers::admin_set_state))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(api_handlers::health_check))
        .route("/ready", get(api_handlers::readiness_check))
        .with_state(state.clone());

    let static_routes = Router::new().nest_service("/static", ServeDir::new(STATIC_DIR));

    Router::new()
        .merge(web_routes)
        .merge(health_routes)
        .merge(static_routes)
        .nest("/admin", admin_routes)
        .nest("/api", api_routes)
        .layer(CookieManagerLayer::new())
        .layer(
            // Request body size limit - prevent memory exhaustion from large payloads
            RequestBodyLimitLayer::new(settings.pagination.max_request_body_size),
        )
        .layer(
            // CORS - cross-origin reads of the public API only
            CorsLayer::new()
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_origin(tower_http::cors::Any)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            // Listing photos are hot-linked from external hosts
            HeaderValue::from_static(
                "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; font-src 'self' data:; form-action 'self'; object-src 'none'; base-uri 'self'",
            ),
        ))
        .layer(
            // Compression
            CompressionLayer::new(),
        )
        .layer(
            // Tracing
            TraceLayer::new_for_http(),
        )
}
