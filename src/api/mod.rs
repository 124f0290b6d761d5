//! HTTP surface: routes, shared state and middleware.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{self, TraceLayer};
use tracing::warn;

use crate::classifier::EmailClassifier;
use crate::config::ServerConfig;
use crate::reply::ResponseGenerator;

pub use error::ApiError;
pub use routes::{ClassifyResponse, TextRequest};

/// Application state shared across handlers.
///
/// Built once at startup; the classifier and generator hold only read-only
/// configuration, so no locking is needed.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<EmailClassifier>,
    pub generator: Arc<ResponseGenerator>,
}

impl AppState {
    pub fn new(classifier: EmailClassifier, generator: ResponseGenerator) -> Self {
        Self {
            classifier: Arc::new(classifier),
            generator: Arc::new(generator),
        }
    }
}

/// Build the Axum router with classification routes and middleware.
pub fn api_routes(state: AppState, server: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/health", get(routes::health))
        .route("/api/classify", post(routes::classify_email))
        .route("/api/classify/text", post(routes::classify_text))
        .with_state(state);

    // Unknown paths fall through to the frontend when one is configured.
    // Paths with no file behind them get the index page with a 200.
    let router = match &server.static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router.fallback(routes::not_found),
    };

    router
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace::DefaultMakeSpan::new())
                        .on_request(trace::DefaultOnRequest::new().level(tracing::Level::DEBUG))
                        .on_response(
                            trace::DefaultOnResponse::new().level(tracing::Level::DEBUG),
                        ),
                )
                .layer(cors_layer(&server.cors_origins)),
        )
}

/// CORS restricted to the configured origins. `*` allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
}
