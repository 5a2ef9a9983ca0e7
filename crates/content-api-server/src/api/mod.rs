mod attributes;
mod brands;
mod categories;
mod media;
mod posts;
mod products;
mod terms;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use content_api_core::sanitize::is_valid_sku;
use content_api_core::{AppConfig, ObjectId, Product, ProductLookup, ProductStore, StoreError};
use content_api_media::Sideloader;
use content_api_store::{ContentStore, StoreCounts};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

use attributes::AttributesCache;

const API_PREFIX: &str = "/content-api/v1";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<ContentStore>>,
    pub sideloader: Arc<Sideloader>,
    pub config: Arc<AppConfig>,
    pub attributes_cache: AttributesCache,
}

impl AppState {
    #[must_use]
    pub fn new(store: ContentStore, sideloader: Sideloader, config: Arc<AppConfig>) -> Self {
        let ttl = Duration::from_secs(config.attributes_cache_ttl_secs);
        Self {
            store: Arc::new(Mutex::new(store)),
            sideloader: Arc::new(sideloader),
            config,
            attributes_cache: AttributesCache::new(ttl),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    store: StoreCounts,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

fn status_for(code: &str) -> StatusCode {
    match code {
        "unauthorized" => StatusCode::UNAUTHORIZED,
        "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
        "not_found" | "product_not_found" | "category_not_found" | "term_not_found"
        | "terms_not_found" | "no_products" => StatusCode::NOT_FOUND,
        "bad_request"
        | "validation_error"
        | "data_missing"
        | "missing_identifier"
        | "conflicting_identifiers"
        | "product_id_invalid"
        | "sku_invalid"
        | "slug_invalid"
        | "slug_exists"
        | "invalid_input"
        | "taxonomy_missing"
        | "taxonomy_invalid"
        | "invalid_term_id"
        | "term_name_missing"
        | "no_description"
        | "invalid_product"
        | "no_attributes"
        | "invalid_attribute"
        | "attribute_does_not_exist"
        | "invalid_product_id"
        | "invalid_brands"
        | "no_valid_terms" => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = status_for(&self.error.code);
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_store_error(request_id: &str, error: &StoreError) -> ApiError {
    tracing::error!(error = %error, "store operation failed");
    ApiError::new(request_id, "internal_error", error.to_string())
}

/// A product id as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(super) enum IdParam {
    Number(u64),
    Text(String),
}

impl IdParam {
    pub(super) fn parse(&self) -> Option<u64> {
        match self {
            IdParam::Number(id) => Some(*id),
            IdParam::Text(raw) => raw.trim().parse().ok(),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            IdParam::Number(id) => *id == 0,
            IdParam::Text(raw) => {
                let raw = raw.trim();
                raw.is_empty() || raw == "0"
            }
        }
    }
}

impl std::fmt::Display for IdParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdParam::Number(id) => write!(f, "{id}"),
            IdParam::Text(raw) => f.write_str(raw),
        }
    }
}

/// `product_id` xor `sku`, from a JSON body.
#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct ProductIdentifier {
    pub product_id: Option<IdParam>,
    pub sku: Option<String>,
}

/// `product_id` xor `sku`, from a query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct ProductIdentifierQuery {
    pub product_id: Option<String>,
    pub sku: Option<String>,
}

impl From<ProductIdentifierQuery> for ProductIdentifier {
    fn from(query: ProductIdentifierQuery) -> Self {
        Self {
            product_id: query.product_id.map(IdParam::Text),
            sku: query.sku,
        }
    }
}

/// Look up the product a request refers to.
///
/// Checks run in this order: neither identifier, malformed id, invalid SKU,
/// both identifiers, then the lookup itself.
pub(super) fn resolve_product<S>(
    store: &S,
    request_id: &str,
    identifier: &ProductIdentifier,
) -> Result<Product, ApiError>
where
    S: ProductStore + ?Sized,
{
    let product_id = identifier.product_id.as_ref().filter(|id| !id.is_blank());
    let sku = identifier.sku.as_deref().filter(|sku| !sku.is_empty());
    let missing =
        || ApiError::new(request_id, "missing_identifier", "Product ID or SKU is required");

    if product_id.is_none() && sku.is_none() {
        return Err(missing());
    }

    let product_id = match product_id {
        Some(raw) => Some(raw.parse().ok_or_else(|| {
            ApiError::new(request_id, "product_id_invalid", "Product ID is invalid")
        })?),
        None => None,
    };

    if sku.is_some_and(|sku| !is_valid_sku(sku)) {
        return Err(ApiError::new(request_id, "sku_invalid", "SKU is invalid"));
    }

    match (product_id, sku) {
        (Some(_), Some(_)) => Err(ApiError::new(
            request_id,
            "conflicting_identifiers",
            "Both Product ID and SKU are provided. Please provide only one.",
        )),
        (None, Some(sku)) => store.get_product(ProductLookup::Sku(sku)).ok_or_else(|| {
            ApiError::new(
                request_id,
                "product_not_found",
                "Product not found with provided SKU",
            )
        }),
        (Some(id), None) => fetch_product(store, request_id, id),
        (None, None) => Err(missing()),
    }
}

pub(super) fn fetch_product<S>(store: &S, request_id: &str, id: ObjectId) -> Result<Product, ApiError>
where
    S: ProductStore + ?Sized,
{
    store
        .get_product(ProductLookup::Id(id))
        .ok_or_else(|| ApiError::new(request_id, "product_not_found", "Product not found"))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    let routes = Router::new()
        .route("/post", post(posts::create_post))
        .route(
            "/product",
            get(products::get_product).patch(products::update_product),
        )
        .route(
            "/product-categories",
            get(categories::list_product_categories),
        )
        .route(
            "/product/categories",
            get(categories::get_product_categories).patch(categories::update_product_categories),
        )
        .route(
            "/terms",
            get(terms::list_terms)
                .patch(terms::update_term)
                .put(terms::update_term),
        )
        .route(
            "/attributes",
            get(attributes::list_attributes)
                .patch(attributes::update_attributes)
                .put(attributes::update_attributes),
        )
        .route(
            "/product/attributes",
            get(attributes::get_product_attributes),
        )
        .route(
            "/product/brands",
            get(brands::list_brands).patch(brands::update_product_brands),
        );

    Router::new().nest(API_PREFIX, routes).layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                rate_limit,
                enforce_rate_limit,
            ))
            .layer(axum::middleware::from_fn_with_state(
                auth,
                require_bearer_auth,
            )),
    )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route(&format!("{API_PREFIX}/health"), get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let counts = state.store.lock().await.counts();
    (
        StatusCode::OK,
        Json(ApiResponse::new(
            req_id.0,
            HealthData {
                status: "ok",
                store: counts,
            },
        )),
    )
}

pub fn rate_limit_state(config: &AppConfig) -> RateLimitState {
    RateLimitState::new(
        config.rate_limit_max_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    )
}

#[cfg(test)]
pub(crate) fn test_config(token: Option<&str>) -> AppConfig {
    AppConfig {
        env: content_api_core::Environment::Development,
        bind_addr: ([127, 0, 0, 1], 0).into(),
        log_level: "debug".to_string(),
        api_token: token.map(str::to_string),
        site_url: "https://shop.example.com".to_string(),
        uploads_url: "https://shop.example.com/uploads".to_string(),
        uploads_dir: std::path::PathBuf::from("./uploads"),
        seed_path: None,
        media_timeout_secs: 5,
        media_user_agent: "content-api-test/0.1".to_string(),
        media_max_retries: 0,
        media_backoff_base_ms: 1,
        media_max_bytes: 1024 * 1024,
        allow_attribute_creation: false,
        attributes_cache_ttl_secs: 86_400,
        rate_limit_max_requests: 1_000,
        rate_limit_window_secs: 60,
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
