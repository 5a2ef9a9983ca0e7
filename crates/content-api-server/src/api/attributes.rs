//! Product attribute listing and the attribute update endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use content_api_core::{
    reconcile, AttributeAssignment, AttributeError, AttributeOptions, ObjectId, Product,
    ProductAttribute, ProductStore, ReconcileOptions, TermLookup, TermStore,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::middleware::RequestId;

use super::{
    fetch_product, map_store_error, resolve_product, ApiError, ApiResponse, AppState, IdParam,
    ProductIdentifierQuery,
};

#[derive(Debug, Clone, Serialize)]
pub(super) struct AttributeItem {
    name: String,
    value: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct ProductAttributesItem {
    id: ObjectId,
    name: String,
    attributes: Vec<AttributeItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductAttributeMap {
    id: ObjectId,
    name: String,
    attributes: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct UpdateAttributesRequest {
    pub id: Option<IdParam>,
    pub attributes: Option<Vec<AttributeAssignment>>,
    /// Overrides `CONTENT_API_ALLOW_ATTRIBUTE_CREATION` for this request.
    pub create_taxonomy: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(super) struct UpdatedAttributes {
    product_id: ObjectId,
    message: &'static str,
}

struct CachedListing {
    stored_at: Instant,
    items: Vec<ProductAttributesItem>,
}

/// TTL cache for the attributes listing. Attribute writes invalidate it.
#[derive(Clone)]
pub struct AttributesCache {
    ttl: Duration,
    entry: Arc<Mutex<Option<CachedListing>>>,
}

impl AttributesCache {
    pub(super) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Arc::new(Mutex::new(None)),
        }
    }

    async fn get(&self) -> Option<Vec<ProductAttributesItem>> {
        let entry = self.entry.lock().await;
        entry
            .as_ref()
            .filter(|cached| cached.stored_at.elapsed() < self.ttl)
            .map(|cached| cached.items.clone())
    }

    async fn put(&self, items: Vec<ProductAttributesItem>) {
        *self.entry.lock().await = Some(CachedListing {
            stored_at: Instant::now(),
            items,
        });
    }

    pub(super) async fn invalidate(&self) {
        *self.entry.lock().await = None;
    }
}

/// Option labels: term names for taxonomy attributes, the stored strings
/// for free-text ones. Term ids that no longer resolve are dropped.
fn option_labels<S>(store: &S, attribute: &ProductAttribute) -> Vec<String>
where
    S: TermStore + ?Sized,
{
    match &attribute.options {
        AttributeOptions::Terms(ids) => ids
            .iter()
            .filter_map(|id| store.get_term(&attribute.name, TermLookup::Id(*id)))
            .map(|term| term.name)
            .collect(),
        AttributeOptions::Text(values) => values.clone(),
    }
}

fn attributes_item<S>(store: &S, product: &Product) -> ProductAttributesItem
where
    S: TermStore + ?Sized,
{
    ProductAttributesItem {
        id: product.id,
        name: product.name.clone(),
        attributes: product
            .attributes
            .iter()
            .map(|attribute| AttributeItem {
                name: attribute.name.clone(),
                value: option_labels(store, attribute),
            })
            .collect(),
    }
}

/// GET /content-api/v1/attributes: every product with its attributes.
pub(super) async fn list_attributes(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<ProductAttributesItem>>>, ApiError> {
    if let Some(items) = state.attributes_cache.get().await {
        tracing::debug!(products = items.len(), "attributes listing served from cache");
        return Ok(Json(ApiResponse::new(req_id.0, items)));
    }

    let items: Vec<ProductAttributesItem> = {
        let store = state.store.lock().await;
        store
            .list_products()
            .iter()
            .map(|product| attributes_item(&*store, product))
            .collect()
    };
    if items.is_empty() {
        return Err(ApiError::new(req_id.0, "no_products", "No products found."));
    }

    state.attributes_cache.put(items.clone()).await;
    Ok(Json(ApiResponse::new(req_id.0, items)))
}

/// GET /content-api/v1/product/attributes: one product's attributes keyed by
/// attribute name.
pub(super) async fn get_product_attributes(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductIdentifierQuery>,
) -> Result<Json<ApiResponse<ProductAttributeMap>>, ApiError> {
    let rid = &req_id.0;
    let data = {
        let store = state.store.lock().await;
        let product = resolve_product(&*store, rid, &query.into())?;
        let attributes = product
            .attributes
            .iter()
            .map(|attribute| (attribute.name.clone(), option_labels(&*store, attribute)))
            .collect();
        ProductAttributeMap {
            id: product.id,
            name: product.name,
            attributes,
        }
    };
    Ok(Json(ApiResponse::new(req_id.0, data)))
}

fn map_attribute_error(rid: &str, error: &AttributeError) -> ApiError {
    let code = match error {
        AttributeError::InvalidAttribute { .. } => "invalid_attribute",
        AttributeError::AttributeDoesNotExist { .. } => "attribute_does_not_exist",
        AttributeError::TaxonomyCreation { .. } => {
            tracing::error!(error = %error, "attribute taxonomy creation failed");
            "attribute_creation_failed"
        }
    };
    ApiError::new(rid, code, error.to_string())
}

/// PATCH|PUT /content-api/v1/attributes: reconcile the requested attributes
/// onto product `id`.
///
/// The product is only saved when every row reconciles. Terms and
/// taxonomies created before a failing row are kept.
pub(super) async fn update_attributes(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UpdateAttributesRequest>,
) -> Result<Json<ApiResponse<UpdatedAttributes>>, ApiError> {
    let rid = &req_id.0;
    let invalid_product = || ApiError::new(rid, "invalid_product", "Invalid product ID");

    let product_id = body
        .id
        .as_ref()
        .and_then(IdParam::parse)
        .filter(|id| *id != 0)
        .ok_or_else(invalid_product)?;

    let mut store = state.store.lock().await;
    let mut product = fetch_product(&*store, rid, product_id).map_err(|_| invalid_product())?;

    let requested = body
        .attributes
        .as_deref()
        .filter(|rows| !rows.is_empty())
        .ok_or_else(|| ApiError::new(rid, "no_attributes", "Invalid attributes formatting"))?;

    let options = ReconcileOptions {
        allow_create_taxonomy: body
            .create_taxonomy
            .unwrap_or(state.config.allow_attribute_creation),
    };
    reconcile(requested, &mut product.attributes, options, &mut *store)
        .map_err(|e| map_attribute_error(rid, &e))?;

    store
        .save_product(product)
        .map_err(|e| map_store_error(rid, &e))?;
    drop(store);

    state.attributes_cache.invalidate().await;
    tracing::info!(product_id, rows = requested.len(), "product attributes updated");

    Ok(Json(ApiResponse::new(
        req_id.0,
        UpdatedAttributes {
            product_id,
            message: "Product attributes updated successfully.",
        },
    )))
}
