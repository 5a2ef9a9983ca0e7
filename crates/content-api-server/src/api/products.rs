//! `GET` and `PATCH /content-api/v1/product`.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use content_api_core::sanitize::{kses_post, sanitize_text_field, sanitize_title};
use content_api_core::terms::PRODUCT_TAG;
use content_api_core::{
    maybe_create_term, MediaStore, ObjectId, Product, ProductLookup, ProductStore, SeoMeta,
    StockStatus, StoreError, TermStore,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::media::{attach_image, attach_images};
use super::{
    fetch_product, map_store_error, resolve_product, ApiError, ApiResponse, AppState,
    ProductIdentifier, ProductIdentifierQuery,
};

const DEFAULT_MISSING_DESCRIPTION_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub(super) struct ProductQuery {
    pub product_id: Option<String>,
    pub sku: Option<String>,
    #[serde(default)]
    pub missing_description: bool,
    pub missing_description_limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductItem {
    product_id: ObjectId,
    name: String,
    slug: String,
    description: String,
    short_description: String,
    price: Option<Decimal>,
    sale_price: Option<Decimal>,
    sku: String,
    stock_status: StockStatus,
    stock_quantity: Option<i64>,
    tags: Vec<String>,
    images: Vec<String>,
    featured_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct MissingDescriptionItem {
    product_id: ObjectId,
    sku: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum ProductData {
    Product(Box<ProductItem>),
    MissingDescriptions(Vec<MissingDescriptionItem>),
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct UpdateProductRequest {
    #[serde(flatten)]
    pub identifier: ProductIdentifier,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub stock_status: Option<String>,
    pub stock_quantity: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<String>,
    pub images: Option<Vec<String>>,
    pub yoast: Option<SeoMeta>,
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateProductResponse {
    product_id: ObjectId,
    message: &'static str,
}

fn product_item<S>(store: &S, product: Product) -> ProductItem
where
    S: TermStore + MediaStore + ?Sized,
{
    let media_url = |id: ObjectId| store.media(id).map(|m| m.url);
    ProductItem {
        tags: store
            .object_terms(product.id, PRODUCT_TAG)
            .into_iter()
            .map(|t| t.name)
            .collect(),
        images: product
            .gallery_image_ids
            .iter()
            .filter_map(|id| media_url(*id))
            .collect(),
        featured_image: product.image_id.and_then(media_url),
        product_id: product.id,
        name: product.name,
        slug: product.slug,
        description: product.description,
        short_description: product.short_description,
        price: product.regular_price,
        sale_price: product.sale_price,
        sku: product.sku,
        stock_status: product.stock_status,
        stock_quantity: product.stock_quantity,
    }
}

/// GET /content-api/v1/product: one product by id or SKU, or the products
/// that still lack a description.
pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ApiResponse<ProductData>>, ApiError> {
    let rid = &req_id.0;
    let store = state.store.lock().await;

    let data = if query.missing_description {
        let limit = query
            .missing_description_limit
            .unwrap_or(DEFAULT_MISSING_DESCRIPTION_LIMIT);
        let items: Vec<MissingDescriptionItem> = store
            .products_missing_description(limit)
            .into_iter()
            .filter_map(|id| store.get_product(ProductLookup::Id(id)))
            .filter(|product| !product.sku.is_empty())
            .map(|product| MissingDescriptionItem {
                product_id: product.id,
                sku: product.sku,
            })
            .collect();
        if items.is_empty() {
            return Err(ApiError::new(
                rid,
                "no_products",
                "No products missing descriptions",
            ));
        }
        ProductData::MissingDescriptions(items)
    } else {
        let identifier = ProductIdentifier::from(ProductIdentifierQuery {
            product_id: query.product_id,
            sku: query.sku,
        });
        let product = resolve_product(&*store, rid, &identifier)?;
        ProductData::Product(Box::new(product_item(&*store, product)))
    };
    drop(store);

    Ok(Json(ApiResponse::new(req_id.0, data)))
}

/// Check a requested slug; `Ok(None)` when no slug was requested.
fn checked_slug<S>(
    store: &S,
    rid: &str,
    product_id: ObjectId,
    requested: Option<&str>,
) -> Result<Option<String>, ApiError>
where
    S: ProductStore + ?Sized,
{
    let Some(requested) = requested else {
        return Ok(None);
    };
    let slug = sanitize_title(requested);
    if slug.is_empty() {
        return Err(ApiError::new(rid, "slug_invalid", "Invalid slug format"));
    }
    if store
        .slug_owner(&slug)
        .is_some_and(|owner| owner != product_id)
    {
        return Err(ApiError::new(
            rid,
            "slug_exists",
            "Slug already in use by another product",
        ));
    }
    Ok(Some(slug))
}

fn parse_stock_status(rid: &str, raw: Option<&str>) -> Result<Option<StockStatus>, ApiError> {
    raw.map(|raw| {
        sanitize_text_field(raw)
            .parse::<StockStatus>()
            .map_err(|message| ApiError::new(rid, "validation_error", message))
    })
    .transpose()
}

fn non_empty(value: Option<&str>, sanitize: fn(&str) -> String) -> Option<String> {
    value.map(sanitize).filter(|v| !v.trim().is_empty())
}

/// PATCH /content-api/v1/product: sparse update. Fields left out of the
/// body keep their current value; the SKU only identifies the product.
pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<UpdateProductResponse>>, ApiError> {
    let rid = &req_id.0;

    let product_id = {
        let store = state.store.lock().await;
        let product = resolve_product(&*store, rid, &body.identifier)?;
        checked_slug(&*store, rid, product.id, body.slug.as_deref())?;
        product.id
    };
    let stock_status = parse_stock_status(rid, body.stock_status.as_deref())?;

    let featured = match body.featured_image.as_deref() {
        Some(url) => attach_image(&state, url, Some(product_id))
            .await
            .and_then(|attachment| attachment.id),
        None => None,
    };
    let gallery = match body.images.as_deref() {
        Some(urls) => Some(
            attach_images(&state, urls, Some(product_id))
                .await
                .into_iter()
                .filter_map(|attachment| attachment.id)
                .collect::<Vec<_>>(),
        ),
        None => None,
    };

    let mut store = state.store.lock().await;
    let mut product = fetch_product(&*store, rid, product_id)?;
    let slug = checked_slug(&*store, rid, product_id, body.slug.as_deref())?;

    if let Some(name) = non_empty(body.name.as_deref(), sanitize_text_field) {
        product.name = name;
    }
    if let Some(slug) = slug {
        product.slug = slug;
    }
    if let Some(description) = non_empty(body.description.as_deref(), kses_post) {
        product.description = description;
    }
    if let Some(short) = non_empty(body.short_description.as_deref(), kses_post) {
        product.short_description = short;
    }
    if let Some(price) = body.price {
        product.regular_price = Some(price);
    }
    if let Some(sale_price) = body.sale_price {
        product.sale_price = Some(sale_price);
    }
    if let Some(status) = stock_status {
        product.stock_status = status;
    }
    if let Some(quantity) = body.stock_quantity {
        product.stock_quantity = Some(quantity);
    }
    if featured.is_some() {
        product.image_id = featured;
    }
    if let Some(gallery) = gallery {
        product.gallery_image_ids = gallery;
    }
    if let Some(yoast) = &body.yoast {
        yoast.apply_to(&mut product.meta);
    }

    store.save_product(product).map_err(|e| match e {
        StoreError::ObjectNotFound(_) => {
            ApiError::new(rid, "product_not_found", "Product not found")
        }
        other => map_store_error(rid, &other),
    })?;

    if let Some(tags) = &body.tags {
        let ids: Vec<_> = tags
            .iter()
            .map(|t| sanitize_text_field(t))
            .filter(|t| !t.is_empty())
            .filter_map(|name| maybe_create_term(&mut *store, PRODUCT_TAG, &name))
            .collect();
        if !ids.is_empty() {
            store
                .set_object_terms(product_id, PRODUCT_TAG, &ids, false)
                .map_err(|e| map_store_error(rid, &e))?;
        }
    }
    drop(store);

    state.attributes_cache.invalidate().await;
    tracing::info!(product_id, "product updated");

    Ok(Json(ApiResponse::new(
        req_id.0,
        UpdateProductResponse {
            product_id,
            message: "Product updated successfully",
        },
    )))
}
