//! Brand terms and product brand assignment.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use content_api_core::sanitize::sanitize_text_field;
use content_api_core::terms::PRODUCT_BRAND;
use content_api_core::{
    resolve_term_reference, ObjectId, StoreError, TaxonomyRegistry, TermId, TermQuery, TermStore,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{fetch_product, map_store_error, ApiError, ApiResponse, AppState, IdParam};

#[derive(Debug, Default, Deserialize)]
pub(super) struct BrandsQuery {
    pub taxonomy: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct BrandItem {
    id: TermId,
    name: String,
    slug: String,
    count: u64,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct UpdateProductBrandsRequest {
    pub product_id: Option<IdParam>,
    #[serde(default)]
    pub brands: Vec<IdParam>,
    pub taxonomy: Option<String>,
    /// Add to the current brands instead of replacing them.
    #[serde(default)]
    pub append: bool,
    /// Create brands that match neither a slug nor a name.
    #[serde(default)]
    pub create_brand: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct AssignedBrands {
    product_id: ObjectId,
    brand_ids: Vec<TermId>,
    message: &'static str,
}

fn brand_taxonomy(raw: Option<&str>) -> String {
    raw.map(sanitize_text_field)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| PRODUCT_BRAND.to_string())
}

fn unknown_taxonomy(rid: &str, error: &StoreError) -> ApiError {
    match error {
        StoreError::UnknownTaxonomy(taxonomy) => ApiError::new(
            rid,
            "taxonomy_invalid",
            format!("Unknown taxonomy '{taxonomy}'"),
        ),
        other => map_store_error(rid, other),
    }
}

/// GET /content-api/v1/product/brands?taxonomy=&limit=
///
/// `limit=0` or no limit returns every brand.
pub(super) async fn list_brands(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<BrandsQuery>,
) -> Result<Json<ApiResponse<Vec<BrandItem>>>, ApiError> {
    let rid = &req_id.0;
    let taxonomy = brand_taxonomy(query.taxonomy.as_deref());

    let terms = state
        .store
        .lock()
        .await
        .list_terms(
            &taxonomy,
            TermQuery {
                limit: query.limit.filter(|limit| *limit > 0),
                ..TermQuery::default()
            },
        )
        .map_err(|e| unknown_taxonomy(rid, &e))?;

    let items = terms
        .into_iter()
        .map(|term| BrandItem {
            id: term.id,
            name: term.name,
            slug: term.slug,
            count: term.count,
        })
        .collect();
    Ok(Json(ApiResponse::new(req_id.0, items)))
}

/// PATCH /content-api/v1/product/brands: resolve brand references (ids,
/// slugs or names) and assign them to a product.
pub(super) async fn update_product_brands(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UpdateProductBrandsRequest>,
) -> Result<Json<ApiResponse<AssignedBrands>>, ApiError> {
    let rid = &req_id.0;

    let product_id = body
        .product_id
        .as_ref()
        .and_then(IdParam::parse)
        .filter(|id| *id != 0)
        .ok_or_else(|| ApiError::new(rid, "invalid_product_id", "Valid Product ID is required"))?;

    let references: Vec<String> = body
        .brands
        .iter()
        .map(|brand| sanitize_text_field(&brand.to_string()))
        .filter(|brand| !brand.is_empty())
        .collect();
    if references.is_empty() {
        return Err(ApiError::new(
            rid,
            "invalid_brands",
            "Brands must be a non-empty array",
        ));
    }

    let taxonomy = brand_taxonomy(body.taxonomy.as_deref());
    let mut store = state.store.lock().await;
    fetch_product(&*store, rid, product_id)?;
    if !store.taxonomy_exists(&taxonomy) {
        return Err(unknown_taxonomy(
            rid,
            &StoreError::UnknownTaxonomy(taxonomy.clone()),
        ));
    }

    let term_ids: Vec<TermId> = references
        .iter()
        .filter_map(|reference| {
            resolve_term_reference(&mut *store, &taxonomy, reference, body.create_brand)
        })
        .collect();
    if term_ids.is_empty() {
        return Err(ApiError::new(
            rid,
            "no_valid_terms",
            "No valid brand terms found or created",
        ));
    }

    let assigned = store
        .set_object_terms(product_id, &taxonomy, &term_ids, body.append)
        .map_err(|e| unknown_taxonomy(rid, &e))?;
    drop(store);

    tracing::info!(
        product_id,
        taxonomy = %taxonomy,
        brands = assigned.len(),
        append = body.append,
        "product brands updated"
    );
    Ok(Json(ApiResponse::new(
        req_id.0,
        AssignedBrands {
            product_id,
            brand_ids: assigned,
            message: "Product brands updated successfully",
        },
    )))
}
