//! Product category trees and category assignment.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use content_api_core::terms::PRODUCT_CAT;
use content_api_core::{
    build_tree, CategoryNode, HierarchyError, ObjectId, Term, TermId, TermLookup, TermOrder,
    TermQuery, TermStore,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{
    map_store_error, resolve_product, ApiError, ApiResponse, AppState, ProductIdentifier,
    ProductIdentifierQuery,
};

#[derive(Debug, Serialize)]
pub(super) struct ProductCategories {
    product_id: ObjectId,
    categories: Vec<CategoryNode>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct UpdateProductCategoriesRequest {
    #[serde(flatten)]
    pub identifier: ProductIdentifier,
    #[serde(default)]
    pub categories: Vec<TermId>,
}

#[derive(Debug, Serialize)]
pub(super) struct AssignedCategories {
    product_id: ObjectId,
    assigned_category_ids: Vec<TermId>,
}

fn tree(rid: &str, terms: &[Term]) -> Result<Vec<CategoryNode>, ApiError> {
    build_tree(terms).map_err(|e: HierarchyError| {
        tracing::error!(error = %e, "category tree cannot be built");
        ApiError::new(rid, "cyclic_hierarchy", e.to_string())
    })
}

/// GET /content-api/v1/product-categories: every product category, nested,
/// siblings ordered by name.
pub(super) async fn list_product_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CategoryNode>>>, ApiError> {
    let rid = &req_id.0;
    let terms = state
        .store
        .lock()
        .await
        .list_terms(
            PRODUCT_CAT,
            TermQuery {
                order: TermOrder::Name,
                limit: None,
            },
        )
        .map_err(|e| map_store_error(rid, &e))?;

    let categories = tree(rid, &terms)?;
    Ok(Json(ApiResponse::new(req_id.0, categories)))
}

/// GET /content-api/v1/product/categories: the categories assigned to one
/// product. Assigned terms whose parent is not assigned become roots.
pub(super) async fn get_product_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductIdentifierQuery>,
) -> Result<Json<ApiResponse<ProductCategories>>, ApiError> {
    let rid = &req_id.0;
    let (product_id, terms) = {
        let store = state.store.lock().await;
        let product = resolve_product(&*store, rid, &query.into())?;
        (product.id, store.object_terms(product.id, PRODUCT_CAT))
    };

    let categories = tree(rid, &terms)?;
    Ok(Json(ApiResponse::new(
        req_id.0,
        ProductCategories {
            product_id,
            categories,
        },
    )))
}

/// PATCH /content-api/v1/product/categories: add categories to a product.
///
/// Every requested id must be an existing product category. Current
/// assignments are kept first, new ids follow in request order.
pub(super) async fn update_product_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UpdateProductCategoriesRequest>,
) -> Result<Json<ApiResponse<AssignedCategories>>, ApiError> {
    let rid = &req_id.0;
    let mut store = state.store.lock().await;
    let product = resolve_product(&*store, rid, &body.identifier)?;

    if body.categories.is_empty() {
        return Err(ApiError::new(rid, "invalid_input", "Categories empty"));
    }
    if let Some(missing) = body
        .categories
        .iter()
        .find(|id| store.get_term(PRODUCT_CAT, TermLookup::Id(**id)).is_none())
    {
        return Err(ApiError::new(
            rid,
            "category_not_found",
            format!("Category ID {missing} does not exist"),
        ));
    }

    let mut merged: Vec<TermId> = store
        .object_terms(product.id, PRODUCT_CAT)
        .into_iter()
        .map(|t| t.id)
        .collect();
    merged.extend(body.categories.iter().copied());

    let assigned = store
        .set_object_terms(product.id, PRODUCT_CAT, &merged, false)
        .map_err(|e| map_store_error(rid, &e))?;
    drop(store);

    tracing::info!(
        product_id = product.id,
        categories = assigned.len(),
        "product categories updated"
    );
    Ok(Json(ApiResponse::new(
        req_id.0,
        AssignedCategories {
            product_id: product.id,
            assigned_category_ids: assigned,
        },
    )))
}
