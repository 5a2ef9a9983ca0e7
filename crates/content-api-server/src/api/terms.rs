//! Category and brand term listing and editing.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use content_api_core::sanitize::{kses_post, sanitize_text_field};
use content_api_core::terms::{relative_link, term_link, BRAND, PRODUCT_CAT};
use content_api_core::{StoreError, TermId, TermQuery, TermStore, TermUpdate};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, IdParam};

const EDITABLE_TAXONOMIES: [&str; 2] = [PRODUCT_CAT, BRAND];

#[derive(Debug, Default, Deserialize)]
pub(super) struct TermsQuery {
    pub taxonomy: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct TermItem {
    id: TermId,
    name: String,
    slug: String,
    link: String,
    relative_link: String,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct UpdateTermRequest {
    pub taxonomy: Option<String>,
    pub id: Option<IdParam>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct UpdatedTerm {
    term_id: TermId,
}

fn checked_taxonomy(rid: &str, raw: Option<&str>) -> Result<String, ApiError> {
    let taxonomy = raw.map(sanitize_text_field).unwrap_or_default();
    if taxonomy.is_empty() {
        return Err(ApiError::new(rid, "taxonomy_missing", "Missing taxonomy"));
    }
    if !EDITABLE_TAXONOMIES.contains(&taxonomy.as_str()) {
        return Err(ApiError::new(
            rid,
            "taxonomy_invalid",
            "Only product_cat and brand taxonomies are supported currently.",
        ));
    }
    Ok(taxonomy)
}

/// GET /content-api/v1/terms?taxonomy=product_cat|brand
pub(super) async fn list_terms(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<TermsQuery>,
) -> Result<Json<ApiResponse<Vec<TermItem>>>, ApiError> {
    let rid = &req_id.0;
    let taxonomy = checked_taxonomy(rid, query.taxonomy.as_deref())?;

    let terms = state
        .store
        .lock()
        .await
        .list_terms(&taxonomy, TermQuery::default())
        .map_err(|e| map_store_error(rid, &e))?;
    if terms.is_empty() {
        return Err(ApiError::new(
            rid,
            "terms_not_found",
            format!("No terms were found in {taxonomy} taxonomy."),
        ));
    }

    let site_url = &state.config.site_url;
    let items = terms
        .into_iter()
        .map(|term| {
            let link = term_link(site_url, &term);
            TermItem {
                id: term.id,
                relative_link: relative_link(&link),
                link,
                name: term.name,
                slug: term.slug,
            }
        })
        .collect();

    Ok(Json(ApiResponse::new(req_id.0, items)))
}

/// PATCH|PUT /content-api/v1/terms: rename a term and replace its
/// description. Both are required.
pub(super) async fn update_term(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UpdateTermRequest>,
) -> Result<Json<ApiResponse<UpdatedTerm>>, ApiError> {
    let rid = &req_id.0;
    let taxonomy = checked_taxonomy(rid, body.taxonomy.as_deref())?;

    let term_id = body
        .id
        .as_ref()
        .and_then(IdParam::parse)
        .ok_or_else(|| ApiError::new(rid, "invalid_term_id", "Invalid term id"))?;

    let name = body
        .name
        .as_deref()
        .map(sanitize_text_field)
        .unwrap_or_default();
    if name.is_empty() {
        return Err(ApiError::new(rid, "term_name_missing", "Missing term name"));
    }

    let description = body.description.as_deref().map(kses_post).unwrap_or_default();
    if description.trim().is_empty() {
        return Err(ApiError::new(
            rid,
            "no_description",
            "No description was provided",
        ));
    }

    let updated = state
        .store
        .lock()
        .await
        .update_term(
            &taxonomy,
            term_id,
            TermUpdate {
                name: Some(name),
                description: Some(description),
            },
        )
        .map_err(|e| match e {
            StoreError::TermNotFound { .. } => ApiError::new(
                rid,
                "term_not_found",
                "The term id or taxonomy was incorrect",
            ),
            other => map_store_error(rid, &other),
        })?;

    tracing::info!(taxonomy = %taxonomy, term_id = updated.id, "term updated");
    Ok(Json(ApiResponse::new(
        req_id.0,
        UpdatedTerm {
            term_id: updated.id,
        },
    )))
}
