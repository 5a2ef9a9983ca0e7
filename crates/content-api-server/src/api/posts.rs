//! `POST /content-api/v1/post`: create a draft post with sideloaded images.

use axum::{extract::State, http::StatusCode, Extension, Json};
use content_api_core::posts::PAGE_POST_TYPE;
use content_api_core::sanitize::{kses_post, sanitize_text_field};
use content_api_core::terms::{CATEGORY, POST_TAG};
use content_api_core::{
    maybe_create_term, replace_image_variables, NewPost, ObjectId, PostStore, SeoMeta, TermStore,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::media::{attach_image, attach_images};
use super::{map_store_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct CreatePostRequest {
    pub title: Option<String>,
    pub post_type: Option<String>,
    pub content: Option<String>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub yoast: Option<SeoMeta>,
    #[serde(default)]
    pub images: Vec<String>,
    pub featured_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CreatePostResponse {
    pub post_id: ObjectId,
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Required fields that are absent or empty, in a fixed order. Pages do not
/// need categories.
fn missing_fields(body: &CreatePostRequest) -> Vec<&'static str> {
    let is_page = body.post_type.as_deref() == Some(PAGE_POST_TYPE);
    let mut missing = Vec::new();
    if is_blank(body.title.as_deref()) {
        missing.push("title");
    }
    if is_blank(body.post_type.as_deref()) {
        missing.push("post_type");
    }
    if is_blank(body.content.as_deref()) {
        missing.push("content");
    }
    if !is_page && body.categories.as_ref().is_none_or(Vec::is_empty) {
        missing.push("categories");
    }
    if body.tags.as_ref().is_none_or(Vec::is_empty) {
        missing.push("tags");
    }
    if body.yoast.as_ref().is_none_or(SeoMeta::is_empty) {
        missing.push("yoast");
    }
    missing
}

fn sanitized_names(values: Option<&Vec<String>>) -> Vec<String> {
    values
        .into_iter()
        .flatten()
        .map(|v| sanitize_text_field(v))
        .filter(|v| !v.is_empty())
        .collect()
}

pub(super) async fn create_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatePostResponse>>), ApiError> {
    let rid = &req_id.0;

    let missing = missing_fields(&body);
    if !missing.is_empty() {
        return Err(ApiError::new(
            rid,
            "data_missing",
            format!("Missing parameters: {}", missing.join(", ")),
        ));
    }

    let title = sanitize_text_field(body.title.as_deref().unwrap_or_default());
    let content = kses_post(body.content.as_deref().unwrap_or_default());
    let post_type = sanitize_text_field(body.post_type.as_deref().unwrap_or_default());
    let categories = sanitized_names(body.categories.as_ref());
    let tags = sanitized_names(body.tags.as_ref());

    let post_id = state
        .store
        .lock()
        .await
        .insert_post(NewPost::draft(title, content.clone(), post_type.clone()))
        .map_err(|e| map_store_error(rid, &e))?;

    let image_urls: Vec<String> = attach_images(&state, &body.images, Some(post_id))
        .await
        .into_iter()
        .map(|attachment| attachment.url)
        .collect();
    let featured = match body.featured_image.as_deref() {
        Some(url) => attach_image(&state, url, Some(post_id))
            .await
            .and_then(|attachment| attachment.id),
        None => None,
    };

    let mut store = state.store.lock().await;
    let mut post = store.get_post(post_id).ok_or_else(|| {
        ApiError::new(rid, "post_creation_failed", "Failed to create post")
    })?;
    post.content = replace_image_variables(&content, &image_urls);
    if featured.is_some() {
        post.featured_image_id = featured;
    }
    if let Some(yoast) = &body.yoast {
        yoast.apply_to(&mut post.meta);
    }
    store.save_post(post).map_err(|e| map_store_error(rid, &e))?;

    if post_type != PAGE_POST_TYPE {
        let ids: Vec<_> = categories
            .iter()
            .filter_map(|name| maybe_create_term(&mut *store, CATEGORY, name))
            .collect();
        if !ids.is_empty() {
            store
                .set_object_terms(post_id, CATEGORY, &ids, false)
                .map_err(|e| map_store_error(rid, &e))?;
        }
    }

    let tag_ids: Vec<_> = tags
        .iter()
        .filter_map(|name| maybe_create_term(&mut *store, POST_TAG, name))
        .collect();
    if !tag_ids.is_empty() {
        store
            .set_object_terms(post_id, POST_TAG, &tag_ids, false)
            .map_err(|e| map_store_error(rid, &e))?;
    }
    drop(store);

    tracing::info!(
        post_id,
        post_type = %post_type,
        images = image_urls.len(),
        featured = featured.is_some(),
        "post created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(req_id.0, CreatePostResponse { post_id })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> CreatePostRequest {
        CreatePostRequest {
            title: Some("Hello".to_string()),
            post_type: Some("post".to_string()),
            content: Some("<p>Hi</p>".to_string()),
            categories: Some(vec!["News".to_string()]),
            tags: Some(vec!["intro".to_string()]),
            yoast: Some(SeoMeta {
                title: Some("Hello | Blog".to_string()),
                ..SeoMeta::default()
            }),
            ..CreatePostRequest::default()
        }
    }

    #[test]
    fn complete_request_has_no_missing_fields() {
        assert!(missing_fields(&complete()).is_empty());
    }

    #[test]
    fn missing_fields_are_listed_in_order() {
        let body = CreatePostRequest {
            title: Some("  ".to_string()),
            content: None,
            yoast: Some(SeoMeta::default()),
            ..complete()
        };
        assert_eq!(missing_fields(&body), vec!["title", "content", "yoast"]);
    }

    #[test]
    fn pages_do_not_need_categories() {
        let page = CreatePostRequest {
            post_type: Some("page".to_string()),
            categories: None,
            ..complete()
        };
        assert!(missing_fields(&page).is_empty());

        let post = CreatePostRequest {
            categories: Some(vec![]),
            ..complete()
        };
        assert_eq!(missing_fields(&post), vec!["categories"]);
    }
}
