//! Turns caller-supplied image URLs into media items.

use content_api_core::sanitize::sanitize_url;
use content_api_core::{MediaStore, NewMedia, ObjectId};

use super::AppState;

/// An image usable by a post or product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Attachment {
    /// `None` for an uploads URL with no matching media item.
    pub id: Option<ObjectId>,
    pub url: String,
}

/// Sideload `raw_url` and record it as a media item owned by `parent`.
///
/// URLs already under the uploads base are reused without downloading.
/// The store lock is only taken after the download has finished. Failures
/// are logged and yield `None`.
pub(super) async fn attach_image(
    state: &AppState,
    raw_url: &str,
    parent: Option<ObjectId>,
) -> Option<Attachment> {
    let url = sanitize_url(raw_url);
    if url.is_empty() {
        tracing::warn!(url = raw_url, "ignoring image with invalid URL");
        return None;
    }

    if state.sideloader.uploads().is_local(&url) {
        let id = state.store.lock().await.media_by_url(&url).map(|m| m.id);
        return Some(Attachment { id, url });
    }

    match state.sideloader.sideload(&url).await {
        Ok(image) => {
            let id = state.store.lock().await.insert_media(NewMedia {
                url: image.url.clone(),
                source_url: image.source_url,
                file_name: image.file_name,
                mime_type: image.mime_type,
                checksum: image.checksum,
                parent,
            });
            tracing::info!(media_id = id, url = %image.url, parent, "image sideloaded");
            Some(Attachment {
                id: Some(id),
                url: image.url,
            })
        }
        Err(error) => {
            tracing::warn!(url = %url, error = %error, "image sideload failed; skipping");
            None
        }
    }
}

/// [`attach_image`] for each URL, in order, dropping failures.
pub(super) async fn attach_images(
    state: &AppState,
    raw_urls: &[String],
    parent: Option<ObjectId>,
) -> Vec<Attachment> {
    let mut attached = Vec::with_capacity(raw_urls.len());
    for raw_url in raw_urls {
        if let Some(attachment) = attach_image(state, raw_url, parent).await {
            attached.push(attachment);
        }
    }
    attached
}
