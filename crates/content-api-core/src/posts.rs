use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::ObjectId;

/// Author recorded on posts created through the API.
pub const DEFAULT_AUTHOR_ID: u64 = 1;

pub const PAGE_POST_TYPE: &str = "page";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Publish,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: ObjectId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: PostStatus,
    pub post_type: String,
    pub author_id: u64,
    pub featured_image_id: Option<ObjectId>,
    pub meta: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub post_type: String,
    pub author_id: u64,
}

impl NewPost {
    /// A draft owned by [`DEFAULT_AUTHOR_ID`].
    #[must_use]
    pub fn draft(
        title: impl Into<String>,
        content: impl Into<String>,
        post_type: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            status: PostStatus::Draft,
            post_type: post_type.into(),
            author_id: DEFAULT_AUTHOR_ID,
        }
    }
}
