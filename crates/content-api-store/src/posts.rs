use std::collections::BTreeMap;

use content_api_core::sanitize::sanitize_title;
use content_api_core::{NewPost, ObjectId, Post, PostStore, StoreError};

use crate::ContentStore;

impl PostStore for ContentStore {
    fn insert_post(&mut self, post: NewPost) -> Result<ObjectId, StoreError> {
        let id = self.allocate_object_id();
        let base = sanitize_title(&post.title);
        let base = if base.is_empty() { id.to_string() } else { base };
        let slug = self.unique_object_slug(&base, Some(id));
        self.posts.insert(
            id,
            Post {
                id,
                title: post.title,
                slug,
                content: post.content,
                status: post.status,
                post_type: post.post_type,
                author_id: post.author_id,
                featured_image_id: None,
                meta: BTreeMap::new(),
            },
        );
        Ok(id)
    }

    fn get_post(&self, id: ObjectId) -> Option<Post> {
        self.posts.get(&id).cloned()
    }

    fn save_post(&mut self, post: Post) -> Result<ObjectId, StoreError> {
        let slot = self
            .posts
            .get_mut(&post.id)
            .ok_or(StoreError::ObjectNotFound(post.id))?;
        *slot = post;
        Ok(slot.id)
    }
}
