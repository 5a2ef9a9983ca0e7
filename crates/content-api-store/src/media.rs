use content_api_core::{MediaItem, MediaStore, NewMedia, ObjectId};

use crate::ContentStore;

impl MediaStore for ContentStore {
    fn insert_media(&mut self, media: NewMedia) -> ObjectId {
        let id = self.allocate_object_id();
        self.media.insert(
            id,
            MediaItem {
                id,
                url: media.url,
                source_url: media.source_url,
                file_name: media.file_name,
                mime_type: media.mime_type,
                checksum: media.checksum,
                parent: media.parent,
            },
        );
        id
    }

    fn media(&self, id: ObjectId) -> Option<MediaItem> {
        self.media.get(&id).cloned()
    }

    fn media_by_url(&self, url: &str) -> Option<MediaItem> {
        self.media.values().find(|m| m.url == url).cloned()
    }
}
