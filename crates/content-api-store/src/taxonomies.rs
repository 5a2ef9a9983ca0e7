use content_api_core::sanitize::sanitize_title;
use content_api_core::{attribute_taxonomy_name, AttributeTaxonomy, StoreError, TaxonomyRegistry};

use crate::ContentStore;

/// Taxonomy keys are capped at 32 characters, 3 of which are the `pa_` prefix.
pub const MAX_ATTRIBUTE_SLUG_LEN: usize = 28;

impl TaxonomyRegistry for ContentStore {
    fn taxonomy_exists(&self, key: &str) -> bool {
        self.taxonomies.contains(key)
    }

    fn attribute_taxonomy(&self, key: &str) -> Option<AttributeTaxonomy> {
        self.attribute_taxonomies.get(key).cloned()
    }

    fn attribute_taxonomies(&self) -> Vec<AttributeTaxonomy> {
        let mut all: Vec<AttributeTaxonomy> = self.attribute_taxonomies.values().cloned().collect();
        all.sort_by_key(|t| t.id);
        all
    }

    fn create_attribute_taxonomy(
        &mut self,
        slug: &str,
        label: &str,
    ) -> Result<AttributeTaxonomy, StoreError> {
        let invalid = |reason: &str| StoreError::InvalidAttributeSlug {
            slug: slug.to_string(),
            reason: reason.to_string(),
        };
        if slug.is_empty() {
            return Err(invalid("slug is empty"));
        }
        if sanitize_title(slug) != slug {
            return Err(invalid("slug may only contain a-z, 0-9, '-' and '_'"));
        }
        if slug.len() > MAX_ATTRIBUTE_SLUG_LEN {
            return Err(invalid("slug is longer than 28 characters"));
        }

        let key = attribute_taxonomy_name(slug);
        if let Some(existing) = self.attribute_taxonomies.get(&key) {
            return Ok(existing.clone());
        }

        let taxonomy = AttributeTaxonomy {
            id: self.next_attribute_id,
            slug: slug.to_string(),
            label: if label.trim().is_empty() {
                slug.to_string()
            } else {
                label.trim().to_string()
            },
        };
        self.next_attribute_id += 1;
        self.taxonomies.insert(key.clone());
        self.attribute_taxonomies.insert(key.clone(), taxonomy.clone());
        tracing::info!(taxonomy = %key, attribute_id = taxonomy.id, "attribute taxonomy registered");
        Ok(taxonomy)
    }
}
