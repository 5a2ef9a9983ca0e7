//! In-memory content store implementing the collaborator traits from
//! `content-api-core`. Posts, products and media share one id sequence, as
//! they would in a CMS posts table.

use std::collections::{BTreeMap, BTreeSet};

use content_api_core::terms::BUILTIN_TAXONOMIES;
use content_api_core::{AttributeTaxonomy, MediaItem, ObjectId, Post, Product, Term, TermId};
use serde::Serialize;

mod media;
mod posts;
mod products;
pub mod seed;
mod taxonomies;
mod terms;

pub use seed::{apply_seed, SeedError, SeedSummary};
pub use taxonomies::MAX_ATTRIBUTE_SLUG_LEN;

/// Row counts reported by the health endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub terms: usize,
    pub products: usize,
    pub posts: usize,
    pub media: usize,
}

#[derive(Debug)]
pub struct ContentStore {
    next_object_id: ObjectId,
    next_term_id: TermId,
    next_attribute_id: u64,
    taxonomies: BTreeSet<String>,
    /// Keyed by taxonomy key (`pa_<slug>`).
    attribute_taxonomies: BTreeMap<String, AttributeTaxonomy>,
    terms: BTreeMap<TermId, Term>,
    /// Term assignments per `(object, taxonomy)`, in assignment order.
    relationships: BTreeMap<(ObjectId, String), Vec<TermId>>,
    products: BTreeMap<ObjectId, Product>,
    posts: BTreeMap<ObjectId, Post>,
    media: BTreeMap<ObjectId, MediaItem>,
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore {
    /// An empty store with the built-in taxonomies registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_object_id: 1,
            next_term_id: 1,
            next_attribute_id: 1,
            taxonomies: BUILTIN_TAXONOMIES.iter().map(|t| (*t).to_string()).collect(),
            attribute_taxonomies: BTreeMap::new(),
            terms: BTreeMap::new(),
            relationships: BTreeMap::new(),
            products: BTreeMap::new(),
            posts: BTreeMap::new(),
            media: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            terms: self.terms.len(),
            products: self.products.len(),
            posts: self.posts.len(),
            media: self.media.len(),
        }
    }

    fn allocate_object_id(&mut self) -> ObjectId {
        let id = self.next_object_id;
        self.next_object_id += 1;
        id
    }

    /// `base` if no post or product uses it, otherwise `base-2`, `base-3`, ...
    fn unique_object_slug(&self, base: &str, owner: Option<ObjectId>) -> String {
        let taken = |slug: &str| {
            self.object_slug_owner(slug)
                .is_some_and(|found| Some(found) != owner)
        };
        if !taken(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    fn object_slug_owner(&self, slug: &str) -> Option<ObjectId> {
        self.products
            .values()
            .find(|p| p.slug == slug)
            .map(|p| p.id)
            .or_else(|| self.posts.values().find(|p| p.slug == slug).map(|p| p.id))
    }
}
