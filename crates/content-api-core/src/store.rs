//! Collaborator contracts for the content stores.
//!
//! Request handlers and the attribute reconciler only talk to these traits;
//! `content-api-store` provides the in-memory implementation used by the
//! server and the CLI.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attributes::attribute_taxonomy_name;
use crate::posts::{NewPost, Post};
use crate::products::{Product, ProductLookup};
use crate::terms::{NewTerm, Term, TermId, TermLookup, TermQuery, TermUpdate};

/// Identifier shared by posts, products and media items.
pub type ObjectId = u64;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("taxonomy '{0}' is not registered")]
    UnknownTaxonomy(String),

    #[error("term name must not be empty")]
    EmptyTermName,

    #[error("a term with slug '{slug}' already exists in {taxonomy}")]
    DuplicateTerm { taxonomy: String, slug: String },

    #[error("term {id} not found in {taxonomy}")]
    TermNotFound { taxonomy: String, id: TermId },

    #[error("parent term {0} does not exist")]
    InvalidParent(TermId),

    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("SKU '{0}' is already in use")]
    DuplicateSku(String),

    #[error("invalid attribute slug '{slug}': {reason}")]
    InvalidAttributeSlug { slug: String, reason: String },
}

/// A registered product attribute taxonomy (`pa_<slug>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeTaxonomy {
    pub id: u64,
    pub slug: String,
    pub label: String,
}

impl AttributeTaxonomy {
    #[must_use]
    pub fn key(&self) -> String {
        attribute_taxonomy_name(&self.slug)
    }
}

pub trait TermStore {
    /// Look up a term; slug and name lookups are scoped to `taxonomy`.
    fn get_term(&self, taxonomy: &str, lookup: TermLookup<'_>) -> Option<Term>;

    /// # Errors
    ///
    /// Fails for unknown taxonomies, empty names, duplicate slugs and
    /// parents that do not exist in the same taxonomy.
    fn insert_term(&mut self, taxonomy: &str, term: NewTerm) -> Result<Term, StoreError>;

    /// # Errors
    ///
    /// Fails when the term does not exist in `taxonomy`.
    fn update_term(
        &mut self,
        taxonomy: &str,
        id: TermId,
        update: TermUpdate,
    ) -> Result<Term, StoreError>;

    /// # Errors
    ///
    /// Fails for unknown taxonomies.
    fn list_terms(&self, taxonomy: &str, query: TermQuery) -> Result<Vec<Term>, StoreError>;

    /// Terms of `taxonomy` assigned to `object`, in assignment order.
    fn object_terms(&self, object: ObjectId, taxonomy: &str) -> Vec<Term>;

    /// Assign terms to an object, replacing the current assignment unless
    /// `append` is set. Returns the resulting term ids.
    ///
    /// # Errors
    ///
    /// Fails for unknown taxonomies or ids that are not terms of `taxonomy`.
    fn set_object_terms(
        &mut self,
        object: ObjectId,
        taxonomy: &str,
        ids: &[TermId],
        append: bool,
    ) -> Result<Vec<TermId>, StoreError>;
}

pub trait TaxonomyRegistry {
    fn taxonomy_exists(&self, key: &str) -> bool;

    fn attribute_taxonomy(&self, key: &str) -> Option<AttributeTaxonomy>;

    fn attribute_taxonomies(&self) -> Vec<AttributeTaxonomy>;

    /// Register `pa_<slug>` for products. Registering an existing slug
    /// returns the existing taxonomy.
    ///
    /// # Errors
    ///
    /// Fails when the slug is empty or too long to form a taxonomy key.
    fn create_attribute_taxonomy(
        &mut self,
        slug: &str,
        label: &str,
    ) -> Result<AttributeTaxonomy, StoreError>;
}

pub trait ProductStore {
    fn get_product(&self, lookup: ProductLookup<'_>) -> Option<Product>;

    /// Store a new product; its `id` is assigned by the store.
    ///
    /// # Errors
    ///
    /// Fails when the SKU is already taken.
    fn insert_product(&mut self, product: Product) -> Result<ObjectId, StoreError>;

    /// # Errors
    ///
    /// Fails when the product does not exist or its SKU is taken by another.
    fn save_product(&mut self, product: Product) -> Result<ObjectId, StoreError>;

    fn list_products(&self) -> Vec<Product>;

    /// Ids of products whose description is empty, ascending, at most `limit`.
    fn products_missing_description(&self, limit: usize) -> Vec<ObjectId>;

    /// The post or product currently using `slug`.
    fn slug_owner(&self, slug: &str) -> Option<ObjectId>;
}

pub trait PostStore {
    /// # Errors
    ///
    /// Implementations may reject malformed posts.
    fn insert_post(&mut self, post: NewPost) -> Result<ObjectId, StoreError>;

    fn get_post(&self, id: ObjectId) -> Option<Post>;

    /// # Errors
    ///
    /// Fails when the post does not exist.
    fn save_post(&mut self, post: Post) -> Result<ObjectId, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    pub id: ObjectId,
    pub url: String,
    pub source_url: String,
    pub file_name: String,
    pub mime_type: String,
    pub checksum: String,
    pub parent: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedia {
    pub url: String,
    pub source_url: String,
    pub file_name: String,
    pub mime_type: String,
    pub checksum: String,
    pub parent: Option<ObjectId>,
}

pub trait MediaStore {
    fn insert_media(&mut self, media: NewMedia) -> ObjectId;

    fn media(&self, id: ObjectId) -> Option<MediaItem>;

    /// The media item served at `url`, if any.
    fn media_by_url(&self, url: &str) -> Option<MediaItem>;
}
