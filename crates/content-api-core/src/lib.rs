pub mod app_config;
pub mod attributes;
pub mod config;
pub mod content;
pub mod hierarchy;
pub mod posts;
pub mod products;
pub mod resolve;
pub mod sanitize;
pub mod seed;
pub mod seo;
pub mod store;
pub mod terms;

#[cfg(test)]
mod test_support;

pub use app_config::{AppConfig, Environment};
pub use attributes::{
    attribute_taxonomy_name, reconcile, AttributeAssignment, AttributeError, AttributeOptions,
    AttributeValue, ProductAttribute, ProductAttributes, ReconcileOptions,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use content::replace_image_variables;
pub use hierarchy::{build_tree, CategoryNode, HierarchyError};
pub use posts::{NewPost, Post, PostStatus};
pub use products::{Product, ProductLookup, StockStatus};
pub use resolve::{maybe_create_term, resolve_term_reference};
pub use seed::{load_seed, parse_seed, CatalogSeed};
pub use seo::SeoMeta;
pub use store::{
    AttributeTaxonomy, MediaItem, MediaStore, NewMedia, ObjectId, PostStore, ProductStore,
    StoreError, TaxonomyRegistry, TermStore,
};
pub use terms::{NewTerm, Term, TermId, TermLookup, TermOrder, TermQuery, TermUpdate};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seed file {path}: {source}")]
    SeedFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file: {0}")]
    SeedFileParse(#[source] serde_yaml::Error),

    #[error("seed validation failed: {0}")]
    Validation(String),
}
