use serde::{Deserialize, Serialize};

pub type TermId = u64;

/// Post categories.
pub const CATEGORY: &str = "category";
/// Post tags.
pub const POST_TAG: &str = "post_tag";
pub const PRODUCT_CAT: &str = "product_cat";
pub const PRODUCT_TAG: &str = "product_tag";
/// Brand taxonomy shipped by the store plugin.
pub const PRODUCT_BRAND: &str = "product_brand";
/// Brand taxonomy registered by third-party brand plugins.
pub const BRAND: &str = "brand";

/// Taxonomies that exist without being registered by a request.
pub const BUILTIN_TAXONOMIES: [&str; 6] =
    [CATEGORY, POST_TAG, PRODUCT_CAT, PRODUCT_TAG, PRODUCT_BRAND, BRAND];

/// A named node within a taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub taxonomy: String,
    pub name: String,
    pub slug: String,
    pub parent: Option<TermId>,
    #[serde(default)]
    pub description: String,
    /// Number of objects the term is assigned to.
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermLookup<'a> {
    Id(TermId),
    Slug(&'a str),
    Name(&'a str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTerm {
    pub name: String,
    /// Derived from `name` when `None`.
    pub slug: Option<String>,
    pub parent: Option<TermId>,
    pub description: String,
}

impl NewTerm {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Sparse term update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TermOrder {
    /// Insertion order, i.e. ascending id.
    #[default]
    Id,
    /// Case-insensitive ascending name.
    Name,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TermQuery {
    pub order: TermOrder,
    pub limit: Option<usize>,
}

/// Builds the public archive link for a term.
///
/// Categories and brands get their conventional archive bases; any other
/// taxonomy falls back to a query-string link.
#[must_use]
pub fn term_link(site_url: &str, term: &Term) -> String {
    let base = match term.taxonomy.as_str() {
        PRODUCT_CAT => Some("product-category"),
        PRODUCT_TAG => Some("product-tag"),
        PRODUCT_BRAND | BRAND => Some("brand"),
        CATEGORY => Some("category"),
        POST_TAG => Some("tag"),
        _ => None,
    };
    match base {
        Some(base) => format!("{site_url}/{base}/{}/", term.slug),
        None => format!("{site_url}/?{}={}", term.taxonomy, term.slug),
    }
}

/// Strips scheme and host from a link produced by [`term_link`].
#[must_use]
pub fn relative_link(link: &str) -> String {
    reqwest::Url::parse(link).map_or_else(
        |_| link.to_string(),
        |url| {
            let mut relative = url.path().to_string();
            if let Some(query) = url.query() {
                relative.push('?');
                relative.push_str(query);
            }
            relative
        },
    )
}
