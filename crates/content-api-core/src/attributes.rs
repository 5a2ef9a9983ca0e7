//! Product attributes and the reconciler that applies requested
//! `(name, values)` assignments to a product's attribute set.
//!
//! Each assignment is backed by a product attribute taxonomy `pa_<slug>`.
//! Option values are resolved to terms of that taxonomy, creating the terms
//! (and, when allowed, the taxonomy itself) on demand.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolve::maybe_create_term;
use crate::sanitize::{sanitize_text_field, sanitize_title};
use crate::store::{StoreError, TaxonomyRegistry, TermStore};
use crate::terms::TermId;

pub const ATTRIBUTE_TAXONOMY_PREFIX: &str = "pa_";

/// Taxonomy key backing the attribute with slug `slug`.
#[must_use]
pub fn attribute_taxonomy_name(slug: &str) -> String {
    format!("{ATTRIBUTE_TAXONOMY_PREFIX}{slug}")
}

/// Requested option values: one string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    One(String),
    Many(Vec<String>),
}

impl AttributeValue {
    /// Sanitized option strings, in request order.
    #[must_use]
    pub fn options(&self) -> Vec<String> {
        match self {
            AttributeValue::One(value) => vec![sanitize_text_field(value)],
            AttributeValue::Many(values) => {
                values.iter().map(|v| sanitize_text_field(v)).collect()
            }
        }
    }
}

/// One row of an attribute update request. Both fields are optional on the
/// wire so that a missing one can be reported by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeAssignment {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<AttributeValue>,
}

impl AttributeAssignment {
    #[must_use]
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum AttributeOptions {
    /// Taxonomy-backed attribute: ids of terms in the attribute taxonomy.
    Terms(Vec<TermId>),
    /// Free-text attribute stored on the product only.
    Text(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttribute {
    /// Attribute taxonomy id; `None` for free-text attributes.
    pub id: Option<u64>,
    /// Taxonomy key for taxonomy attributes, display name otherwise.
    pub name: String,
    pub options: AttributeOptions,
    pub position: u32,
    pub visible: bool,
    pub variation: bool,
}

impl ProductAttribute {
    /// Key under which the attribute is stored on a product.
    #[must_use]
    pub fn key(&self) -> String {
        match self.options {
            AttributeOptions::Terms(_) => self.name.clone(),
            AttributeOptions::Text(_) => sanitize_title(&self.name),
        }
    }

    #[must_use]
    pub fn is_taxonomy(&self) -> bool {
        matches!(self.options, AttributeOptions::Terms(_))
    }
}

/// Ordered attribute set of a product, unique by [`ProductAttribute::key`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductAttributes(Vec<ProductAttribute>);

impl ProductAttributes {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ProductAttribute> {
        self.0.iter().find(|a| a.key() == key)
    }

    /// Store `attribute` under its key. An existing entry is replaced in
    /// place and returned; a new key is appended.
    pub fn replace(&mut self, attribute: ProductAttribute) -> Option<ProductAttribute> {
        let key = attribute.key();
        match self.0.iter_mut().find(|a| a.key() == key) {
            Some(slot) => Some(std::mem::replace(slot, attribute)),
            None => {
                self.0.push(attribute);
                None
            }
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductAttribute> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ProductAttribute> for ProductAttributes {
    fn from_iter<I: IntoIterator<Item = ProductAttribute>>(iter: I) -> Self {
        let mut attributes = Self::default();
        for attribute in iter {
            attributes.replace(attribute);
        }
        attributes
    }
}

impl<'a> IntoIterator for &'a ProductAttributes {
    type Item = &'a ProductAttribute;
    type IntoIter = std::slice::Iter<'a, ProductAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Register missing `pa_*` taxonomies instead of rejecting the row.
    pub allow_create_taxonomy: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttributeError {
    #[error(
        "invalid attribute {}: each attribute must include a valid '{field}'",
        .attribute.as_deref().unwrap_or("<unnamed>")
    )]
    InvalidAttribute {
        attribute: Option<String>,
        field: &'static str,
    },

    #[error("the attribute {key} does not exist")]
    AttributeDoesNotExist { key: String },

    #[error("failed to create attribute taxonomy {key}: {source}")]
    TaxonomyCreation {
        key: String,
        #[source]
        source: StoreError,
    },
}

impl AttributeError {
    /// Name of the request field the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            AttributeError::InvalidAttribute { field, .. } => field,
            AttributeError::AttributeDoesNotExist { .. }
            | AttributeError::TaxonomyCreation { .. } => "name",
        }
    }
}

/// Apply `requested` to `existing`, in order.
///
/// Every requested key is replaced wholesale with a visible, non-variation
/// attribute at position 0 whose options are the resolved term ids (request
/// order, duplicates kept). Keys that are not requested are left alone.
/// Option terms that cannot be created are skipped.
///
/// `existing` is updated in place as rows are processed, so rows applied
/// before a failing row stay applied. Taxonomies and terms created along the
/// way are never rolled back.
///
/// # Errors
///
/// - [`AttributeError::InvalidAttribute`] for a row without a usable name or
///   without a value.
/// - [`AttributeError::AttributeDoesNotExist`] when the taxonomy is missing and
///   `options.allow_create_taxonomy` is off.
/// - [`AttributeError::TaxonomyCreation`] when registering the taxonomy fails.
pub fn reconcile<C>(
    requested: &[AttributeAssignment],
    existing: &mut ProductAttributes,
    options: ReconcileOptions,
    catalog: &mut C,
) -> Result<(), AttributeError>
where
    C: TermStore + TaxonomyRegistry + ?Sized,
{
    for assignment in requested {
        let Some(raw_name) = assignment.name.as_deref() else {
            return Err(AttributeError::InvalidAttribute {
                attribute: None,
                field: "name",
            });
        };
        let Some(value) = assignment.value.as_ref() else {
            return Err(AttributeError::InvalidAttribute {
                attribute: Some(raw_name.to_string()),
                field: "value",
            });
        };

        let slug = sanitize_title(raw_name);
        if slug.is_empty() {
            return Err(AttributeError::InvalidAttribute {
                attribute: Some(raw_name.to_string()),
                field: "name",
            });
        }
        let label = sanitize_text_field(raw_name);
        let key = attribute_taxonomy_name(&slug);

        if !catalog.taxonomy_exists(&key) {
            if !options.allow_create_taxonomy {
                return Err(AttributeError::AttributeDoesNotExist { key });
            }
            catalog
                .create_attribute_taxonomy(&slug, &label)
                .map_err(|source| AttributeError::TaxonomyCreation {
                    key: key.clone(),
                    source,
                })?;
            tracing::info!(taxonomy = %key, label = %label, "registered attribute taxonomy");
        }

        let term_ids: Vec<TermId> = value
            .options()
            .iter()
            .filter_map(|option| maybe_create_term(&mut *catalog, &key, option))
            .collect();

        tracing::debug!(taxonomy = %key, options = term_ids.len(), "attribute reconciled");

        existing.replace(ProductAttribute {
            id: catalog.attribute_taxonomy(&key).map(|t| t.id),
            name: key,
            options: AttributeOptions::Terms(term_ids),
            position: 0,
            visible: true,
            variation: false,
        });
    }

    Ok(())
}

#[cfg(test)]
#[path = "attributes_test.rs"]
mod tests;
