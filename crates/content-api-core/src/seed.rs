//! YAML catalog seed: categories, brands, attribute taxonomies and products
//! loaded into the store at startup.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::attributes::AttributeValue;
use crate::products::StockStatus;
use crate::sanitize::{is_valid_sku, sanitize_title};
use crate::terms::PRODUCT_BRAND;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    /// Name of a category declared earlier in the file.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub description: String,
}

fn default_brand_taxonomy() -> String {
    PRODUCT_BRAND.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedBrand {
    pub name: String,
    #[serde(default = "default_brand_taxonomy")]
    pub taxonomy: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAttribute {
    /// Label; the taxonomy slug is derived from it.
    pub name: String,
    #[serde(default)]
    pub terms: Vec<String>,
}

impl SeedAttribute {
    #[must_use]
    pub fn slug(&self) -> String {
        sanitize_title(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedProductAttribute {
    pub name: String,
    pub value: AttributeValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub regular_price: Option<Decimal>,
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub stock_status: StockStatus,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    /// Category names.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Brand names, assigned in each brand's own taxonomy.
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<SeedProductAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub brands: Vec<SeedBrand>,
    #[serde(default)]
    pub attributes: Vec<SeedAttribute>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

/// Load and validate a catalog seed from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seed(path: &Path) -> Result<CatalogSeed, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_seed(&content)
}

/// Parse and validate seed YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_seed(content: &str) -> Result<CatalogSeed, ConfigError> {
    let seed: CatalogSeed = serde_yaml::from_str(content).map_err(ConfigError::SeedFileParse)?;
    validate_seed(&seed)?;
    Ok(seed)
}

fn validate_seed(seed: &CatalogSeed) -> Result<(), ConfigError> {
    let mut categories = HashSet::new();
    for category in &seed.categories {
        require_name("category", &category.name)?;
        if let Some(parent) = &category.parent {
            if !categories.contains(&parent.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "category '{}' has parent '{parent}' which is not declared before it",
                    category.name
                )));
            }
        }
        if !categories.insert(category.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category name: '{}'",
                category.name
            )));
        }
    }

    let mut brands = HashSet::new();
    for brand in &seed.brands {
        require_name("brand", &brand.name)?;
        if !brands.insert(brand.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand name: '{}'",
                brand.name
            )));
        }
    }

    let mut attributes = HashSet::new();
    for attribute in &seed.attributes {
        require_name("attribute", &attribute.name)?;
        let slug = attribute.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "attribute '{}' has no usable slug",
                attribute.name
            )));
        }
        if !attributes.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate attribute slug: '{slug}' (from attribute '{}')",
                attribute.name
            )));
        }
    }

    let mut skus = HashSet::new();
    for product in &seed.products {
        require_name("product", &product.name)?;
        if !product.sku.is_empty() {
            if !is_valid_sku(&product.sku) {
                return Err(ConfigError::Validation(format!(
                    "product '{}' has invalid SKU '{}'",
                    product.name, product.sku
                )));
            }
            if !skus.insert(product.sku.clone()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate SKU: '{}'",
                    product.sku
                )));
            }
        }
        for category in &product.categories {
            if !categories.contains(&category.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "product '{}' references unknown category '{category}'",
                    product.name
                )));
            }
        }
        for brand in &product.brands {
            if !brands.contains(&brand.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "product '{}' references unknown brand '{brand}'",
                    product.name
                )));
            }
        }
        for attribute in &product.attributes {
            if !attributes.contains(&sanitize_title(&attribute.name)) {
                return Err(ConfigError::Validation(format!(
                    "product '{}' references undeclared attribute '{}'",
                    product.name, attribute.name
                )));
            }
        }
    }

    Ok(())
}

fn require_name(kind: &str, name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{kind} name must be non-empty"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "seed_test.rs"]
mod tests;
