use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::attributes::ProductAttributes;
use crate::store::ObjectId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    #[default]
    InStock,
    OutOfStock,
    OnBackorder,
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::InStock => write!(f, "instock"),
            StockStatus::OutOfStock => write!(f, "outofstock"),
            StockStatus::OnBackorder => write!(f, "onbackorder"),
        }
    }
}

impl FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instock" => Ok(StockStatus::InStock),
            "outofstock" => Ok(StockStatus::OutOfStock),
            "onbackorder" => Ok(StockStatus::OnBackorder),
            other => Err(format!(
                "stock_status must be 'instock', 'outofstock' or 'onbackorder', got '{other}'"
            )),
        }
    }
}

/// A store product. Term assignments (categories, tags, brands) live in the
/// term store, keyed by the product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ObjectId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub regular_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    /// Empty when the product has no SKU.
    pub sku: String,
    pub stock_status: StockStatus,
    pub stock_quantity: Option<i64>,
    pub image_id: Option<ObjectId>,
    pub gallery_image_ids: Vec<ObjectId>,
    pub attributes: ProductAttributes,
    /// SEO and other post meta, keyed by meta key.
    pub meta: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductLookup<'a> {
    Id(ObjectId),
    Sku(&'a str),
}
