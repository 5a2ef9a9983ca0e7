use std::collections::{BTreeMap, HashMap};

use content_api_core::seed::{SeedBrand, SeedProduct};
use content_api_core::terms::{PRODUCT_CAT, PRODUCT_TAG};
use content_api_core::{
    maybe_create_term, reconcile, AttributeAssignment, AttributeError, CatalogSeed, NewTerm,
    ObjectId, Product, ProductAttributes, ProductStore, ReconcileOptions, StoreError,
    TaxonomyRegistry, TermId, TermStore,
};
use serde::Serialize;
use thiserror::Error;

use crate::ContentStore;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("attributes of product '{product}': {source}")]
    Attribute {
        product: String,
        #[source]
        source: AttributeError,
    },
}

/// Number of rows created per section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub categories: usize,
    pub brands: usize,
    pub attributes: usize,
    pub products: usize,
}

/// Load a validated seed into `store`.
///
/// Categories are inserted in file order so that parents exist before their
/// children. Products get their category, brand, tag and attribute
/// assignments after insertion.
///
/// # Errors
///
/// Returns [`SeedError`] on the first store or attribute failure; rows created
/// before the failure remain in the store.
pub fn apply_seed(store: &mut ContentStore, seed: &CatalogSeed) -> Result<SeedSummary, SeedError> {
    let mut summary = SeedSummary::default();

    let mut categories: HashMap<String, TermId> = HashMap::new();
    for category in &seed.categories {
        let parent = category
            .parent
            .as_ref()
            .and_then(|name| categories.get(&name.to_lowercase()).copied());
        let term = store.insert_term(
            PRODUCT_CAT,
            NewTerm {
                parent,
                description: category.description.clone(),
                ..NewTerm::named(category.name.clone())
            },
        )?;
        categories.insert(category.name.to_lowercase(), term.id);
        summary.categories += 1;
    }

    let mut brands: HashMap<String, (String, TermId)> = HashMap::new();
    for SeedBrand {
        name,
        taxonomy,
        description,
    } in &seed.brands
    {
        let term = store.insert_term(
            taxonomy,
            NewTerm {
                description: description.clone(),
                ..NewTerm::named(name.clone())
            },
        )?;
        brands.insert(name.to_lowercase(), (taxonomy.clone(), term.id));
        summary.brands += 1;
    }

    for attribute in &seed.attributes {
        let taxonomy = store.create_attribute_taxonomy(&attribute.slug(), &attribute.name)?;
        let key = taxonomy.key();
        for term in &attribute.terms {
            maybe_create_term(store, &key, term);
        }
        summary.attributes += 1;
    }

    for product in &seed.products {
        let id = insert_seed_product(store, product)?;

        let category_ids: Vec<TermId> = product
            .categories
            .iter()
            .filter_map(|name| categories.get(&name.to_lowercase()).copied())
            .collect();
        store.set_object_terms(id, PRODUCT_CAT, &category_ids, false)?;

        let mut by_taxonomy: BTreeMap<&str, Vec<TermId>> = BTreeMap::new();
        for brand in &product.brands {
            if let Some((taxonomy, term_id)) = brands.get(&brand.to_lowercase()) {
                by_taxonomy.entry(taxonomy).or_default().push(*term_id);
            }
        }
        for (taxonomy, ids) in by_taxonomy {
            store.set_object_terms(id, taxonomy, &ids, false)?;
        }

        let tag_ids: Vec<TermId> = product
            .tags
            .iter()
            .filter_map(|tag| maybe_create_term(store, PRODUCT_TAG, tag))
            .collect();
        store.set_object_terms(id, PRODUCT_TAG, &tag_ids, false)?;

        summary.products += 1;
    }

    tracing::info!(
        categories = summary.categories,
        brands = summary.brands,
        attributes = summary.attributes,
        products = summary.products,
        "catalog seed applied"
    );
    Ok(summary)
}

fn insert_seed_product(store: &mut ContentStore, seed: &SeedProduct) -> Result<ObjectId, SeedError> {
    let requested: Vec<AttributeAssignment> = seed
        .attributes
        .iter()
        .map(|a| AttributeAssignment::new(a.name.clone(), a.value.clone()))
        .collect();
    let mut attributes = ProductAttributes::default();
    reconcile(
        &requested,
        &mut attributes,
        ReconcileOptions::default(),
        store,
    )
    .map_err(|source| SeedError::Attribute {
        product: seed.name.clone(),
        source,
    })?;

    let id = store.insert_product(Product {
        name: seed.name.clone(),
        description: seed.description.clone(),
        short_description: seed.short_description.clone(),
        regular_price: seed.regular_price,
        sale_price: seed.sale_price,
        sku: seed.sku.clone(),
        stock_status: seed.stock_status,
        stock_quantity: seed.stock_quantity,
        attributes,
        ..Product::default()
    })?;
    Ok(id)
}
