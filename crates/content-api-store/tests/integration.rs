//! Seeds a store end to end and checks it through the core traits.

use content_api_core::terms::{BRAND, PRODUCT_BRAND, PRODUCT_CAT, PRODUCT_TAG};
use content_api_core::{
    build_tree, parse_seed, AttributeOptions, ProductLookup, ProductStore, StockStatus,
    TaxonomyRegistry, TermLookup, TermOrder, TermQuery, TermStore,
};
use content_api_store::{apply_seed, ContentStore, SeedError, SeedSummary, StoreCounts};
use rust_decimal::Decimal;

const SEED: &str = r#"
categories:
  - name: Clothing
  - name: Shirts
    parent: Clothing
  - name: Accessories
  - name: Hats
    parent: Accessories
brands:
  - name: Acme
  - name: Globex
    taxonomy: brand
attributes:
  - name: Color
    terms: [Red, Blue]
products:
  - name: Plain Tee
    sku: TEE-001
    regular_price: "19.99"
    stock_status: onbackorder
    categories: [Shirts, Clothing]
    brands: [Acme, Globex]
    tags: [summer, cotton]
    attributes:
      - name: Color
        value: [Blue, Green]
  - name: Cap
    sku: CAP-001
    description: A cap.
    categories: [Hats]
"#;

fn seeded() -> (ContentStore, SeedSummary) {
    let seed = parse_seed(SEED).unwrap();
    let mut store = ContentStore::new();
    let summary = apply_seed(&mut store, &seed).unwrap();
    (store, summary)
}

#[test]
fn summary_and_counts_reflect_seed() {
    let (store, summary) = seeded();
    assert_eq!(
        summary,
        SeedSummary {
            categories: 4,
            brands: 2,
            attributes: 1,
            products: 2,
        }
    );
    // 4 categories, 2 brands, Red/Blue/Green, 2 tags
    assert_eq!(
        store.counts(),
        StoreCounts {
            terms: 11,
            products: 2,
            posts: 0,
            media: 0,
        }
    );
}

#[test]
fn seeded_categories_build_a_name_ordered_tree() {
    let (store, _) = seeded();
    let terms = store
        .list_terms(
            PRODUCT_CAT,
            TermQuery {
                order: TermOrder::Name,
                limit: None,
            },
        )
        .unwrap();
    let tree = build_tree(&terms).unwrap();

    let roots: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(roots, vec!["Accessories", "Clothing"]);
    assert_eq!(tree[0].children[0].name, "Hats");
    assert_eq!(tree[1].children[0].slug, "shirts");
}

#[test]
fn product_fields_and_assignments_are_applied() {
    let (store, _) = seeded();
    let tee = store.get_product(ProductLookup::Sku("TEE-001")).unwrap();

    assert_eq!(tee.slug, "plain-tee");
    assert_eq!(tee.regular_price, Some(Decimal::new(1999, 2)));
    assert_eq!(tee.stock_status, StockStatus::OnBackorder);

    let categories: Vec<String> = store
        .object_terms(tee.id, PRODUCT_CAT)
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(categories, vec!["Shirts", "Clothing"]);

    assert_eq!(store.object_terms(tee.id, PRODUCT_BRAND)[0].name, "Acme");
    assert_eq!(store.object_terms(tee.id, BRAND)[0].name, "Globex");
    assert_eq!(store.object_terms(tee.id, PRODUCT_TAG).len(), 2);

    let acme = store
        .get_term(PRODUCT_BRAND, TermLookup::Name("Acme"))
        .unwrap();
    assert_eq!(acme.count, 1);
}

#[test]
fn product_attributes_reuse_and_extend_seeded_terms() {
    let (store, _) = seeded();
    let tee = store.get_product(ProductLookup::Sku("TEE-001")).unwrap();
    let blue = store.get_term("pa_color", TermLookup::Name("Blue")).unwrap();
    let green = store.get_term("pa_color", TermLookup::Name("Green")).unwrap();

    let color = tee.attributes.get("pa_color").unwrap();
    assert_eq!(color.options, AttributeOptions::Terms(vec![blue.id, green.id]));
    assert_eq!(
        color.id,
        store.attribute_taxonomy("pa_color").map(|t| t.id)
    );
}

#[test]
fn undeclared_attribute_taxonomy_fails_the_seed() {
    let mut seed = parse_seed(SEED).unwrap();
    seed.attributes.clear();
    let mut store = ContentStore::new();

    let err = apply_seed(&mut store, &seed).unwrap_err();
    assert!(matches!(err, SeedError::Attribute { ref product, .. } if product == "Plain Tee"));
}
