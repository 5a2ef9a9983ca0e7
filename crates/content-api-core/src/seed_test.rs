use std::io::Write;

use super::*;

const SAMPLE: &str = r#"
categories:
  - name: Clothing
  - name: Shirts
    parent: Clothing
    description: Tops of all kinds
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
    sale_price: 14.5
    stock_status: outofstock
    categories: [Shirts]
    brands: [Acme]
    tags: [summer]
    attributes:
      - name: Color
        value: [Red, Blue]
  - name: Gift Card
"#;

fn seed_with(categories: &str) -> String {
    format!("categories:\n{categories}")
}

#[test]
fn parses_full_seed() {
    let seed = parse_seed(SAMPLE).unwrap();

    assert_eq!(seed.categories.len(), 2);
    assert_eq!(seed.categories[1].parent.as_deref(), Some("Clothing"));
    assert_eq!(seed.brands[0].taxonomy, "product_brand");
    assert_eq!(seed.brands[1].taxonomy, "brand");
    assert_eq!(seed.attributes[0].slug(), "color");

    let tee = &seed.products[0];
    assert_eq!(tee.regular_price, Some("19.99".parse().unwrap()));
    assert_eq!(tee.sale_price, Some("14.5".parse().unwrap()));
    assert_eq!(tee.stock_status, StockStatus::OutOfStock);
    assert_eq!(
        tee.attributes[0].value,
        AttributeValue::Many(vec!["Red".to_string(), "Blue".to_string()])
    );

    let card = &seed.products[1];
    assert!(card.sku.is_empty());
    assert_eq!(card.stock_status, StockStatus::InStock);
}

#[test]
fn empty_document_sections_default() {
    let seed = parse_seed("products: []\n").unwrap();
    assert_eq!(seed, CatalogSeed::default());
}

#[test]
fn load_seed_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let seed = load_seed(file.path()).unwrap();
    assert_eq!(seed.products.len(), 2);
}

#[test]
fn load_seed_reports_missing_file() {
    let err = load_seed(Path::new("/nonexistent/seed.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::SeedFileIo { .. }));
    assert!(err.to_string().contains("/nonexistent/seed.yaml"));
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let err = parse_seed("categories: [").unwrap_err();
    assert!(matches!(err, ConfigError::SeedFileParse(_)));
}

#[test]
fn parent_must_be_declared_first() {
    let yaml = seed_with("  - name: Shirts\n    parent: Clothing\n  - name: Clothing\n");
    let err = parse_seed(&yaml).unwrap_err();
    assert!(err.to_string().contains("not declared before it"));
}

#[test]
fn duplicate_category_names_are_rejected_case_insensitively() {
    let yaml = seed_with("  - name: Shirts\n  - name: shirts\n");
    let err = parse_seed(&yaml).unwrap_err();
    assert!(err.to_string().contains("duplicate category name"));
}

#[test]
fn blank_names_are_rejected() {
    let err = parse_seed("brands:\n  - name: '  '\n").unwrap_err();
    assert!(err.to_string().contains("brand name must be non-empty"));
}

#[test]
fn duplicate_skus_are_rejected() {
    let yaml = "products:\n  - name: A\n    sku: X1\n  - name: B\n    sku: X1\n";
    let err = parse_seed(yaml).unwrap_err();
    assert!(err.to_string().contains("duplicate SKU"));
}

#[test]
fn sku_with_markup_is_rejected() {
    let yaml = "products:\n  - name: A\n    sku: '<b>X1</b>'\n";
    let err = parse_seed(yaml).unwrap_err();
    assert!(err.to_string().contains("invalid SKU"));
}

#[test]
fn products_must_reference_declared_terms() {
    let yaml = "products:\n  - name: A\n    categories: [Ghost]\n";
    assert!(parse_seed(yaml)
        .unwrap_err()
        .to_string()
        .contains("unknown category 'Ghost'"));

    let yaml = "products:\n  - name: A\n    brands: [Nobody]\n";
    assert!(parse_seed(yaml)
        .unwrap_err()
        .to_string()
        .contains("unknown brand 'Nobody'"));

    let yaml = "products:\n  - name: A\n    attributes:\n      - name: Size\n        value: XL\n";
    assert!(parse_seed(yaml)
        .unwrap_err()
        .to_string()
        .contains("undeclared attribute 'Size'"));
}

#[test]
fn attribute_names_must_produce_unique_slugs() {
    let yaml = "attributes:\n  - name: Fabric Type\n  - name: fabric  type\n";
    let err = parse_seed(yaml).unwrap_err();
    assert!(err.to_string().contains("duplicate attribute slug: 'fabric-type'"));
}
