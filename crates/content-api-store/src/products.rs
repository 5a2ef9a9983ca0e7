use content_api_core::sanitize::sanitize_title;
use content_api_core::{ObjectId, Product, ProductLookup, ProductStore, StoreError};

use crate::ContentStore;

impl ContentStore {
    fn sku_owner(&self, sku: &str) -> Option<ObjectId> {
        if sku.is_empty() {
            return None;
        }
        self.products.values().find(|p| p.sku == sku).map(|p| p.id)
    }
}

impl ProductStore for ContentStore {
    fn get_product(&self, lookup: ProductLookup<'_>) -> Option<Product> {
        match lookup {
            ProductLookup::Id(id) => self.products.get(&id).cloned(),
            ProductLookup::Sku(sku) => self
                .sku_owner(sku)
                .and_then(|id| self.products.get(&id).cloned()),
        }
    }

    fn insert_product(&mut self, mut product: Product) -> Result<ObjectId, StoreError> {
        if self.sku_owner(&product.sku).is_some() {
            return Err(StoreError::DuplicateSku(product.sku));
        }
        let id = self.allocate_object_id();
        let base = if product.slug.is_empty() {
            sanitize_title(&product.name)
        } else {
            sanitize_title(&product.slug)
        };
        product.slug = self.unique_object_slug(&base, Some(id));
        product.id = id;
        self.products.insert(id, product);
        Ok(id)
    }

    fn save_product(&mut self, product: Product) -> Result<ObjectId, StoreError> {
        if !self.products.contains_key(&product.id) {
            return Err(StoreError::ObjectNotFound(product.id));
        }
        if self
            .sku_owner(&product.sku)
            .is_some_and(|owner| owner != product.id)
        {
            return Err(StoreError::DuplicateSku(product.sku));
        }
        let id = product.id;
        self.products.insert(id, product);
        Ok(id)
    }

    fn list_products(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }

    fn products_missing_description(&self, limit: usize) -> Vec<ObjectId> {
        self.products
            .values()
            .filter(|p| p.description.trim().is_empty())
            .map(|p| p.id)
            .take(limit)
            .collect()
    }

    fn slug_owner(&self, slug: &str) -> Option<ObjectId> {
        self.object_slug_owner(slug)
    }
}
