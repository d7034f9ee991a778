// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Product repository.
//!
//! Products store only their category id; [`ProductRepository::resolve`]
//! joins the category back in for API responses.

use serde::{Deserialize, Serialize};

use super::super::{JsonStorage, StorageError, StorageResult};
use super::categories::CategoryRepository;
use crate::models::{Product, ProductFields};

/// Product as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredProduct {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub photo: String,
    pub category_id: i64,
}

impl StoredProduct {
    fn from_fields(id: i64, fields: ProductFields) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            photo: fields.photo,
            category_id: fields.category_id,
        }
    }
}

/// Repository for product operations.
pub struct ProductRepository<'a> {
    storage: &'a JsonStorage,
}

impl<'a> ProductRepository<'a> {
    pub fn new(storage: &'a JsonStorage) -> Self {
        Self { storage }
    }

    pub fn exists(&self, product_id: i64) -> bool {
        self.storage
            .exists(self.storage.paths().product(product_id))
    }

    pub fn get(&self, product_id: i64) -> StorageResult<StoredProduct> {
        if !self.exists(product_id) {
            return Err(StorageError::NotFound(format!("Product {product_id}")));
        }
        self.storage
            .read_json(self.storage.paths().product(product_id))
    }

    pub fn list_all(&self) -> StorageResult<Vec<StoredProduct>> {
        self.storage.read_all(self.storage.paths().products_dir())
    }

    /// Products whose description contains `fragment`, ignoring case.
    pub fn search_by_description(&self, fragment: &str) -> StorageResult<Vec<StoredProduct>> {
        let needle = fragment.to_lowercase();
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|product| product.description.to_lowercase().contains(&needle))
            .collect())
    }

    /// Create a product. The caller checks that the category exists.
    pub fn create(&self, fields: ProductFields) -> StorageResult<StoredProduct> {
        let id = self.storage.next_id(self.storage.paths().products_dir())?;
        let product = StoredProduct::from_fields(id, fields);
        self.storage
            .write_json(self.storage.paths().product(id), &product)?;
        Ok(product)
    }

    pub fn update(&self, product_id: i64, fields: ProductFields) -> StorageResult<StoredProduct> {
        if !self.exists(product_id) {
            return Err(StorageError::NotFound(format!("Product {product_id}")));
        }
        let product = StoredProduct::from_fields(product_id, fields);
        self.storage
            .write_json(self.storage.paths().product(product_id), &product)?;
        Ok(product)
    }

    pub fn delete(&self, product_id: i64) -> StorageResult<()> {
        if !self.exists(product_id) {
            return Err(StorageError::NotFound(format!("Product {product_id}")));
        }
        self.storage
            .delete(self.storage.paths().product(product_id))
    }

    /// Attach the product's category for presentation.
    pub fn resolve(&self, product: StoredProduct) -> Product {
        let category = CategoryRepository::new(self.storage)
            .get(product.category_id)
            .ok();
        Product {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            photo: product.photo,
            category,
        }
    }

    pub fn resolve_all(&self, products: Vec<StoredProduct>) -> Vec<Product> {
        products.into_iter().map(|p| self.resolve(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    fn test_storage() -> (JsonStorage, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut storage = JsonStorage::new(StoragePaths::new(temp_dir.path()));
        storage.initialize().expect("Failed to initialize");
        (storage, temp_dir)
    }

    fn fields(description: &str, category_id: i64) -> ProductFields {
        ProductFields {
            name: "Ibuprofen".to_string(),
            description: description.to_string(),
            price: 9.9,
            photo: "https://img.example/ibu.png".to_string(),
            category_id,
        }
    }

    #[test]
    fn create_and_resolve_with_category() {
        let (storage, _dir) = test_storage();
        let category = CategoryRepository::new(&storage)
            .create("Anti-inflammatories".to_string())
            .unwrap();
        let repo = ProductRepository::new(&storage);

        let stored = repo.create(fields("400mg tablets", category.id)).unwrap();
        let product = repo.resolve(repo.get(stored.id).unwrap());

        assert_eq!(product.name, "Ibuprofen");
        assert_eq!(product.category, Some(category));
    }

    #[test]
    fn resolve_tolerates_missing_category() {
        let (storage, _dir) = test_storage();
        let repo = ProductRepository::new(&storage);
        let stored = repo.create(fields("orphan", 99)).unwrap();

        assert_eq!(repo.resolve(stored).category, None);
    }

    #[test]
    fn search_matches_description_case_insensitively() {
        let (storage, _dir) = test_storage();
        let repo = ProductRepository::new(&storage);
        repo.create(fields("Oral SUSPENSION 100ml", 1)).unwrap();
        repo.create(fields("Tablets", 1)).unwrap();

        let found = repo.search_by_description("suspension").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description, "Oral SUSPENSION 100ml");
    }

    #[test]
    fn update_and_delete_unknown_product() {
        let (storage, _dir) = test_storage();
        let repo = ProductRepository::new(&storage);

        assert!(matches!(
            repo.update(3, fields("x", 1)),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(repo.delete(3), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn update_replaces_fields() {
        let (storage, _dir) = test_storage();
        let repo = ProductRepository::new(&storage);
        let stored = repo.create(fields("old", 1)).unwrap();

        let updated = repo.update(stored.id, fields("new", 2)).unwrap();
        assert_eq!(updated.id, stored.id);
        assert_eq!(repo.get(stored.id).unwrap().description, "new");
        assert_eq!(repo.get(stored.id).unwrap().category_id, 2);
    }
}
