// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Category repository. One JSON file per category under `categories/`.

use super::super::{JsonStorage, StorageError, StorageResult};
use super::products::StoredProduct;
use crate::models::Category;

/// Repository for category operations.
pub struct CategoryRepository<'a> {
    storage: &'a JsonStorage,
}

impl<'a> CategoryRepository<'a> {
    pub fn new(storage: &'a JsonStorage) -> Self {
        Self { storage }
    }

    pub fn exists(&self, category_id: i64) -> bool {
        self.storage
            .exists(self.storage.paths().category(category_id))
    }

    pub fn get(&self, category_id: i64) -> StorageResult<Category> {
        if !self.exists(category_id) {
            return Err(StorageError::NotFound(format!("Category {category_id}")));
        }
        self.storage
            .read_json(self.storage.paths().category(category_id))
    }

    pub fn list_all(&self) -> StorageResult<Vec<Category>> {
        self.storage.read_all(self.storage.paths().categories_dir())
    }

    /// Categories whose description contains `fragment`, ignoring case.
    pub fn search_by_description(&self, fragment: &str) -> StorageResult<Vec<Category>> {
        let needle = fragment.to_lowercase();
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|category| category.description.to_lowercase().contains(&needle))
            .collect())
    }

    pub fn create(&self, description: String) -> StorageResult<Category> {
        let category = Category {
            id: self
                .storage
                .next_id(self.storage.paths().categories_dir())?,
            description,
        };
        self.storage
            .write_json(self.storage.paths().category(category.id), &category)?;
        Ok(category)
    }

    pub fn update(&self, category: &Category) -> StorageResult<()> {
        if !self.exists(category.id) {
            return Err(StorageError::NotFound(format!("Category {}", category.id)));
        }
        self.storage
            .write_json(self.storage.paths().category(category.id), category)
    }

    /// Delete a category that no product references.
    pub fn delete(&self, category_id: i64) -> StorageResult<()> {
        if !self.exists(category_id) {
            return Err(StorageError::NotFound(format!("Category {category_id}")));
        }

        let products: Vec<StoredProduct> =
            self.storage.read_all(self.storage.paths().products_dir())?;
        if products.iter().any(|p| p.category_id == category_id) {
            return Err(StorageError::InUse(format!("Category {category_id}")));
        }

        self.storage
            .delete(self.storage.paths().category(category_id))
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

    #[test]
    fn create_get_and_list() {
        let (storage, _dir) = test_storage();
        let repo = CategoryRepository::new(&storage);

        let analgesics = repo.create("Analgesics".to_string()).unwrap();
        let vitamins = repo.create("Vitamins".to_string()).unwrap();

        assert_eq!(repo.get(analgesics.id).unwrap(), analgesics);
        assert_eq!(repo.list_all().unwrap(), vec![analgesics, vitamins]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let (storage, _dir) = test_storage();
        let repo = CategoryRepository::new(&storage);
        repo.create("Antibiotics".to_string()).unwrap();
        repo.create("Antiallergics".to_string()).unwrap();
        repo.create("Vitamins".to_string()).unwrap();

        let found = repo.search_by_description("ANTI").unwrap();
        assert_eq!(found.len(), 2);
        assert!(repo.search_by_description("syrup").unwrap().is_empty());
    }

    #[test]
    fn update_missing_is_not_found() {
        let (storage, _dir) = test_storage();
        let repo = CategoryRepository::new(&storage);
        let result = repo.update(&Category {
            id: 5,
            description: "Ghost".to_string(),
        });
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn delete_refuses_referenced_category() {
        let (storage, _dir) = test_storage();
        let repo = CategoryRepository::new(&storage);
        let category = repo.create("Analgesics".to_string()).unwrap();

        storage
            .write_json(
                storage.paths().product(1),
                &StoredProduct {
                    id: 1,
                    name: "Aspirin".to_string(),
                    description: "500mg".to_string(),
                    price: 4.0,
                    photo: "p".to_string(),
                    category_id: category.id,
                },
            )
            .unwrap();

        assert!(matches!(repo.delete(category.id), Err(StorageError::InUse(_))));

        storage.delete(storage.paths().product(1)).unwrap();
        repo.delete(category.id).unwrap();
        assert!(!repo.exists(category.id));
    }
}
