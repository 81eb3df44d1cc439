//! Catalog application service: product registration.

use thiserror::Error;

use shopcore_core::StorageError;

use crate::product::{NewProduct, Product, ProductRepository};

/// Product registration failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The product data failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A product with this name already exists in the catalog.
    #[error("product already exists: {0}")]
    DuplicateName(String),

    /// The catalog store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Catalog service over an injected product repository.
///
/// Product names are unique across the catalog; registration enforces that
/// with a lookup-then-create against the repository.
pub struct Catalog<P> {
    products: P,
}

impl<P> Catalog<P>
where
    P: ProductRepository,
{
    pub fn new(products: P) -> Self {
        Self { products }
    }

    pub fn create_product(&self, product: NewProduct) -> Result<Product, CatalogError> {
        if product.name.trim().is_empty() {
            return Err(CatalogError::Validation("name cannot be empty".to_string()));
        }
        if product.stock < 0 {
            return Err(CatalogError::Validation(
                "stock cannot be negative".to_string(),
            ));
        }

        if self.products.find_by_name(&product.name)?.is_some() {
            return Err(CatalogError::DuplicateName(product.name));
        }

        Ok(self.products.create(product)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use shopcore_core::EntityId;

    use super::*;
    use crate::product::{ProductId, StockUpdate};

    /// Minimal test double; the real in-memory store lives in `shopcore-infra`.
    #[derive(Default)]
    struct StubProducts {
        rows: Mutex<Vec<Product>>,
    }

    impl ProductRepository for StubProducts {
        fn create(&self, product: NewProduct) -> Result<Product, StorageError> {
            let row = Product {
                id: ProductId::new(EntityId::new()),
                name: product.name,
                price: product.price,
                stock: product.stock,
                version: 1,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.rows.lock().unwrap().push(row.clone());
            Ok(row)
        }

        fn find_by_name(&self, name: &str) -> Result<Option<Product>, StorageError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.name == name)
                .cloned())
        }

        fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>, StorageError> {
            let rows = self.rows.lock().unwrap();
            Ok(ids
                .iter()
                .filter_map(|id| rows.iter().find(|p| p.id == *id).cloned())
                .collect())
        }

        fn update_stock(&self, _updates: &[StockUpdate]) -> Result<(), StorageError> {
            unimplemented!("not exercised by catalog tests")
        }
    }

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: 1000,
            stock: 5,
        }
    }

    #[test]
    fn registers_a_product() {
        let catalog = Catalog::new(StubProducts::default());
        let product = catalog.create_product(new_product("Keyboard")).unwrap();
        assert_eq!(product.name, "Keyboard");
        assert_eq!(product.stock, 5);
        assert_eq!(product.version, 1);
    }

    #[test]
    fn rejects_duplicate_names() {
        let catalog = Catalog::new(StubProducts::default());
        catalog.create_product(new_product("Keyboard")).unwrap();

        let err = catalog.create_product(new_product("Keyboard")).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateName("Keyboard".to_string()));
    }

    #[test]
    fn rejects_blank_names() {
        let catalog = Catalog::new(StubProducts::default());
        let err = catalog.create_product(new_product("   ")).unwrap_err();
        match err {
            CatalogError::Validation(msg) => assert!(msg.contains("name")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_stock() {
        let catalog = Catalog::new(StubProducts::default());
        let mut product = new_product("Keyboard");
        product.stock = -1;
        assert!(matches!(
            catalog.create_product(product),
            Err(CatalogError::Validation(_))
        ));
    }
}
