use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopcore_core::{Entity, EntityId, StorageError};

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub EntityId);

impl ProductId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Catalog record for a product.
///
/// `version` is the storage version, bumped by the repository on every
/// mutation; stock writers carry it back so stale snapshots are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Unique across the catalog.
    pub name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    /// Units in inventory. Never negative.
    pub stock: i64,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Data required to register a new product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub stock: i64,
}

/// A version-checked stock write for one product.
///
/// `expected_version` is the version of the snapshot the new stock level was
/// computed from; the repository rejects the write if the record has moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub product_id: ProductId,
    pub expected_version: u64,
    pub new_stock: i64,
}

/// Stock arithmetic failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    /// The quantity is not a positive integer.
    #[error("quantity must be positive (got {0})")]
    InvalidQuantity(i64),

    /// The requested quantity exceeds what is in inventory.
    #[error("insufficient stock: requested {requested}, available {available}")]
    Insufficient { requested: i64, available: i64 },
}

impl Product {
    /// Compute the stock write that reserves `quantity` units.
    ///
    /// Pure: nothing is applied until the returned [`StockUpdate`] goes
    /// through [`ProductRepository::update_stock`]. The resulting stock level
    /// is never negative.
    pub fn reserve(&self, quantity: i64) -> Result<StockUpdate, StockError> {
        if quantity <= 0 {
            return Err(StockError::InvalidQuantity(quantity));
        }
        if quantity > self.stock {
            return Err(StockError::Insufficient {
                requested: quantity,
                available: self.stock,
            });
        }
        Ok(StockUpdate {
            product_id: self.id,
            expected_version: self.version,
            new_stock: self.stock - quantity,
        })
    }

    /// Compute the stock write that returns `quantity` units to inventory.
    ///
    /// Counterpart of [`Product::reserve`], used to compensate a reservation
    /// whose order never got persisted.
    pub fn restock(&self, quantity: i64) -> Result<StockUpdate, StockError> {
        if quantity <= 0 {
            return Err(StockError::InvalidQuantity(quantity));
        }
        Ok(StockUpdate {
            product_id: self.id,
            expected_version: self.version,
            new_stock: self.stock + quantity,
        })
    }
}

/// Product catalog collaborator contract.
pub trait ProductRepository: Send + Sync {
    fn create(&self, product: NewProduct) -> Result<Product, StorageError>;

    fn find_by_name(&self, name: &str) -> Result<Option<Product>, StorageError>;

    /// Batched resolution. Unknown ids are skipped, so the result can be
    /// shorter than `ids`; callers detect that by comparing counts and must
    /// re-key the result by id rather than relying on position.
    fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>, StorageError>;

    /// Apply a batch of version-checked stock writes.
    ///
    /// All-or-nothing: if any product's version moved since the snapshot the
    /// updates were computed from, the whole batch fails with
    /// [`StorageError::Conflict`] and no stock changes.
    fn update_stock(&self, updates: &[StockUpdate]) -> Result<(), StorageError>;
}

impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    fn create(&self, product: NewProduct) -> Result<Product, StorageError> {
        (**self).create(product)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Product>, StorageError> {
        (**self).find_by_name(name)
    }

    fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>, StorageError> {
        (**self).find_all_by_id(ids)
    }

    fn update_stock(&self, updates: &[StockUpdate]) -> Result<(), StorageError> {
        (**self).update_stock(updates)
    }
}
