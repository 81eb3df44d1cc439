//! In-memory repositories.
//!
//! Intended for tests/dev. Not optimized for performance. Each store keeps
//! its rows behind a single `RwLock`; the product store validates and applies
//! stock batches all-or-nothing inside one write-lock acquisition.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use shopcore_core::{EntityId, ExpectedVersion, StorageError};
use shopcore_customers::{Customer, CustomerId, CustomerRepository, NewCustomer};
use shopcore_orders::{NewOrder, Order, OrderId, OrderRepository};
use shopcore_products::{NewProduct, Product, ProductId, ProductRepository, StockUpdate};

fn poisoned() -> StorageError {
    StorageError::Backend("lock poisoned".to_string())
}

/// In-memory customer store.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    rows: RwLock<HashMap<CustomerId, Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CustomerRepository for InMemoryCustomerRepository {
    fn create(&self, customer: NewCustomer) -> Result<Customer, StorageError> {
        let now = Utc::now();
        let row = Customer {
            id: CustomerId::new(EntityId::new()),
            name: customer.name,
            email: customer.email,
            created_at: now,
            updated_at: now,
        };

        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.insert(row.id, row.clone());
        Ok(row)
    }

    fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StorageError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(&id).cloned())
    }
}

/// In-memory product store with version-checked stock writes.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    rows: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reprice a product (catalog maintenance; not part of the collaborator
    /// contract the order workflow sees).
    pub fn set_price(&self, id: ProductId, price: u64) -> Result<(), StorageError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| StorageError::Invalid(format!("unknown product {id}")))?;
        row.price = price;
        row.version += 1;
        row.updated_at = Utc::now();
        Ok(())
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn create(&self, product: NewProduct) -> Result<Product, StorageError> {
        if product.stock < 0 {
            return Err(StorageError::Invalid(format!(
                "stock cannot be negative (got {})",
                product.stock
            )));
        }

        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        if rows.values().any(|p| p.name == product.name) {
            return Err(StorageError::Invalid(format!(
                "duplicate product name: {}",
                product.name
            )));
        }

        let now = Utc::now();
        let row = Product {
            id: ProductId::new(EntityId::new()),
            name: product.name,
            price: product.price,
            stock: product.stock,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        rows.insert(row.id, row.clone());
        Ok(row)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Product>, StorageError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.values().find(|p| p.name == name).cloned())
    }

    fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>, StorageError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
    }

    fn update_stock(&self, updates: &[StockUpdate]) -> Result<(), StorageError> {
        if updates.is_empty() {
            return Ok(());
        }

        let mut rows = self.rows.write().map_err(|_| poisoned())?;

        // Validate the whole batch before touching anything: all-or-nothing.
        for update in updates {
            let row = rows.get(&update.product_id).ok_or_else(|| {
                StorageError::Invalid(format!("unknown product {}", update.product_id))
            })?;
            ExpectedVersion::Exact(update.expected_version)
                .check(row.version)
                .map_err(|e| {
                    StorageError::Conflict(format!("product {}: {e}", update.product_id))
                })?;
            if update.new_stock < 0 {
                return Err(StorageError::Invalid(format!(
                    "stock cannot go negative (product {}, got {})",
                    update.product_id, update.new_stock
                )));
            }
        }

        let now = Utc::now();
        for update in updates {
            if let Some(row) = rows.get_mut(&update.product_id) {
                row.stock = update.new_stock;
                row.version += 1;
                row.updated_at = now;
            }
        }

        Ok(())
    }
}

/// In-memory order store.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    rows: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn find_by_id(&self, id: OrderId) -> Option<Order> {
        self.rows.read().ok().and_then(|rows| rows.get(&id).cloned())
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Order, StorageError> {
        let now = Utc::now();
        let row = Order {
            id: OrderId::new(EntityId::new()),
            customer: order.customer,
            lines: order.lines,
            created_at: now,
            updated_at: now,
        };

        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.insert(row.id, row.clone());
        Ok(row)
    }
}
