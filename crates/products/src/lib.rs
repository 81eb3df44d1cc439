//! `shopcore-products` — the product catalog: records, stock reservation,
//! and the catalog collaborator contract.

pub mod catalog;
pub mod product;

pub use catalog::{Catalog, CatalogError};
pub use product::{NewProduct, Product, ProductId, ProductRepository, StockError, StockUpdate};
