//! Order-creation workflow (application-level orchestration).
//!
//! The workflow composes the three collaborator contracts (customer lookup,
//! product catalog, order persistence) into the validate-then-mutate
//! sequence that creates an order:
//!
//! ```text
//! CreateOrder
//!   ↓
//! 1. Validate request shape (non-empty lines, positive quantities)
//!   ↓
//! 2. Resolve customer
//!   ↓
//! 3. Resolve all products in one batched lookup (count-mismatch detection)
//!   ↓
//! 4. Check stock against the snapshot, freeze unit prices
//!   ↓
//! 5. Apply all stock decrements in one version-checked batch
//!      (on a stale snapshot: re-read and re-validate, bounded retry)
//!   ↓
//! 6. Persist the order (restock on failure)
//! ```
//!
//! Steps 1–4 are pure validation and produce no side effects. The
//! version-checked batch in step 5 serializes check-then-decrement across
//! concurrent invocations racing on the same products: the loser's write is
//! rejected and it re-reads before deciding again, so stock cannot go
//! negative. Step 6 is made atomic-in-effect with step 5 by a compensating
//! restock when persistence fails.
//!
//! Validation failures are never retried; only version conflicts are, and
//! only [`MAX_STOCK_RETRIES`] times.

use std::collections::HashMap;

use tracing::{debug, error, info, warn};

use shopcore_core::StorageError;
use shopcore_customers::{CustomerId, CustomerRepository};
use shopcore_products::{Product, ProductId, ProductRepository, StockError, StockUpdate};

use crate::error::OrderError;
use crate::order::{NewOrder, Order, OrderLine, OrderRepository};

/// Attempt bound for version-conflicted stock writes.
pub const MAX_STOCK_RETRIES: u32 = 3;

/// One requested line: a product and how many units of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Order-creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrder {
    pub customer_id: CustomerId,
    pub lines: Vec<LineRequest>,
}

/// The order-creation workflow over injected collaborator implementations.
///
/// Generic over its repositories so tests can substitute doubles; the blanket
/// `Arc` impls on the repository traits allow sharing one store between the
/// workflow and assertions.
pub struct OrderWorkflow<C, P, O> {
    customers: C,
    products: P,
    orders: O,
}

impl<C, P, O> OrderWorkflow<C, P, O>
where
    C: CustomerRepository,
    P: ProductRepository,
    O: OrderRepository,
{
    pub fn new(customers: C, products: P, orders: O) -> Self {
        Self {
            customers,
            products,
            orders,
        }
    }

    /// Create an order for a customer from the requested lines.
    ///
    /// On success the order is persisted and every requested product's stock
    /// is reduced by the total quantity requested for it. On any error no
    /// order exists and stock is unchanged.
    pub fn create_order(&self, request: CreateOrder) -> Result<Order, OrderError> {
        if request.lines.is_empty() {
            return Err(OrderError::Validation(
                "order must contain at least one line".to_string(),
            ));
        }
        for line in &request.lines {
            if line.quantity <= 0 {
                return Err(OrderError::Validation(format!(
                    "quantity must be positive (product {}, got {})",
                    line.product_id, line.quantity
                )));
            }
        }

        let customer = self
            .customers
            .find_by_id(request.customer_id)?
            .ok_or(OrderError::CustomerNotFound(request.customer_id))?;

        debug!(
            customer_id = %customer.id,
            lines = request.lines.len(),
            "order requested"
        );

        // Distinct product ids in first-occurrence order; duplicate lines sum
        // their quantities for the stock check and the decrement.
        let mut distinct: Vec<ProductId> = Vec::new();
        let mut totals: HashMap<ProductId, i64> = HashMap::new();
        for line in &request.lines {
            if !distinct.contains(&line.product_id) {
                distinct.push(line.product_id);
            }
            *totals.entry(line.product_id).or_insert(0) += line.quantity;
        }

        let mut attempt = 0;
        loop {
            attempt += 1;

            let resolved = self.products.find_all_by_id(&distinct)?;
            if resolved.len() < distinct.len() {
                return Err(OrderError::ProductNotFound {
                    requested: distinct.len(),
                    resolved: resolved.len(),
                });
            }
            // Re-key by id; the batched lookup's ordering is not part of the
            // contract and positional pairing would misassign lines.
            let by_id: HashMap<ProductId, Product> =
                resolved.into_iter().map(|p| (p.id, p)).collect();

            let mut updates: Vec<StockUpdate> = Vec::with_capacity(distinct.len());
            for product_id in &distinct {
                let product = &by_id[product_id];
                let update = product.reserve(totals[product_id]).map_err(|e| match e {
                    StockError::Insufficient {
                        requested,
                        available,
                    } => OrderError::InsufficientStock {
                        product_id: *product_id,
                        requested,
                        available,
                    },
                    StockError::InvalidQuantity(q) => OrderError::Validation(format!(
                        "quantity must be positive (product {product_id}, got {q})"
                    )),
                })?;
                updates.push(update);
            }

            // Unit prices frozen from the same snapshot the stock check used.
            let lines: Vec<OrderLine> = request
                .lines
                .iter()
                .map(|line| OrderLine {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price: by_id[&line.product_id].price,
                })
                .collect();

            match self.products.update_stock(&updates) {
                Ok(()) => {}
                Err(StorageError::Conflict(msg)) if attempt < MAX_STOCK_RETRIES => {
                    warn!(attempt, "stock snapshot went stale, retrying: {msg}");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            let order = match self.orders.create(NewOrder {
                customer: customer.clone(),
                lines,
            }) {
                Ok(order) => order,
                Err(e) => {
                    error!("order persistence failed after stock decrement, restoring stock: {e}");
                    self.release_reserved(&totals);
                    return Err(e.into());
                }
            };

            info!(
                order_id = %order.id,
                customer_id = %customer.id,
                lines = order.lines.len(),
                "order created"
            );
            return Ok(order);
        }
    }

    /// Compensating action: return reserved quantities to inventory after a
    /// failed order persistence. Best-effort; a restock that keeps
    /// conflicting past the retry bound is abandoned and logged.
    fn release_reserved(&self, totals: &HashMap<ProductId, i64>) {
        for (&product_id, &quantity) in totals {
            let mut attempt = 0;
            loop {
                attempt += 1;

                let product = match self.products.find_all_by_id(&[product_id]) {
                    Ok(mut found) if !found.is_empty() => found.remove(0),
                    Ok(_) => {
                        error!(%product_id, "product missing during restock");
                        break;
                    }
                    Err(e) => {
                        error!(%product_id, "restock lookup failed: {e}");
                        break;
                    }
                };

                let update = match product.restock(quantity) {
                    Ok(update) => update,
                    Err(e) => {
                        error!(%product_id, "restock computation failed: {e}");
                        break;
                    }
                };

                match self.products.update_stock(std::slice::from_ref(&update)) {
                    Ok(()) => {
                        warn!(%product_id, quantity, "stock restored after failed order persistence");
                        break;
                    }
                    Err(StorageError::Conflict(_)) if attempt < MAX_STOCK_RETRIES => continue,
                    Err(e) => {
                        error!(%product_id, "restock failed, stock remains decremented: {e}");
                        break;
                    }
                }
            }
        }
    }
}
