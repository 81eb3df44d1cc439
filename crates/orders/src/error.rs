//! Order-creation error taxonomy.

use thiserror::Error;

use shopcore_core::StorageError;
use shopcore_customers::CustomerId;
use shopcore_products::ProductId;

/// Why an order could not be created.
///
/// A closed set callers can branch on; every variant carries the context a
/// transport layer needs to build a response without string-matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The requested customer id does not resolve.
    #[error("customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// One or more requested product ids do not resolve.
    ///
    /// Detected by count mismatch, not per-id diffing: callers get no partial
    /// success and no list of which ids were unknown.
    #[error("product not found: {resolved} of {requested} requested products resolved")]
    ProductNotFound { requested: usize, resolved: usize },

    /// A requested quantity exceeds the product's current stock.
    #[error(
        "insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The request failed shape validation (empty line list, non-positive
    /// quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A collaborator failed, including version conflicts that survived the
    /// bounded retry.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopcore_core::EntityId;

    #[test]
    fn insufficient_stock_reports_the_offender() {
        let product_id = ProductId::new(EntityId::new());
        let err = OrderError::InsufficientStock {
            product_id,
            requested: 6,
            available: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains(&product_id.to_string()));
        assert!(msg.contains("requested 6"));
        assert!(msg.contains("available 5"));
    }

    #[test]
    fn kinds_are_distinguishable_without_messages() {
        let err: OrderError = StorageError::Conflict("stale".to_string()).into();
        assert!(matches!(err, OrderError::Storage(StorageError::Conflict(_))));

        let err = OrderError::ProductNotFound {
            requested: 2,
            resolved: 1,
        };
        assert!(matches!(err, OrderError::ProductNotFound { .. }));
    }
}
