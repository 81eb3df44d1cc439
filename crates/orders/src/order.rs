use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopcore_core::{Entity, EntityId, StorageError};
use shopcore_customers::Customer;
use shopcore_products::ProductId;

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub EntityId);

impl OrderId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order line: product reference, quantity, unit price.
///
/// `unit_price` is the product's price at the moment of purchase; a later
/// catalog price change never alters a persisted line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
}

/// Persisted order aggregate.
///
/// Carries a snapshot of the customer it was placed for and an ordered,
/// non-empty line list. Created exactly once per successful workflow run;
/// there is no update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    pub lines: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Data handed to the repository to persist a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer: Customer,
    pub lines: Vec<OrderLine>,
}

/// Order persistence collaborator contract.
pub trait OrderRepository: Send + Sync {
    /// Persist a new order, assigning its identifier and timestamps.
    fn create(&self, order: NewOrder) -> Result<Order, StorageError>;
}

impl<R> OrderRepository for Arc<R>
where
    R: OrderRepository + ?Sized,
{
    fn create(&self, order: NewOrder) -> Result<Order, StorageError> {
        (**self).create(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopcore_customers::CustomerId;

    fn test_order() -> Order {
        let now = Utc::now();
        Order {
            id: OrderId::new(EntityId::new()),
            customer: Customer {
                id: CustomerId::new(EntityId::new()),
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                created_at: now,
                updated_at: now,
            },
            lines: vec![OrderLine {
                product_id: ProductId::new(EntityId::new()),
                quantity: 3,
                unit_price: 1000,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn entity_id_accessor_returns_order_id() {
        let order = test_order();
        assert_eq!(Entity::id(&order), &order.id);
    }

    #[test]
    fn serializes_the_external_aggregate_shape() {
        let order = test_order();
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["id"], serde_json::json!(order.id.to_string()));
        assert_eq!(json["customer"]["name"], serde_json::json!("Ada Lovelace"));
        assert_eq!(json["lines"][0]["quantity"], serde_json::json!(3));
        assert_eq!(json["lines"][0]["unit_price"], serde_json::json!(1000));
        assert_eq!(
            json["lines"][0]["product_id"],
            serde_json::json!(order.lines[0].product_id.to_string())
        );
        assert!(json.get("created_at").is_some());
        assert!(json.get("updated_at").is_some());
    }
}
