use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopcore_core::{Entity, EntityId, StorageError};

/// Customer identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub EntityId);

impl CustomerId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Customer record.
///
/// Owned by the lookup collaborator; this core never mutates customers, it
/// only resolves them and snapshots them onto orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Data required to register a new customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
}

/// Customer lookup collaborator contract.
///
/// `find_by_id` is all the order workflow needs; `create` exists so stores
/// can be seeded without reaching around the contract.
pub trait CustomerRepository: Send + Sync {
    fn create(&self, customer: NewCustomer) -> Result<Customer, StorageError>;

    fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StorageError>;
}

impl<R> CustomerRepository for Arc<R>
where
    R: CustomerRepository + ?Sized,
{
    fn create(&self, customer: NewCustomer) -> Result<Customer, StorageError> {
        (**self).create(customer)
    }

    fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StorageError> {
        (**self).find_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_id_displays_as_inner_uuid() {
        let id = EntityId::new();
        assert_eq!(CustomerId::new(id).to_string(), id.to_string());
    }

    #[test]
    fn entity_id_accessor_returns_customer_id() {
        let customer = Customer {
            id: CustomerId::new(EntityId::new()),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(Entity::id(&customer), &customer.id);
    }
}
