//! `shopcore-infra` — repository implementations and the end-to-end test
//! surface for the order-processing core.

pub mod in_memory;


pub use in_memory::{
    InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryProductRepository,
};
