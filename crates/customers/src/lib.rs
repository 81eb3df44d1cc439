//! `shopcore-customers` — customer identity and the lookup contract.

pub mod customer;

pub use customer::{Customer, CustomerId, CustomerRepository, NewCustomer};
