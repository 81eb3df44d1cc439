//! `shopcore-orders` — the order aggregate and the order-creation workflow.

pub mod error;
pub mod order;
pub mod workflow;

pub use error::OrderError;
pub use order::{NewOrder, Order, OrderId, OrderLine, OrderRepository};
pub use workflow::{CreateOrder, LineRequest, OrderWorkflow};
