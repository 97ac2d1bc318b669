//! Persistence boundary for the mind-map.
//!
//! [`Gateway`] is the raw backend contract. [`SyncGateway`] wraps a backend
//! with the policies the canvas relies on: create retries once after
//! provisioning a missing container, updates only log failures, deletes
//! report them, and reads degrade to an empty list.

mod error;
mod file;
mod gateway;
mod memory;
mod record;
mod sync;

pub use error::GatewayError;
pub use file::{FileGateway, TodoItem};
pub use gateway::Gateway;
pub use memory::{MemoryGateway, Operation};
pub use record::{CreateNode, NodeRecord, RecordPosition};
pub use sync::SyncGateway;
