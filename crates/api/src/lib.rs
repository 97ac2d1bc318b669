//! Mind-map session and command interface.
//!
//! [`MindMap`] ties the canvas, the layout engine and a persistence gateway
//! together: local edits apply immediately and are persisted in the
//! background, with created nodes swapping their temporary id for the
//! backend's once it answers.
//!
//! Commands and queries are serializable so sessions can be scripted:
//! ```ignore
//! use api::{Command, execute_command};
//!
//! let cmd = Command::AddChild {
//!     parent: Some(root_id),
//!     label: "Groceries".into(),
//!     description: None,
//! };
//! let result = execute_command(&mut map, cmd).await;
//! ```

mod command;
mod completion;
mod executor;
mod query;
mod session;
mod writer;

pub use command::*;
pub use completion::CompletionTracker;
pub use executor::{execute_command, execute_query};
pub use query::*;
pub use session::{AddChildError, MindMap, PendingCreate, SessionAlert};
