//! In-memory job and context stores for the Adforge creative generation engine.
//!
//! These are the concrete [`adforge_interface::JobStore`] and
//! [`adforge_interface::ContextStore`] bindings used by tests and the server.
//! Each generation request owns its own job record, so a `RwLock<HashMap>`
//! is sufficient — there is no cross-request contention beyond the map itself.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;

pub use memory::{MemoryContextStore, MemoryJobStore};
