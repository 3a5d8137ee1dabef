//! Trait definitions for the Adforge creative generation engine.
//!
//! The generation pipeline consumes its collaborators through these seams:
//! an AI provider ([`CreativeDriver`]), a job progress store ([`JobStore`]),
//! and a read-only supporting-context store ([`ContextStore`]). Concrete
//! bindings live in `adforge_providers` and `adforge_store`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{ContextStore, CreativeDriver, JobStore};
pub use types::{ContextDocument, ContextKind};
