//! Error types for the Adforge creative generation engine.
//!
//! This crate provides the foundation error types used throughout the Adforge
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use adforge_error::{AdforgeResult, ProviderError, ProviderErrorKind};
//!
//! fn call_provider() -> AdforgeResult<String> {
//!     Err(ProviderError::new(ProviderErrorKind::Http("Connection refused".to_string())))?
//! }
//!
//! match call_provider() {
//!     Ok(text) => println!("Got: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod pipeline;
mod provider;
mod schema;
mod store;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{AdforgeError, AdforgeErrorKind, AdforgeResult};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use provider::{ProviderError, ProviderErrorKind};
pub use schema::{SchemaError, SchemaErrorKind};
pub use store::{StoreError, StoreErrorKind};
