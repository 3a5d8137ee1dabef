//! Context document cache for the Adforge creative generation engine.
//!
//! Supporting context (strategy blueprints, reference ads) changes rarely but
//! is read on every evaluation prompt. This crate provides an explicitly
//! owned, injected cache component with a defined TTL and LRU eviction —
//! scoped to the process lifetime, never a bare module-global map.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;

pub use cache::{CacheEntry, ContextCache, ContextCacheConfig, ContextCacheConfigBuilder};
