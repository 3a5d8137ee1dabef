//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, PipelineError, ProviderError, SchemaError, StoreError};

/// This is the foundation error enum. Every error family in the Adforge
/// workspace folds into it.
///
/// # Examples
///
/// ```
/// use adforge_error::{AdforgeError, ProviderError, ProviderErrorKind};
///
/// let provider_err = ProviderError::new(ProviderErrorKind::Http("Connection failed".to_string()));
/// let err: AdforgeError = provider_err.into();
/// assert!(format!("{}", err).contains("HTTP error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AdforgeErrorKind {
    /// AI provider error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Schema validation error
    #[from(SchemaError)]
    Schema(SchemaError),
    /// Generation pipeline error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// Job/context store error
    #[from(StoreError)]
    Store(StoreError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// Adforge error with kind discrimination.
///
/// # Examples
///
/// ```
/// use adforge_error::{AdforgeResult, ConfigError};
///
/// fn might_fail() -> AdforgeResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Adforge Error: {}", _0)]
pub struct AdforgeError(Box<AdforgeErrorKind>);

impl AdforgeError {
    /// Create a new error from a kind.
    pub fn new(kind: AdforgeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AdforgeErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to AdforgeErrorKind
impl<T> From<T> for AdforgeError
where
    T: Into<AdforgeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Adforge operations.
///
/// # Examples
///
/// ```
/// use adforge_error::{AdforgeResult, StoreError, StoreErrorKind};
///
/// fn fetch_job() -> AdforgeResult<String> {
///     Err(StoreError::new(StoreErrorKind::NotFound("job".to_string())))?
/// }
/// ```
pub type AdforgeResult<T> = std::result::Result<T, AdforgeError>;
