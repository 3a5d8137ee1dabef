//! Shared types for the trait seams.

use serde::{Deserialize, Serialize};

/// What kind of supporting context a document carries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContextKind {
    /// A strategy blueprint for the brand or campaign
    Strategy,
    /// A reference ad used as a style/quality anchor
    ReferenceAd,
}

/// A supporting context document fed into prompt construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDocument {
    /// Document identifier
    pub id: String,
    /// What kind of context this is
    pub kind: ContextKind,
    /// Short title
    pub title: String,
    /// Document body included verbatim in prompts
    pub body: String,
}

impl ContextDocument {
    /// Create a document.
    pub fn new(
        id: impl Into<String>,
        kind: ContextKind,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            body: body.into(),
        }
    }
}
