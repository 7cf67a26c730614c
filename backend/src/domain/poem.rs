//! Poem catalog entries.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stable poem identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct PoemId(i32);

impl PoemId {
    /// Wrap a raw catalog identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// The raw identifier value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PoemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable catalog entry rated by respondents.
///
/// Created by external data load or startup seeding; never mutated or
/// deleted by this service. `topic` and `source_type` are descriptive
/// metadata unused by the rating flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Poem {
    /// Stable identifier.
    pub id: PoemId,
    /// Poem text shown to the respondent.
    pub content: String,
    /// Descriptive topic label, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Provenance tag, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
}

impl Poem {
    /// Build a catalog entry.
    pub fn new(id: PoemId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            topic: None,
            source_type: None,
        }
    }

    /// Synthetic display title; the catalog stores no title column.
    pub fn title(&self) -> String {
        format!("Poem #{}", self.id)
    }
}
