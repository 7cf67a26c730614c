//! Ports between the domain and its adapters.
//!
//! Repository ports are *driven*: outbound adapters (Diesel, in-memory)
//! implement them. [`SurveyFlow`] is the *driving* port: inbound adapters
//! call it without knowing the backing infrastructure, which keeps HTTP
//! handler tests deterministic.

pub mod draft_repository;
pub mod poem_repository;
pub mod response_repository;
pub mod slot_repository;
pub mod survey_flow;

pub use draft_repository::DraftRepository;
pub use poem_repository::PoemRepository;
pub use response_repository::ResponseRepository;
pub use slot_repository::SlotRepository;
pub use survey_flow::{EntryDecision, PageLookup, SubmitOutcome, SurveyFlow, SurveyPage};

/// Persistence errors raised by repository adapters.
///
/// All four stores share one failure shape: either the backing store could
/// not be reached, or a query/mutation failed once connected. Adapters map
/// their native errors into these variants; services decide how each maps to
/// a user-visible [`Error`](crate::domain::Error).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// Store connection could not be established or checked out.
    #[error("store connection failed: {message}")]
    Connection {
        /// Adapter-provided diagnostic.
        message: String,
    },

    /// Query or mutation failed during execution.
    #[error("store query failed: {message}")]
    Query {
        /// Adapter-provided diagnostic.
        message: String,
    },
}

impl RepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_accept_str() {
        assert_eq!(
            RepositoryError::connection("refused").to_string(),
            "store connection failed: refused"
        );
        assert_eq!(
            RepositoryError::query("bad row").to_string(),
            "store query failed: bad row"
        );
    }
}
