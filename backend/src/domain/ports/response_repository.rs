//! Port abstraction for finalised answer storage.

use async_trait::async_trait;

use crate::domain::{PoemId, RespondentEmail, SurveyResponse};

use super::RepositoryError;

/// Append-only access to finalised responses.
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Number of finalised responses for a respondent.
    async fn count_for_email(&self, email: &RespondentEmail) -> Result<u64, RepositoryError>;

    /// Whether a response already exists for this (email, poem) pair.
    async fn exists(
        &self,
        email: &RespondentEmail,
        poem_id: PoemId,
    ) -> Result<bool, RepositoryError>;

    /// Append a finalised response.
    async fn append(&self, response: &SurveyResponse) -> Result<(), RepositoryError>;
}
