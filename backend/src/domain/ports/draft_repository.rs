//! Port abstraction for in-progress answer storage.

use async_trait::async_trait;

use crate::domain::{RatingSheet, RespondentEmail, ResponseDraft};

use super::RepositoryError;

/// Access to a respondent's draft answers.
#[async_trait]
pub trait DraftRepository: Send + Sync {
    /// All drafts for a respondent, ordered by panel position.
    async fn list_for_email(
        &self,
        email: &RespondentEmail,
    ) -> Result<Vec<ResponseDraft>, RepositoryError>;

    /// Materialise the placeholder batch created at assignment time.
    async fn insert_batch(&self, drafts: &[ResponseDraft]) -> Result<(), RepositoryError>;

    /// Overwrite the answer sheet of the draft at the given position.
    async fn update_sheet(
        &self,
        email: &RespondentEmail,
        position: u32,
        sheet: &RatingSheet,
    ) -> Result<(), RepositoryError>;

    /// Delete every draft belonging to the respondent.
    async fn delete_for_email(&self, email: &RespondentEmail) -> Result<(), RepositoryError>;
}
