//! Finalised answer records.

use crate::domain::email::RespondentEmail;
use crate::domain::poem::PoemId;
use crate::domain::rating::RatingSheet;

/// One respondent's permanent answers for one poem.
///
/// Created only at final submission by copying the corresponding draft;
/// append-only and never mutated. At most one response exists per
/// (email, poem) pair. A respondent with at least a full panel of responses
/// counts as having completed the survey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyResponse {
    /// Owning respondent.
    pub email: RespondentEmail,
    /// Poem these answers rate.
    pub poem_id: PoemId,
    /// Finalised answers.
    pub sheet: RatingSheet,
}

impl SurveyResponse {
    /// Copy a draft's answers into a permanent record.
    pub fn from_draft(draft: &crate::domain::ResponseDraft) -> Self {
        Self {
            email: draft.email.clone(),
            poem_id: draft.poem_id,
            sheet: draft.sheet.clone(),
        }
    }
}
