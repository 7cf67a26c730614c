//! In-progress answer records, pending finalisation.

use crate::domain::email::RespondentEmail;
use crate::domain::poem::PoemId;
use crate::domain::rating::RatingSheet;

/// One respondent's in-progress answers for one poem.
///
/// A batch of [`PANEL_SIZE`](crate::domain::PANEL_SIZE) drafts is created
/// when a slot is assigned; each is then overwritten as its page is
/// submitted, and the whole batch is deleted after final submission.
///
/// ## Invariants
/// - `position` is 1-based and unique per respondent; page N edits the draft
///   at position N;
/// - the set of drafts for an email is either empty, fully unset, partially
///   answered, or deleted in bulk after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDraft {
    /// Owning respondent.
    pub email: RespondentEmail,
    /// Poem this draft answers.
    pub poem_id: PoemId,
    /// 1-based page position within the respondent's panel.
    pub position: u32,
    /// Current answers, possibly unset.
    pub sheet: RatingSheet,
}

impl ResponseDraft {
    /// Build the unanswered placeholder created at assignment time.
    pub fn unanswered(email: RespondentEmail, poem_id: PoemId, position: u32) -> Self {
        Self {
            email,
            poem_id,
            position,
            sheet: RatingSheet::default(),
        }
    }

    /// Whether this draft's page has been submitted at least once.
    pub fn is_answered(&self) -> bool {
        self.sheet.is_answered()
    }
}
