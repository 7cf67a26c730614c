//! Driving port for the survey flow use-cases.
//!
//! Inbound adapters call this to run the entry decision and the per-page
//! handler without importing the backing stores, so HTTP handler tests can
//! substitute a test double.

use async_trait::async_trait;

use crate::domain::{Error, Poem, RatingSheet, RespondentEmail};

/// Outcome of the entry decision for a respondent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryDecision {
    /// The respondent has already submitted a full panel.
    Completed,
    /// Drafts exist; continue at the given 1-based page.
    Resume {
        /// First unanswered page.
        page: u32,
    },
    /// A fresh panel was assigned; start at page 1.
    Started,
}

/// Content rendered for one survey page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyPage {
    /// 1-based page number.
    pub page: u32,
    /// Total pages in the respondent's panel.
    pub total: u32,
    /// Poem rated on this page.
    pub poem: Poem,
    /// Current (possibly unset) answers for this page.
    pub sheet: RatingSheet,
}

/// Outcome of resolving a page for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLookup {
    /// The page resolved to a draft.
    Page(Box<SurveyPage>),
    /// Drafts are gone but the respondent already submitted; show completion.
    Completed,
    /// State is inconsistent with the request (no drafts, page out of
    /// range); re-run the entry decision.
    Reassess,
}

/// Outcome of persisting a page submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Answers stored; continue at the given page.
    Advance {
        /// Next 1-based page.
        next_page: u32,
    },
    /// Final page stored and the panel finalised; show completion.
    Finished,
    /// Drafts are gone but the respondent already submitted; show completion.
    Completed,
    /// State is inconsistent with the request; re-run the entry decision.
    Reassess,
}

/// Domain use-case port for the survey flow.
#[async_trait]
pub trait SurveyFlow: Send + Sync {
    /// Entry decision: completion, resume page, or fresh assignment.
    ///
    /// Assigning a fresh panel claims a slot and materialises the draft
    /// batch before returning [`EntryDecision::Started`].
    async fn start(&self, email: &RespondentEmail) -> Result<EntryDecision, Error>;

    /// Resolve a page for display.
    async fn page(&self, email: &RespondentEmail, page: u32) -> Result<PageLookup, Error>;

    /// Persist a page submission, finalising the panel on the last page.
    async fn submit(
        &self,
        email: &RespondentEmail,
        page: u32,
        sheet: RatingSheet,
    ) -> Result<SubmitOutcome, Error>;
}
