//! Survey flow domain service.
//!
//! Implements the [`SurveyFlow`] driving port over the four repository
//! ports: the entry decision (completed / resume / fresh assignment), page
//! resolution, and page submission with final-page finalisation.

use std::sync::Arc;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    DraftRepository, EntryDecision, PageLookup, PoemRepository, RepositoryError,
    ResponseRepository, SlotRepository, SubmitOutcome, SurveyFlow, SurveyPage,
};
use crate::domain::{
    Error, PANEL_SIZE, RatingSheet, RespondentEmail, ResponseDraft, SurveyResponse, SurveySlot,
};

fn map_repository_error(error: RepositoryError) -> Error {
    match error {
        RepositoryError::Connection { message } => {
            Error::service_unavailable(format!("survey store unavailable: {message}"))
        }
        RepositoryError::Query { message } => {
            Error::internal(format!("survey store error: {message}"))
        }
    }
}

/// Assignment/resume controller.
///
/// Holds the panel size as a field so tests can exercise small panels; the
/// server wires [`PANEL_SIZE`].
#[derive(Clone)]
pub struct SurveyService<P, S, D, R> {
    poems: Arc<P>,
    slots: Arc<S>,
    drafts: Arc<D>,
    responses: Arc<R>,
    panel_size: u32,
}

impl<P, S, D, R> SurveyService<P, S, D, R> {
    /// Create a service over the given stores with the standard panel size.
    pub fn new(poems: Arc<P>, slots: Arc<S>, drafts: Arc<D>, responses: Arc<R>) -> Self {
        Self {
            poems,
            slots,
            drafts,
            responses,
            panel_size: PANEL_SIZE,
        }
    }

    /// Override the panel size (tests only use small panels).
    pub fn with_panel_size(mut self, panel_size: u32) -> Self {
        self.panel_size = panel_size;
        self
    }
}

impl<P, S, D, R> SurveyService<P, S, D, R>
where
    P: PoemRepository,
    S: SlotRepository,
    D: DraftRepository,
    R: ResponseRepository,
{
    async fn has_completed(&self, email: &RespondentEmail) -> Result<bool, Error> {
        let count = self
            .responses
            .count_for_email(email)
            .await
            .map_err(map_repository_error)?;
        Ok(count >= u64::from(self.panel_size))
    }

    /// Pick and claim an available slot: gold slots first in stable id
    /// order, then uniformly at random among regular slots with capacity.
    ///
    /// A lost claim means a concurrent assignment filled the candidate
    /// between selection and increment; the availability set shrank, so the
    /// loop re-selects until a claim wins or the pool is exhausted.
    async fn claim_slot(&self, email: &RespondentEmail) -> Result<SurveySlot, Error> {
        loop {
            let candidate = match self
                .slots
                .first_available_gold()
                .await
                .map_err(map_repository_error)?
            {
                Some(slot) => Some(slot),
                None => {
                    let regular = self
                        .slots
                        .list_available_regular()
                        .await
                        .map_err(map_repository_error)?;
                    let mut rng = SmallRng::from_entropy();
                    regular.choose(&mut rng).cloned()
                }
            };

            let Some(slot) = candidate else {
                warn!(email = %email, "slot pool exhausted, no assignment made");
                return Err(Error::service_unavailable("no survey slots available"));
            };

            if self
                .slots
                .claim(slot.id())
                .await
                .map_err(map_repository_error)?
            {
                info!(email = %email, slot_id = %slot.id(), is_gold = slot.is_gold(), "slot assigned");
                return Ok(slot);
            }

            debug!(slot_id = %slot.id(), "lost slot claim, reselecting");
        }
    }

    async fn assign_panel(&self, email: &RespondentEmail) -> Result<(), Error> {
        let slot = self.claim_slot(email).await?;

        let poem_ids = slot.poem_ids();
        if poem_ids.len() as u64 != u64::from(self.panel_size) {
            warn!(
                slot_id = %slot.id(),
                sequence_len = poem_ids.len(),
                "slot sequence length differs from panel size"
            );
        }

        let batch: Vec<ResponseDraft> = poem_ids
            .iter()
            .zip(1u32..)
            .map(|(poem_id, position)| ResponseDraft::unanswered(email.clone(), *poem_id, position))
            .collect();

        self.drafts
            .insert_batch(&batch)
            .await
            .map_err(map_repository_error)
    }

    /// Copy every draft into a permanent response unless one already exists
    /// for that poem, then delete the drafts.
    ///
    /// The duplicate check makes re-running this after a partial failure
    /// safe: already-copied poems are skipped, not duplicated.
    async fn finalise(&self, email: &RespondentEmail) -> Result<(), Error> {
        let drafts = self
            .drafts
            .list_for_email(email)
            .await
            .map_err(map_repository_error)?;

        for draft in &drafts {
            let already_copied = self
                .responses
                .exists(email, draft.poem_id)
                .await
                .map_err(map_repository_error)?;
            if already_copied {
                debug!(email = %email, poem_id = %draft.poem_id, "response already copied, skipping");
                continue;
            }
            self.responses
                .append(&SurveyResponse::from_draft(draft))
                .await
                .map_err(map_repository_error)?;
        }

        self.drafts
            .delete_for_email(email)
            .await
            .map_err(map_repository_error)?;

        info!(email = %email, responses = drafts.len(), "survey finalised");
        Ok(())
    }
}

#[async_trait]
impl<P, S, D, R> SurveyFlow for SurveyService<P, S, D, R>
where
    P: PoemRepository,
    S: SlotRepository,
    D: DraftRepository,
    R: ResponseRepository,
{
    async fn start(&self, email: &RespondentEmail) -> Result<EntryDecision, Error> {
        if self.has_completed(email).await? {
            return Ok(EntryDecision::Completed);
        }

        let drafts = self
            .drafts
            .list_for_email(email)
            .await
            .map_err(map_repository_error)?;

        if !drafts.is_empty() {
            for (index, draft) in drafts.iter().enumerate() {
                if !draft.is_answered() {
                    let page = index as u32 + 1;
                    debug!(email = %email, page, "resuming survey");
                    return Ok(EntryDecision::Resume { page });
                }
            }
            // Every draft answered but never finalised counts as done.
            return Ok(EntryDecision::Completed);
        }

        self.assign_panel(email).await?;
        Ok(EntryDecision::Started)
    }

    async fn page(&self, email: &RespondentEmail, page: u32) -> Result<PageLookup, Error> {
        let drafts = self
            .drafts
            .list_for_email(email)
            .await
            .map_err(map_repository_error)?;

        if drafts.is_empty() {
            if self.has_completed(email).await? {
                return Ok(PageLookup::Completed);
            }
            return Ok(PageLookup::Reassess);
        }

        let Some(draft) = page
            .checked_sub(1)
            .and_then(|index| drafts.get(index as usize))
        else {
            return Ok(PageLookup::Reassess);
        };

        let poem = self
            .poems
            .find_by_id(draft.poem_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| {
                Error::internal(format!("catalog is missing poem {}", draft.poem_id))
            })?;

        Ok(PageLookup::Page(Box::new(SurveyPage {
            page,
            total: self.panel_size,
            poem,
            sheet: draft.sheet.clone(),
        })))
    }

    async fn submit(
        &self,
        email: &RespondentEmail,
        page: u32,
        sheet: RatingSheet,
    ) -> Result<SubmitOutcome, Error> {
        let drafts = self
            .drafts
            .list_for_email(email)
            .await
            .map_err(map_repository_error)?;

        if drafts.is_empty() {
            if self.has_completed(email).await? {
                return Ok(SubmitOutcome::Completed);
            }
            return Ok(SubmitOutcome::Reassess);
        }

        let Some(draft) = page
            .checked_sub(1)
            .and_then(|index| drafts.get(index as usize))
        else {
            return Ok(SubmitOutcome::Reassess);
        };

        self.drafts
            .update_sheet(email, draft.position, &sheet)
            .await
            .map_err(map_repository_error)?;

        if page < self.panel_size {
            Ok(SubmitOutcome::Advance {
                next_page: page + 1,
            })
        } else {
            self.finalise(email).await?;
            Ok(SubmitOutcome::Finished)
        }
    }
}

#[cfg(test)]
#[path = "survey_service_tests.rs"]
mod tests;
