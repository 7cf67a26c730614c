//! In-memory adapters for the repository ports.
//!
//! Backs the server when no database is configured and gives tests a
//! deterministic store without I/O. One [`MemoryStore`] implements all four
//! ports so a single instance can serve a whole survey flow.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    DraftRepository, PoemRepository, RepositoryError, ResponseRepository, SlotRepository,
};
use crate::domain::{
    Poem, PoemId, RatingSheet, RespondentEmail, ResponseDraft, SLOT_CAPACITY, SlotId,
    SurveyResponse, SurveySlot,
};

/// Process-local implementation of every survey store.
///
/// `BTreeMap` keys give the stable id ordering the slot selection contract
/// requires. All mutation happens under a mutex per table, which also makes
/// [`SlotRepository::claim`] atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    poems: Mutex<BTreeMap<i32, Poem>>,
    slots: Mutex<BTreeMap<i32, SurveySlot>>,
    drafts: Mutex<Vec<ResponseDraft>>,
    responses: Mutex<Vec<SurveyResponse>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::query("store mutex poisoned"))
}

#[async_trait]
impl PoemRepository for MemoryStore {
    async fn find_by_id(&self, id: PoemId) -> Result<Option<Poem>, RepositoryError> {
        Ok(lock(&self.poems)?.get(&id.get()).cloned())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(lock(&self.poems)?.len() as u64)
    }

    async fn insert_catalog(&self, poems: &[Poem]) -> Result<(), RepositoryError> {
        let mut table = lock(&self.poems)?;
        for poem in poems {
            table.insert(poem.id.get(), poem.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl SlotRepository for MemoryStore {
    async fn first_available_gold(&self) -> Result<Option<SurveySlot>, RepositoryError> {
        Ok(lock(&self.slots)?
            .values()
            .find(|slot| slot.is_gold() && slot.has_capacity())
            .cloned())
    }

    async fn list_available_regular(&self) -> Result<Vec<SurveySlot>, RepositoryError> {
        Ok(lock(&self.slots)?
            .values()
            .filter(|slot| !slot.is_gold() && slot.has_capacity())
            .cloned()
            .collect())
    }

    async fn claim(&self, id: SlotId) -> Result<bool, RepositoryError> {
        let mut table = lock(&self.slots)?;
        let Some(slot) = table.get(&id.get()) else {
            return Ok(false);
        };
        if slot.usage_count() >= SLOT_CAPACITY {
            return Ok(false);
        }
        let claimed = SurveySlot::new(
            slot.id(),
            slot.poem_ids().to_vec(),
            slot.is_gold(),
            slot.usage_count() + 1,
        );
        table.insert(id.get(), claimed);
        Ok(true)
    }

    async fn insert_pool(&self, slots: &[SurveySlot]) -> Result<(), RepositoryError> {
        let mut table = lock(&self.slots)?;
        for slot in slots {
            table.insert(slot.id().get(), slot.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl DraftRepository for MemoryStore {
    async fn list_for_email(
        &self,
        email: &RespondentEmail,
    ) -> Result<Vec<ResponseDraft>, RepositoryError> {
        let mut rows: Vec<ResponseDraft> = lock(&self.drafts)?
            .iter()
            .filter(|draft| &draft.email == email)
            .cloned()
            .collect();
        rows.sort_by_key(|draft| draft.position);
        Ok(rows)
    }

    async fn insert_batch(&self, drafts: &[ResponseDraft]) -> Result<(), RepositoryError> {
        lock(&self.drafts)?.extend(drafts.iter().cloned());
        Ok(())
    }

    async fn update_sheet(
        &self,
        email: &RespondentEmail,
        position: u32,
        sheet: &RatingSheet,
    ) -> Result<(), RepositoryError> {
        let mut table = lock(&self.drafts)?;
        let Some(draft) = table
            .iter_mut()
            .find(|draft| &draft.email == email && draft.position == position)
        else {
            return Err(RepositoryError::query(format!(
                "no draft at position {position} for {email}"
            )));
        };
        draft.sheet = sheet.clone();
        Ok(())
    }

    async fn delete_for_email(&self, email: &RespondentEmail) -> Result<(), RepositoryError> {
        lock(&self.drafts)?.retain(|draft| &draft.email != email);
        Ok(())
    }
}

#[async_trait]
impl ResponseRepository for MemoryStore {
    async fn count_for_email(&self, email: &RespondentEmail) -> Result<u64, RepositoryError> {
        Ok(lock(&self.responses)?
            .iter()
            .filter(|response| &response.email == email)
            .count() as u64)
    }

    async fn exists(
        &self,
        email: &RespondentEmail,
        poem_id: PoemId,
    ) -> Result<bool, RepositoryError> {
        Ok(lock(&self.responses)?
            .iter()
            .any(|response| &response.email == email && response.poem_id == poem_id))
    }

    async fn append(&self, response: &SurveyResponse) -> Result<(), RepositoryError> {
        let mut table = lock(&self.responses)?;
        // Mirrors the unique (email, poem_id) index on the real table.
        if table
            .iter()
            .any(|row| row.email == response.email && row.poem_id == response.poem_id)
        {
            return Err(RepositoryError::query(format!(
                "duplicate response for {} poem {}",
                response.email, response.poem_id
            )));
        }
        table.push(response.clone());
        Ok(())
    }
}
