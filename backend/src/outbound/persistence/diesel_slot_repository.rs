//! PostgreSQL-backed `SlotRepository` implementation using Diesel.
//!
//! The claim is one conditional `UPDATE`: the `usage_count < capacity`
//! predicate and the increment execute atomically on the server, so two
//! concurrent claimants of a slot's last place see exactly one affected
//! row. This closes the check-then-increment race a separate read would
//! reintroduce.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RepositoryError, SlotRepository};
use crate::domain::{SLOT_CAPACITY, SlotId, SurveySlot};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{NewSlotRow, SlotRow};
use super::pool::DbPool;
use super::schema::survey_slots;

/// Diesel-backed slot pool adapter.
#[derive(Clone)]
pub struct DieselSlotRepository {
    pool: DbPool,
}

impl DieselSlotRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotRepository for DieselSlotRepository {
    async fn first_available_gold(&self) -> Result<Option<SurveySlot>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<SlotRow> = survey_slots::table
            .filter(
                survey_slots::is_gold
                    .eq(true)
                    .and(survey_slots::usage_count.lt(SLOT_CAPACITY)),
            )
            .order(survey_slots::slot_id.asc())
            .select(SlotRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(SlotRow::into_domain).transpose()
    }

    async fn list_available_regular(&self) -> Result<Vec<SurveySlot>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<SlotRow> = survey_slots::table
            .filter(
                survey_slots::is_gold
                    .eq(false)
                    .and(survey_slots::usage_count.lt(SLOT_CAPACITY)),
            )
            .order(survey_slots::slot_id.asc())
            .select(SlotRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(SlotRow::into_domain).collect()
    }

    async fn claim(&self, id: SlotId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            survey_slots::table.filter(
                survey_slots::slot_id
                    .eq(id.get())
                    .and(survey_slots::usage_count.lt(SLOT_CAPACITY)),
            ),
        )
        .set(survey_slots::usage_count.eq(survey_slots::usage_count + 1))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(updated == 1)
    }

    async fn insert_pool(&self, slots: &[SurveySlot]) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NewSlotRow> = slots
            .iter()
            .map(NewSlotRow::try_from)
            .collect::<Result<_, _>>()?;

        diesel::insert_into(survey_slots::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
