//! PostgreSQL-backed `DraftRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DraftRepository, RepositoryError};
use crate::domain::{RatingSheet, RespondentEmail, ResponseDraft};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{DraftRow, DraftSheetUpdate, NewDraftRow};
use super::pool::DbPool;
use super::schema::response_drafts;

/// Diesel-backed draft store adapter.
#[derive(Clone)]
pub struct DieselDraftRepository {
    pool: DbPool,
}

impl DieselDraftRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn position_to_db(position: u32) -> Result<i32, RepositoryError> {
    i32::try_from(position)
        .map_err(|_| RepositoryError::query(format!("draft position {position} out of range")))
}

#[async_trait]
impl DraftRepository for DieselDraftRepository {
    async fn list_for_email(
        &self,
        respondent: &RespondentEmail,
    ) -> Result<Vec<ResponseDraft>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DraftRow> = response_drafts::table
            .filter(response_drafts::email.eq(respondent.as_ref()))
            .order(response_drafts::position.asc())
            .select(DraftRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(DraftRow::into_domain).collect()
    }

    async fn insert_batch(&self, drafts: &[ResponseDraft]) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NewDraftRow<'_>> = drafts
            .iter()
            .map(|draft| {
                Ok(NewDraftRow {
                    email: draft.email.as_ref(),
                    poem_id: draft.poem_id.get(),
                    position: position_to_db(draft.position)?,
                })
            })
            .collect::<Result<_, RepositoryError>>()?;

        diesel::insert_into(response_drafts::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update_sheet(
        &self,
        respondent: &RespondentEmail,
        position: u32,
        sheet: &RatingSheet,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            response_drafts::table.filter(
                response_drafts::email
                    .eq(respondent.as_ref())
                    .and(response_drafts::position.eq(position_to_db(position)?)),
            ),
        )
        .set(DraftSheetUpdate::from_sheet(sheet))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(RepositoryError::query(format!(
                "no draft at position {position} for {respondent}"
            )));
        }
        Ok(())
    }

    async fn delete_for_email(&self, respondent: &RespondentEmail) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(
            response_drafts::table.filter(response_drafts::email.eq(respondent.as_ref())),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(map_diesel_error)
    }
}
