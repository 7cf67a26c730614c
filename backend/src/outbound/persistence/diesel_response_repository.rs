//! PostgreSQL-backed `ResponseRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RepositoryError, ResponseRepository};
use crate::domain::{PoemId, RespondentEmail, SurveyResponse};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{NewResponseRow, rating_to_db};
use super::pool::DbPool;
use super::schema::responses;

/// Diesel-backed finalised-response adapter.
#[derive(Clone)]
pub struct DieselResponseRepository {
    pool: DbPool,
}

impl DieselResponseRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseRepository for DieselResponseRepository {
    async fn count_for_email(
        &self,
        respondent: &RespondentEmail,
    ) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = responses::table
            .filter(responses::email.eq(respondent.as_ref()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(count.unsigned_abs())
    }

    async fn exists(
        &self,
        respondent: &RespondentEmail,
        poem_id: PoemId,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(exists(
            responses::table.filter(
                responses::email
                    .eq(respondent.as_ref())
                    .and(responses::poem_id.eq(poem_id.get())),
            ),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn append(&self, response: &SurveyResponse) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewResponseRow {
            email: response.email.as_ref(),
            poem_id: response.poem_id.get(),
            clarity: rating_to_db(response.sheet.clarity),
            devices: rating_to_db(response.sheet.devices),
            punctuation: rating_to_db(response.sheet.punctuation),
            grammar: rating_to_db(response.sheet.grammar),
            originality: rating_to_db(response.sheet.originality),
            extra: response.sheet.extra.as_deref(),
        };

        diesel::insert_into(responses::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
