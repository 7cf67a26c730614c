//! PostgreSQL-backed `PoemRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PoemRepository, RepositoryError};
use crate::domain::{Poem, PoemId};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{NewPoemRow, PoemRow};
use super::pool::DbPool;
use super::schema::poems;

/// Diesel-backed poem catalog adapter.
#[derive(Clone)]
pub struct DieselPoemRepository {
    pool: DbPool,
}

impl DieselPoemRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PoemRepository for DieselPoemRepository {
    async fn find_by_id(&self, id: PoemId) -> Result<Option<Poem>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PoemRow> = poems::table
            .filter(poems::poem_id.eq(id.get()))
            .select(PoemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(Poem::from))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = poems::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(count.unsigned_abs())
    }

    async fn insert_catalog(&self, entries: &[Poem]) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NewPoemRow<'_>> = entries
            .iter()
            .map(|poem| NewPoemRow {
                poem_id: poem.id.get(),
                content: &poem.content,
                topic: poem.topic.as_deref(),
                source_type: poem.source_type.as_deref(),
            })
            .collect();

        diesel::insert_into(poems::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
