//! Port abstraction for poem catalog adapters.

use async_trait::async_trait;

use crate::domain::{Poem, PoemId};

use super::RepositoryError;

/// Read/seed access to the poem catalog.
///
/// The catalog is immutable during a survey run; `insert` exists only for
/// external data load and startup seeding.
#[async_trait]
pub trait PoemRepository: Send + Sync {
    /// Fetch a poem by identifier.
    async fn find_by_id(&self, id: PoemId) -> Result<Option<Poem>, RepositoryError>;

    /// Number of poems in the catalog.
    async fn count(&self) -> Result<u64, RepositoryError>;

    /// Bulk-load catalog entries (seeding only).
    async fn insert_catalog(&self, poems: &[Poem]) -> Result<(), RepositoryError>;
}
