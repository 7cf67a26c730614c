//! Port abstraction for the slot pool.

use async_trait::async_trait;

use crate::domain::{SlotId, SurveySlot};

use super::RepositoryError;

/// Access to the pre-generated slot pool.
///
/// Selection and claiming are split: callers pick a candidate from the
/// availability queries, then [`claim`](SlotRepository::claim) performs a
/// single atomic check-and-increment. Two concurrent claimants of a slot's
/// last place see exactly one `true`; the loser re-runs selection. This
/// keeps the usage counter within capacity without a transaction spanning
/// the whole assignment.
#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// First gold slot with spare capacity, in stable `slot_id` order.
    async fn first_available_gold(&self) -> Result<Option<SurveySlot>, RepositoryError>;

    /// All regular slots with spare capacity.
    async fn list_available_regular(&self) -> Result<Vec<SurveySlot>, RepositoryError>;

    /// Atomically increment the slot's usage count if it is below capacity.
    ///
    /// Returns `true` when this call won the increment, `false` when the
    /// slot was already at capacity (including races lost to a concurrent
    /// claim).
    async fn claim(&self, id: SlotId) -> Result<bool, RepositoryError>;

    /// Bulk-load slots (seeding only).
    async fn insert_pool(&self, slots: &[SurveySlot]) -> Result<(), RepositoryError>;
}
