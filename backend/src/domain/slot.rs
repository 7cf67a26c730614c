//! Survey slots: pre-generated poem panels handed out to respondents.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::poem::PoemId;

/// Number of poems every respondent rates.
pub const PANEL_SIZE: u32 = 20;

/// Maximum respondents assigned to one slot.
pub const SLOT_CAPACITY: i32 = 2;

/// Stable slot identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SlotId(i32);

impl SlotId {
    /// Wrap a raw slot identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// The raw identifier value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pre-generated panel of poem ids assigned as a unit to one respondent.
///
/// ## Invariants
/// - `poem_ids` holds the panel sequence in presentation order;
/// - `usage_count` starts at 0, is incremented exactly once per successful
///   assignment via an atomic conditional update, and is never decremented;
/// - gold slots are handed out before regular ones while they have capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveySlot {
    id: SlotId,
    poem_ids: Vec<PoemId>,
    is_gold: bool,
    usage_count: i32,
}

impl SurveySlot {
    /// Build a slot from its persisted parts.
    pub fn new(id: SlotId, poem_ids: Vec<PoemId>, is_gold: bool, usage_count: i32) -> Self {
        Self {
            id,
            poem_ids,
            is_gold,
            usage_count,
        }
    }

    /// Stable slot identifier.
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Panel sequence in presentation order.
    pub fn poem_ids(&self) -> &[PoemId] {
        &self.poem_ids
    }

    /// Whether this slot is prioritised for early assignment.
    pub fn is_gold(&self) -> bool {
        self.is_gold
    }

    /// Successful assignments so far.
    pub fn usage_count(&self) -> i32 {
        self.usage_count
    }

    /// Whether another respondent may still be assigned to this slot.
    pub fn has_capacity(&self) -> bool {
        self.usage_count < SLOT_CAPACITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(usage: i32) -> SurveySlot {
        SurveySlot::new(
            SlotId::new(1),
            vec![PoemId::new(3), PoemId::new(1)],
            false,
            usage,
        )
    }

    #[test]
    fn capacity_follows_usage_count() {
        assert!(slot(0).has_capacity());
        assert!(slot(1).has_capacity());
        assert!(!slot(SLOT_CAPACITY).has_capacity());
    }

    #[test]
    fn panel_order_is_preserved() {
        let ids: Vec<i32> = slot(0).poem_ids().iter().map(|id| id.get()).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
