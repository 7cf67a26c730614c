//! Internal Diesel row structs and their domain conversions.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. Rating columns hold Likert wire strings; values that no longer
//! parse are logged and read back as unset rather than failing the request.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::warn;

use crate::domain::ports::RepositoryError;
use crate::domain::{
    LikertRating, Poem, PoemId, RatingSheet, RespondentEmail, ResponseDraft, SlotId, SurveySlot,
};

use super::schema::{poems, response_drafts, responses, survey_slots};

pub(crate) fn rating_to_db(rating: Option<LikertRating>) -> Option<&'static str> {
    rating.map(LikertRating::as_str)
}

pub(crate) fn rating_from_db(column: &'static str, value: Option<String>) -> Option<LikertRating> {
    let raw = value?;
    match LikertRating::parse(&raw) {
        Ok(rating) => Some(rating),
        Err(err) => {
            warn!(column, value = %err.value, "unrecognised rating in store, reading as unset");
            None
        }
    }
}

fn email_from_db(raw: String) -> Result<RespondentEmail, RepositoryError> {
    RespondentEmail::new(&raw)
        .map_err(|err| RepositoryError::query(format!("stored email {raw:?} is invalid: {err}")))
}

// ---------------------------------------------------------------------------
// Poems
// ---------------------------------------------------------------------------

/// Row struct for reading from the poems table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = poems)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PoemRow {
    pub poem_id: i32,
    pub content: String,
    pub topic: Option<String>,
    pub source_type: Option<String>,
}

impl From<PoemRow> for Poem {
    fn from(row: PoemRow) -> Self {
        Self {
            id: PoemId::new(row.poem_id),
            content: row.content,
            topic: row.topic,
            source_type: row.source_type,
        }
    }
}

/// Insertable struct for seeding the poem catalog.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = poems)]
pub(crate) struct NewPoemRow<'a> {
    pub poem_id: i32,
    pub content: &'a str,
    pub topic: Option<&'a str>,
    pub source_type: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Survey slots
// ---------------------------------------------------------------------------

/// Row struct for reading from the survey_slots table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = survey_slots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SlotRow {
    pub slot_id: i32,
    pub poem_ids: String,
    pub is_gold: bool,
    pub usage_count: i32,
}

impl SlotRow {
    /// Parse the serialized poem-id list into a domain slot.
    pub(crate) fn into_domain(self) -> Result<SurveySlot, RepositoryError> {
        let ids: Vec<i32> = serde_json::from_str(&self.poem_ids).map_err(|err| {
            RepositoryError::query(format!(
                "slot {} has a malformed poem id list: {err}",
                self.slot_id
            ))
        })?;
        Ok(SurveySlot::new(
            SlotId::new(self.slot_id),
            ids.into_iter().map(PoemId::new).collect(),
            self.is_gold,
            self.usage_count,
        ))
    }
}

/// Insertable struct for seeding the slot pool.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = survey_slots)]
pub(crate) struct NewSlotRow {
    pub slot_id: i32,
    pub poem_ids: String,
    pub is_gold: bool,
    pub usage_count: i32,
}

impl TryFrom<&SurveySlot> for NewSlotRow {
    type Error = RepositoryError;

    fn try_from(slot: &SurveySlot) -> Result<Self, Self::Error> {
        let ids: Vec<i32> = slot.poem_ids().iter().map(|id| id.get()).collect();
        let poem_ids = serde_json::to_string(&ids).map_err(|err| {
            RepositoryError::query(format!("failed to serialise poem id list: {err}"))
        })?;
        Ok(Self {
            slot_id: slot.id().get(),
            poem_ids,
            is_gold: slot.is_gold(),
            usage_count: slot.usage_count(),
        })
    }
}

// ---------------------------------------------------------------------------
// Response drafts
// ---------------------------------------------------------------------------

/// Row struct for reading drafts; skips the surrogate key and timestamp the
/// domain never sees.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = response_drafts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DraftRow {
    pub email: String,
    pub poem_id: i32,
    pub position: i32,
    pub clarity: Option<String>,
    pub devices: Option<String>,
    pub punctuation: Option<String>,
    pub grammar: Option<String>,
    pub originality: Option<String>,
    pub extra: Option<String>,
}

impl DraftRow {
    pub(crate) fn into_domain(self) -> Result<ResponseDraft, RepositoryError> {
        let position = u32::try_from(self.position).map_err(|_| {
            RepositoryError::query(format!("draft position {} is negative", self.position))
        })?;
        Ok(ResponseDraft {
            email: email_from_db(self.email)?,
            poem_id: PoemId::new(self.poem_id),
            position,
            sheet: RatingSheet {
                clarity: rating_from_db("clarity", self.clarity),
                devices: rating_from_db("devices", self.devices),
                punctuation: rating_from_db("punctuation", self.punctuation),
                grammar: rating_from_db("grammar", self.grammar),
                originality: rating_from_db("originality", self.originality),
                extra: self.extra,
            },
        })
    }
}

/// Insertable struct for materialising the placeholder draft batch.
/// Rating columns stay at their NULL defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = response_drafts)]
pub(crate) struct NewDraftRow<'a> {
    pub email: &'a str,
    pub poem_id: i32,
    pub position: i32,
}

/// Changeset overwriting all six answer fields of one draft.
///
/// `treat_none_as_null` matters: an unset rating must null the column, not
/// leave a previous answer behind.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = response_drafts)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct DraftSheetUpdate<'a> {
    pub clarity: Option<&'a str>,
    pub devices: Option<&'a str>,
    pub punctuation: Option<&'a str>,
    pub grammar: Option<&'a str>,
    pub originality: Option<&'a str>,
    pub extra: Option<&'a str>,
    pub last_updated: DateTime<Utc>,
}

impl<'a> DraftSheetUpdate<'a> {
    pub(crate) fn from_sheet(sheet: &'a RatingSheet) -> Self {
        Self {
            clarity: rating_to_db(sheet.clarity),
            devices: rating_to_db(sheet.devices),
            punctuation: rating_to_db(sheet.punctuation),
            grammar: rating_to_db(sheet.grammar),
            originality: rating_to_db(sheet.originality),
            extra: sheet.extra.as_deref(),
            last_updated: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Insertable struct for appending a finalised response.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = responses)]
pub(crate) struct NewResponseRow<'a> {
    pub email: &'a str,
    pub poem_id: i32,
    pub clarity: Option<&'a str>,
    pub devices: Option<&'a str>,
    pub punctuation: Option<&'a str>,
    pub grammar: Option<&'a str>,
    pub originality: Option<&'a str>,
    pub extra: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_row_parses_its_sequence() {
        let row = SlotRow {
            slot_id: 3,
            poem_ids: "[102, 55, 3]".into(),
            is_gold: true,
            usage_count: 1,
        };
        let slot = row.into_domain().expect("well-formed list");
        let ids: Vec<i32> = slot.poem_ids().iter().map(|id| id.get()).collect();
        assert_eq!(ids, vec![102, 55, 3]);
        assert!(slot.is_gold());
    }

    #[test]
    fn malformed_sequence_is_a_query_error() {
        let row = SlotRow {
            slot_id: 3,
            poem_ids: "not json".into(),
            is_gold: false,
            usage_count: 0,
        };
        let err = row.into_domain().expect_err("malformed list");
        assert!(err.to_string().contains("slot 3"));
    }

    #[test]
    fn unknown_stored_rating_reads_as_unset() {
        assert_eq!(rating_from_db("clarity", Some("Definitely".into())), None);
        assert_eq!(
            rating_from_db("clarity", Some("Very Likely".into())),
            Some(LikertRating::VeryLikely)
        );
        assert_eq!(rating_from_db("clarity", None), None);
    }

    #[test]
    fn draft_row_round_trips_sheet_fields() {
        let row = DraftRow {
            email: "ada@example.org".into(),
            poem_id: 7,
            position: 2,
            clarity: Some("Likely".into()),
            devices: None,
            punctuation: Some("Not Sure".into()),
            grammar: None,
            originality: None,
            extra: Some("nice imagery".into()),
        };
        let draft = row.into_domain().expect("valid row");
        assert_eq!(draft.position, 2);
        assert_eq!(draft.sheet.clarity, Some(LikertRating::Likely));
        assert_eq!(draft.sheet.devices, None);
        assert_eq!(draft.sheet.extra.as_deref(), Some("nice imagery"));
    }
}
