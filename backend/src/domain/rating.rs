//! Likert ratings collected for each poem.
//!
//! The rating scale is a closed enumeration validated at the boundary; the
//! store never holds values outside it. An unanswered field is `None`.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Five-point ordinal scale used by every rating question.
///
/// Serialises as the wire strings shown to respondents (`"Very Unlikely"`,
/// `"Not Sure"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LikertRating {
    #[serde(rename = "Very Unlikely")]
    VeryUnlikely,
    #[serde(rename = "Unlikely")]
    Unlikely,
    #[serde(rename = "Not Sure")]
    NotSure,
    #[serde(rename = "Likely")]
    Likely,
    #[serde(rename = "Very Likely")]
    VeryLikely,
}

/// Error returned when a submitted rating is outside the closed scale.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rating value: {value:?}")]
pub struct UnknownRating {
    /// The rejected input.
    pub value: String,
}

impl LikertRating {
    /// All scale points in ascending order.
    pub const ALL: [Self; 5] = [
        Self::VeryUnlikely,
        Self::Unlikely,
        Self::NotSure,
        Self::Likely,
        Self::VeryLikely,
    ];

    /// The wire string for this scale point.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryUnlikely => "Very Unlikely",
            Self::Unlikely => "Unlikely",
            Self::NotSure => "Not Sure",
            Self::Likely => "Likely",
            Self::VeryLikely => "Very Likely",
        }
    }

    /// Parse a wire string into a scale point.
    pub fn parse(value: &str) -> Result<Self, UnknownRating> {
        Self::ALL
            .into_iter()
            .find(|rating| rating.as_str() == value)
            .ok_or_else(|| UnknownRating {
                value: value.to_owned(),
            })
    }
}

impl fmt::Display for LikertRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six answer fields collected per poem: five Likert questions plus a
/// free-text remark. A fresh sheet has every field unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingSheet {
    /// How likely the poem is to be judged clear.
    pub clarity: Option<LikertRating>,
    /// Effective use of poetic devices.
    pub devices: Option<LikertRating>,
    /// Sound punctuation.
    pub punctuation: Option<LikertRating>,
    /// Sound grammar.
    pub grammar: Option<LikertRating>,
    /// Originality of the poem.
    pub originality: Option<LikertRating>,
    /// Optional free-text remark.
    pub extra: Option<String>,
}

impl RatingSheet {
    /// Whether the primary question has been answered. Resume position is
    /// derived from this field alone, matching the entry-decision contract.
    pub fn is_answered(&self) -> bool {
        self.clarity.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LikertRating::VeryUnlikely, "Very Unlikely")]
    #[case(LikertRating::Unlikely, "Unlikely")]
    #[case(LikertRating::NotSure, "Not Sure")]
    #[case(LikertRating::Likely, "Likely")]
    #[case(LikertRating::VeryLikely, "Very Likely")]
    fn wire_strings_round_trip(#[case] rating: LikertRating, #[case] wire: &str) {
        assert_eq!(rating.as_str(), wire);
        assert_eq!(LikertRating::parse(wire).expect("known value"), rating);
        let json = serde_json::to_value(rating).expect("serialise");
        assert_eq!(json, serde_json::Value::String(wire.into()));
    }

    #[rstest]
    #[case("very unlikely")]
    #[case("Maybe")]
    #[case("")]
    fn unknown_values_are_rejected(#[case] raw: &str) {
        let err = LikertRating::parse(raw).expect_err("outside the scale");
        assert_eq!(err.value, raw);
    }

    #[test]
    fn fresh_sheet_is_unanswered() {
        let sheet = RatingSheet::default();
        assert!(!sheet.is_answered());
        assert_eq!(sheet.extra, None);
    }

    #[test]
    fn answered_tracks_clarity_only() {
        let sheet = RatingSheet {
            devices: Some(LikertRating::Likely),
            ..RatingSheet::default()
        };
        assert!(!sheet.is_answered());

        let sheet = RatingSheet {
            clarity: Some(LikertRating::NotSure),
            ..RatingSheet::default()
        };
        assert!(sheet.is_answered());
    }
}
