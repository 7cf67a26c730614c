//! Domain entities, ports, and the survey flow service.
//!
//! Purpose: define strongly typed survey entities used by the HTTP and
//! persistence layers, the ports those layers meet at, and the
//! assignment/resume controller. Types are immutable where the data model
//! is; invariants live in each type's Rustdoc.

pub mod draft;
pub mod email;
pub mod error;
pub mod poem;
pub mod ports;
pub mod rating;
pub mod response;
pub mod slot;
pub mod survey_service;

pub use self::draft::ResponseDraft;
pub use self::email::{EmailValidationError, RespondentEmail};
pub use self::error::{Error, ErrorCode};
pub use self::poem::{Poem, PoemId};
pub use self::rating::{LikertRating, RatingSheet, UnknownRating};
pub use self::response::SurveyResponse;
pub use self::slot::{PANEL_SIZE, SLOT_CAPACITY, SlotId, SurveySlot};
pub use self::survey_service::SurveyService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
