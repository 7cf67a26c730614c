//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated specification for the survey API.
//! Swagger UI serves it at `/docs` in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::domain::rating::{LikertRating, RatingSheet};
use crate::inbound::http::home::{HomeStatus, RegisterRequest};
use crate::inbound::http::survey::{PageSubmission, PoemBody, SurveyPageBody};

/// OpenAPI document for the survey API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Poem survey backend API",
        description = "Slot-assigned, resumable poem rating survey."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::home::home,
        crate::inbound::http::home::register,
        crate::inbound::http::home::preliminaries,
        crate::inbound::http::survey::survey_start,
        crate::inbound::http::survey::survey_page,
        crate::inbound::http::survey::submit_page,
        crate::inbound::http::survey::thank_you,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        HomeStatus,
        RegisterRequest,
        SurveyPageBody,
        PoemBody,
        PageSubmission,
        RatingSheet,
        LikertRating,
    ))
)]
pub struct ApiDoc;
