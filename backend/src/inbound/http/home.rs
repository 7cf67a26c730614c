//! Entry and preliminaries handlers.
//!
//! ```text
//! GET  /               session status
//! POST /               {"email":"ada@example.org"} -> 303 /preliminaries
//! GET  /preliminaries  survey instructions (requires identity)
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{ApiResult, EmailValidationError, Error, LikertRating, PANEL_SIZE,
    RespondentEmail};
use crate::inbound::http::see_other;
use crate::inbound::http::session::SessionContext;

/// Entry status for `GET /`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomeStatus {
    /// Whether this session already carries a respondent identity.
    pub registered: bool,
}

/// Registration body for `POST /`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Respondent email; an identity label, not a verified account.
    pub email: String,
}

fn map_email_validation_error(err: &EmailValidationError) -> Error {
    Error::invalid_request(format!("please enter a valid email: {err}"))
        .with_details(json!({ "field": "email" }))
}

/// Report whether the session is registered.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Entry status", body = HomeStatus)),
    tags = ["entry"]
)]
#[get("/")]
pub async fn home(session: SessionContext) -> ApiResult<web::Json<HomeStatus>> {
    Ok(web::Json(HomeStatus {
        registered: session.respondent()?.is_some(),
    }))
}

/// Establish the respondent identity and move on to the preliminaries.
#[utoipa::path(
    post,
    path = "/",
    request_body = RegisterRequest,
    responses(
        (status = 303, description = "Identity stored; redirect to preliminaries"),
        (status = 400, description = "Invalid email", body = Error)
    ),
    tags = ["entry"]
)]
#[post("/")]
pub async fn register(
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let email = RespondentEmail::new(&payload.email)
        .map_err(|err| map_email_validation_error(&err))?;
    session.persist_email(&email)?;
    Ok(see_other("/preliminaries"))
}

/// Informational page shown before the survey starts.
#[utoipa::path(
    get,
    path = "/preliminaries",
    responses(
        (status = 200, description = "Survey instructions"),
        (status = 303, description = "No identity; redirect to entry")
    ),
    tags = ["entry"]
)]
#[get("/preliminaries")]
pub async fn preliminaries(session: SessionContext) -> ApiResult<HttpResponse> {
    if session.respondent()?.is_none() {
        return Ok(see_other("/"));
    }
    let scale: Vec<&str> = LikertRating::ALL.iter().map(|r| r.as_str()).collect();
    Ok(HttpResponse::Ok().json(json!({
        "totalPoems": PANEL_SIZE,
        "scale": scale,
        "instructions": "You will rate a fixed panel of poems, one per page. \
            Your progress is saved after every page, so you can leave and \
            resume later from the same browser.",
    })))
}
