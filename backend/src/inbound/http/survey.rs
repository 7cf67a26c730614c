//! Survey flow handlers.
//!
//! ```text
//! GET  /survey            entry decision -> 303 to the right page
//! GET  /survey/{page_num} page content and current answers
//! POST /survey/{page_num} store answers -> 303 next page / thank-you
//! GET  /thank-you         completion page
//! ```
//!
//! Redirect discipline: missing identity goes to `/`, inconsistent survey
//! state goes back to `/survey` so the entry decision can re-derive it.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{EntryDecision, PageLookup, SubmitOutcome};
use crate::domain::{ApiResult, Error, LikertRating, Poem, RatingSheet};
use crate::inbound::http::see_other;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Poem shown on a survey page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoemBody {
    /// Catalog identifier.
    pub id: i32,
    /// Synthetic display title.
    pub title: String,
    /// Poem text.
    pub content: String,
}

impl From<Poem> for PoemBody {
    fn from(poem: Poem) -> Self {
        Self {
            id: poem.id.get(),
            title: poem.title(),
            content: poem.content,
        }
    }
}

/// Body of `GET /survey/{page_num}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPageBody {
    /// 1-based page number.
    pub page: u32,
    /// Total pages in the panel.
    pub total: u32,
    /// Poem rated on this page.
    pub poem: PoemBody,
    /// Current (possibly unset) answers.
    pub answers: RatingSheet,
}

/// Submission body for `POST /survey/{page_num}`.
///
/// Ratings arrive as wire strings; absent or empty fields stay unset.
/// Anything outside the closed scale is rejected.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageSubmission {
    /// Clarity rating, if answered.
    pub clarity: Option<String>,
    /// Poetic-devices rating, if answered.
    pub devices: Option<String>,
    /// Punctuation rating, if answered.
    pub punctuation: Option<String>,
    /// Grammar rating, if answered.
    pub grammar: Option<String>,
    /// Originality rating, if answered.
    pub originality: Option<String>,
    /// Free-text remark, if any.
    pub extra: Option<String>,
}

fn parse_rating(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<LikertRating>, Error> {
    value
        .filter(|raw| !raw.is_empty())
        .map(|raw| LikertRating::parse(&raw))
        .transpose()
        .map_err(|err| {
            Error::invalid_request(format!("{field} is not a value on the rating scale"))
                .with_details(json!({ "field": field, "value": err.value }))
        })
}

impl TryFrom<PageSubmission> for RatingSheet {
    type Error = Error;

    fn try_from(body: PageSubmission) -> Result<Self, Self::Error> {
        Ok(Self {
            clarity: parse_rating("clarity", body.clarity)?,
            devices: parse_rating("devices", body.devices)?,
            punctuation: parse_rating("punctuation", body.punctuation)?,
            grammar: parse_rating("grammar", body.grammar)?,
            originality: parse_rating("originality", body.originality)?,
            extra: body.extra.filter(|raw| !raw.is_empty()),
        })
    }
}

fn page_location(page: u32) -> String {
    format!("/survey/{page}")
}

/// Entry decision: send the respondent to the right place.
#[utoipa::path(
    get,
    path = "/survey",
    responses(
        (status = 303, description = "Redirect to the resume page, page 1, or the completion page"),
        (status = 503, description = "No survey slots available", body = Error)
    ),
    tags = ["survey"]
)]
#[get("/survey")]
pub async fn survey_start(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let Some(email) = session.respondent()? else {
        return Ok(see_other("/"));
    };

    let target = match state.survey.start(&email).await? {
        EntryDecision::Completed => "/thank-you".to_owned(),
        EntryDecision::Resume { page } => page_location(page),
        EntryDecision::Started => page_location(1),
    };
    Ok(see_other(&target))
}

/// Render one survey page.
#[utoipa::path(
    get,
    path = "/survey/{page_num}",
    params(("page_num" = u32, Path, description = "1-based page number")),
    responses(
        (status = 200, description = "Page content", body = SurveyPageBody),
        (status = 303, description = "State mismatch; redirected to re-derive")
    ),
    tags = ["survey"]
)]
#[get("/survey/{page_num}")]
pub async fn survey_page(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<u32>,
) -> ApiResult<HttpResponse> {
    let Some(email) = session.respondent()? else {
        return Ok(see_other("/"));
    };

    match state.survey.page(&email, path.into_inner()).await? {
        PageLookup::Page(view) => Ok(HttpResponse::Ok().json(SurveyPageBody {
            page: view.page,
            total: view.total,
            poem: view.poem.into(),
            answers: view.sheet,
        })),
        PageLookup::Completed => Ok(see_other("/thank-you")),
        PageLookup::Reassess => Ok(see_other("/survey")),
    }
}

/// Store a page's answers and advance.
#[utoipa::path(
    post,
    path = "/survey/{page_num}",
    params(("page_num" = u32, Path, description = "1-based page number")),
    request_body = PageSubmission,
    responses(
        (status = 303, description = "Answers stored; redirect to the next page or completion"),
        (status = 400, description = "Rating outside the closed scale", body = Error)
    ),
    tags = ["survey"]
)]
#[post("/survey/{page_num}")]
pub async fn submit_page(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<u32>,
    payload: web::Json<PageSubmission>,
) -> ApiResult<HttpResponse> {
    let Some(email) = session.respondent()? else {
        return Ok(see_other("/"));
    };

    let sheet = RatingSheet::try_from(payload.into_inner())?;
    let target = match state
        .survey
        .submit(&email, path.into_inner(), sheet)
        .await?
    {
        SubmitOutcome::Advance { next_page } => page_location(next_page),
        SubmitOutcome::Finished | SubmitOutcome::Completed => "/thank-you".to_owned(),
        SubmitOutcome::Reassess => "/survey".to_owned(),
    };
    Ok(see_other(&target))
}

/// Completion page.
#[utoipa::path(
    get,
    path = "/thank-you",
    responses((status = 200, description = "Completion message")),
    tags = ["survey"]
)]
#[get("/thank-you")]
pub async fn thank_you() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Thank you for completing the survey. Your responses have been recorded.",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;

    use crate::inbound::http::test_utils::{memory_state, seeded_store, test_session_middleware};

    fn test_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(test_session_middleware())
            .app_data(state)
            .service(crate::inbound::http::home::register)
            .service(survey_start)
            .service(survey_page)
            .service(submit_page)
            .service(thank_you)
    }

    async fn registered_cookie(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    ) -> actix_web::cookie::Cookie<'static> {
        let res = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/")
                .set_json(serde_json::json!({ "email": "ada@example.org" }))
                .to_request(),
        )
        .await;
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    fn location(res: &actix_web::dev::ServiceResponse) -> String {
        res.headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .expect("location header")
            .to_owned()
    }

    #[rstest]
    #[case("/survey")]
    #[case("/survey/1")]
    #[actix_web::test]
    async fn survey_routes_require_identity(#[case] uri: &str) {
        let store = seeded_store(2).await;
        let app = test::init_service(test_app(memory_state(&store, 2))).await;

        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/");
    }

    #[actix_web::test]
    async fn first_visit_assigns_and_starts_at_page_one() {
        let store = seeded_store(2).await;
        let app = test::init_service(test_app(memory_state(&store, 2))).await;
        let cookie = registered_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/survey")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/survey/1");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/survey/1")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: SurveyPageBody = test::read_body_json(res).await;
        assert_eq!(body.page, 1);
        assert_eq!(body.total, 2);
        assert_eq!(body.answers, RatingSheet::default());
    }

    #[actix_web::test]
    async fn submitting_pages_walks_to_completion() {
        let store = seeded_store(2).await;
        let app = test::init_service(test_app(memory_state(&store, 2))).await;
        let cookie = registered_cookie(&app).await;

        test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/survey")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;

        let answers = serde_json::json!({
            "clarity": "Likely",
            "devices": "Not Sure",
            "punctuation": "Very Likely",
            "grammar": "Likely",
            "originality": "Unlikely",
            "extra": "lovely",
        });

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/survey/1")
                .cookie(cookie.clone())
                .set_json(&answers)
                .to_request(),
        )
        .await;
        assert_eq!(location(&res), "/survey/2");

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/survey/2")
                .cookie(cookie.clone())
                .set_json(&answers)
                .to_request(),
        )
        .await;
        assert_eq!(location(&res), "/thank-you");

        // The entry decision now reports completion.
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/survey")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(location(&res), "/thank-you");
    }

    #[actix_web::test]
    async fn ratings_outside_the_scale_are_rejected() {
        let store = seeded_store(2).await;
        let app = test::init_service(test_app(memory_state(&store, 2))).await;
        let cookie = registered_cookie(&app).await;

        test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/survey")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/survey/1")
                .cookie(cookie)
                .set_json(serde_json::json!({ "clarity": "Extremely Likely" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], "clarity");
    }

    #[actix_web::test]
    async fn out_of_range_page_redirects_to_entry_decision() {
        let store = seeded_store(2).await;
        let app = test::init_service(test_app(memory_state(&store, 2))).await;
        let cookie = registered_cookie(&app).await;

        test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/survey")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/survey/99")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/survey");
    }
}
