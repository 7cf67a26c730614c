//! End-to-end survey flow over in-memory adapters.
//!
//! Drives the real handlers through Actix's test harness: registration,
//! assignment, page-by-page submission, resumption, and completion.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};

use backend::domain::ports::{DraftRepository, PoemRepository, ResponseRepository, SlotRepository};
use backend::domain::{
    PANEL_SIZE, Poem, PoemId, RespondentEmail, SlotId, SurveyService, SurveySlot,
};
use backend::inbound::http::home::{home, preliminaries, register};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::survey::{submit_page, survey_page, survey_start, thank_you};
use backend::middleware::Trace;
use backend::outbound::memory::MemoryStore;

fn full_answers() -> serde_json::Value {
    serde_json::json!({
        "clarity": "Likely",
        "devices": "Not Sure",
        "punctuation": "Very Likely",
        "grammar": "Likely",
        "originality": "Unlikely",
        "extra": "reads well aloud",
    })
}

/// Store with a catalog of `2 * PANEL_SIZE` poems, one gold slot over the
/// first panel-worth of ids and one regular slot over the second.
async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let panel = PANEL_SIZE as i32;

    let poems: Vec<Poem> = (1..=2 * panel)
        .map(|id| Poem::new(PoemId::new(id), format!("poem body {id}")))
        .collect();
    store.insert_catalog(&poems).await.expect("seed poems");

    let gold: Vec<PoemId> = (1..=panel).map(PoemId::new).collect();
    let regular: Vec<PoemId> = (panel + 1..=2 * panel).map(PoemId::new).collect();
    store
        .insert_pool(&[
            SurveySlot::new(SlotId::new(1), gold, true, 0),
            SurveySlot::new(SlotId::new(2), regular, false, 0),
        ])
        .await
        .expect("seed slots");
    store
}

fn survey_app(
    store: &Arc<MemoryStore>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let service = SurveyService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    App::new()
        .app_data(web::Data::new(HttpState::new(Arc::new(service))))
        .wrap(Trace)
        .wrap(session)
        .service(home)
        .service(register)
        .service(preliminaries)
        .service(survey_start)
        .service(survey_page)
        .service(submit_page)
        .service(thank_you)
}

async fn register_respondent<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/")
            .set_json(serde_json::json!({ "email": email }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
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

async fn get_redirect<S>(app: &S, uri: &str, cookie: &Cookie<'static>) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(uri)
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER, "GET {uri}");
    location(&res)
}

async fn post_page<S>(app: &S, page: u32, cookie: &Cookie<'static>) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/survey/{page}"))
            .cookie(cookie.clone())
            .set_json(full_answers())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER, "POST /survey/{page}");
    location(&res)
}

#[actix_web::test]
async fn full_flow_registers_rates_and_completes() {
    let store = seeded_store().await;
    let app = test::init_service(survey_app(&store)).await;
    let cookie = register_respondent(&app, "ada@example.org").await;
    let ada = RespondentEmail::new("ada@example.org").expect("valid email");

    // Preliminaries are reachable once registered.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/preliminaries")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    // Entry decision assigns a panel and points at page 1.
    assert_eq!(get_redirect(&app, "/survey", &cookie).await, "/survey/1");
    let drafts = store.list_for_email(&ada).await.expect("drafts");
    assert_eq!(drafts.len(), PANEL_SIZE as usize);
    assert!(drafts.iter().all(|d| !d.is_answered()));

    // The first respondent receives the gold slot's panel.
    let first_poem: Vec<i32> = drafts.iter().take(1).map(|d| d.poem_id.get()).collect();
    assert_eq!(first_poem, vec![1]);

    // Walk every page; each submission chains to the next.
    for page in 1..=PANEL_SIZE {
        let target = post_page(&app, page, &cookie).await;
        if page < PANEL_SIZE {
            assert_eq!(target, format!("/survey/{}", page + 1));
        } else {
            assert_eq!(target, "/thank-you");
        }
    }

    // Finalisation emptied the drafts and filled the responses.
    assert!(store.list_for_email(&ada).await.expect("drafts").is_empty());
    assert_eq!(
        store.count_for_email(&ada).await.expect("count"),
        u64::from(PANEL_SIZE)
    );

    // Coming back now lands on the completion page.
    assert_eq!(get_redirect(&app, "/survey", &cookie).await, "/thank-you");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/thank-you")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn interrupted_respondent_resumes_where_they_left_off() {
    let store = seeded_store().await;
    let app = test::init_service(survey_app(&store)).await;
    let cookie = register_respondent(&app, "ada@example.org").await;

    assert_eq!(get_redirect(&app, "/survey", &cookie).await, "/survey/1");
    for page in 1..=3 {
        post_page(&app, page, &cookie).await;
    }

    // The entry decision re-derives the resume page from the drafts.
    assert_eq!(get_redirect(&app, "/survey", &cookie).await, "/survey/4");

    // The same email in a fresh browser session resumes identically.
    let second_cookie = register_respondent(&app, "ada@example.org").await;
    assert_eq!(
        get_redirect(&app, "/survey", &second_cookie).await,
        "/survey/4"
    );
}

#[actix_web::test]
async fn exhausted_pool_reports_service_unavailable() {
    let store = Arc::new(MemoryStore::new());
    let poems: Vec<Poem> = (1..=PANEL_SIZE as i32)
        .map(|id| Poem::new(PoemId::new(id), format!("poem body {id}")))
        .collect();
    store.insert_catalog(&poems).await.expect("seed poems");
    // No slots at all.

    let app = test::init_service(survey_app(&store)).await;
    let cookie = register_respondent(&app, "ada@example.org").await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/survey")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "service_unavailable");
    assert_eq!(body["message"], "no survey slots available");
}

#[actix_web::test]
async fn gold_panels_are_exhausted_before_regular_ones() {
    let store = seeded_store().await;
    let app = test::init_service(survey_app(&store)).await;

    let mut first_poems = Vec::new();
    for email in [
        "first@example.org",
        "second@example.org",
        "third@example.org",
    ] {
        let cookie = register_respondent(&app, email).await;
        assert_eq!(get_redirect(&app, "/survey", &cookie).await, "/survey/1");
        let who = RespondentEmail::new(email).expect("valid email");
        let drafts = store.list_for_email(&who).await.expect("drafts");
        first_poems.push(drafts.first().map(|d| d.poem_id.get()).expect("one draft"));
    }

    // Respondents one and two share the gold panel (first poem id 1); the
    // third falls through to the regular slot.
    assert_eq!(first_poems, vec![1, 1, PANEL_SIZE as i32 + 1]);
}
