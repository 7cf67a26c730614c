//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::warn;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::SurveyService;
use crate::domain::ports::{PoemRepository, SlotRepository, SurveyFlow};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::home::{home, preliminaries, register};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::survey::{submit_page, survey_page, survey_start, thank_you};
use crate::middleware::Trace;
use crate::outbound::memory::MemoryStore;
use crate::outbound::persistence::{
    DbPool, DieselDraftRepository, DieselPoemRepository, DieselResponseRepository,
    DieselSlotRepository,
};

/// Port bundle built from the configured persistence backend.
///
/// The catalog and pool handles are exposed alongside the flow so startup
/// seeding reaches the same stores the handlers use.
pub struct SurveyPorts {
    /// Survey flow use-cases for the HTTP layer.
    pub flow: Arc<dyn SurveyFlow>,
    /// Poem catalog handle for seeding.
    pub poems: Arc<dyn PoemRepository>,
    /// Slot pool handle for seeding.
    pub slots: Arc<dyn SlotRepository>,
}

/// Build the survey ports over PostgreSQL when a pool is available,
/// otherwise over a process-local in-memory store.
#[must_use]
pub fn build_survey_ports(db_pool: Option<DbPool>) -> SurveyPorts {
    match db_pool {
        Some(pool) => {
            let poems = Arc::new(DieselPoemRepository::new(pool.clone()));
            let slots = Arc::new(DieselSlotRepository::new(pool.clone()));
            let drafts = Arc::new(DieselDraftRepository::new(pool.clone()));
            let responses = Arc::new(DieselResponseRepository::new(pool));
            let flow = SurveyService::new(poems.clone(), slots.clone(), drafts, responses);
            SurveyPorts {
                flow: Arc::new(flow),
                poems,
                slots,
            }
        }
        None => {
            warn!("no database configured, survey state is process-local");
            let store = Arc::new(MemoryStore::new());
            let flow =
                SurveyService::new(store.clone(), store.clone(), store.clone(), store.clone());
            SurveyPorts {
                flow: Arc::new(flow),
                poems: store.clone(),
                slots: store,
            }
        }
    }
}

struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .wrap(session)
        .service(home)
        .service(register)
        .service(preliminaries)
        .service(survey_start)
        .service(survey_page)
        .service(submit_page)
        .service(thank_you)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct the Actix HTTP server.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
    flow: Arc<dyn SurveyFlow>,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(HttpState::new(flow));
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
