//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::web;

use crate::domain::ports::{PoemRepository, SlotRepository};
use crate::domain::{Poem, PoemId, SlotId, SurveySlot, SurveyService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::MemoryStore;

/// Build a session middleware configured for tests.
///
/// Generates a fresh signing key per invocation and disables the `Secure`
/// flag for plain-HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// A memory store with `panel_size` poems and one regular slot over them.
pub async fn seeded_store(panel_size: u32) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let ids: Vec<PoemId> = (1..=panel_size as i32).map(PoemId::new).collect();
    let poems: Vec<Poem> = ids
        .iter()
        .map(|id| Poem::new(*id, format!("poem body {id}")))
        .collect();
    store.insert_catalog(&poems).await.expect("seed poems");
    store
        .insert_pool(&[SurveySlot::new(SlotId::new(1), ids, false, 0)])
        .await
        .expect("seed slot");
    store
}

/// HTTP state backed by a [`MemoryStore`] survey service.
pub fn memory_state(store: &Arc<MemoryStore>, panel_size: u32) -> web::Data<HttpState> {
    let service = SurveyService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    )
    .with_panel_size(panel_size);
    web::Data::new(HttpState::new(Arc::new(service)))
}
