//! PostgreSQL persistence adapters built on Diesel.
//!
//! Each repository port gets one adapter over a shared async connection
//! pool. Row structs and the table DSL stay private to this module; only
//! domain types cross the boundary.

mod diesel_draft_repository;
mod diesel_helpers;
mod diesel_poem_repository;
mod diesel_response_repository;
mod diesel_slot_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_draft_repository::DieselDraftRepository;
pub use diesel_poem_repository::DieselPoemRepository;
pub use diesel_response_repository::DieselResponseRepository;
pub use diesel_slot_repository::DieselSlotRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
