//! Optional startup seeding of the poem catalog and slot pool.
//!
//! The survey expects both to be loaded externally; this module covers
//! development and first-deploy environments by seeding them from a JSON
//! registry when enabled through the environment.

mod config;
mod startup;

pub use config::SeedSettings;
pub use startup::{SeedError, SeedOutcome, seed_on_startup};
