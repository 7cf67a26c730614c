//! Seeding settings sourced from the environment.

use std::env;
use std::path::PathBuf;

use tracing::warn;

/// Default number of gold slots; 7 slots of capacity 2 cover the first 14
/// respondents.
const DEFAULT_GOLD_SLOTS: u32 = 7;

/// Default number of regular slots.
const DEFAULT_REGULAR_SLOTS: u32 = 40;

/// Startup seeding configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSettings {
    /// Whether seeding runs at startup.
    pub is_enabled: bool,
    /// Path to the JSON poem registry.
    pub registry_path: Option<PathBuf>,
    /// Gold slots to generate.
    pub gold_slots: u32,
    /// Regular slots to generate.
    pub regular_slots: u32,
}

fn parse_count(var: &str, default: u32) -> u32 {
    match env::var(var) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(var, value = %raw, "not a count, using default");
            default
        }),
        Err(_) => default,
    }
}

impl SeedSettings {
    /// Read settings from `SURVEY_SEED_*` environment variables.
    ///
    /// Seeding stays disabled unless `SURVEY_SEED_ENABLED=1`.
    pub fn from_env() -> Self {
        Self {
            is_enabled: env::var("SURVEY_SEED_ENABLED").ok().as_deref() == Some("1"),
            registry_path: env::var("SURVEY_SEED_REGISTRY").ok().map(PathBuf::from),
            gold_slots: parse_count("SURVEY_SEED_GOLD_SLOTS", DEFAULT_GOLD_SLOTS),
            regular_slots: parse_count("SURVEY_SEED_REGULAR_SLOTS", DEFAULT_REGULAR_SLOTS),
        }
    }

    /// Settings with seeding switched off.
    pub fn disabled() -> Self {
        Self {
            is_enabled: false,
            registry_path: None,
            gold_slots: DEFAULT_GOLD_SLOTS,
            regular_slots: DEFAULT_REGULAR_SLOTS,
        }
    }
}
