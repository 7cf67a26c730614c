//! Startup seeding orchestration.

use std::path::PathBuf;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::info;

use crate::domain::ports::{PoemRepository, RepositoryError, SlotRepository};
use crate::domain::{PANEL_SIZE, Poem, PoemId, SlotId, SurveySlot};

use super::config::SeedSettings;

/// Errors returned while executing startup seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Seeding enabled without a registry path.
    #[error("SURVEY_SEED_REGISTRY must be set when seeding is enabled")]
    MissingRegistryPath,
    /// Registry file could not be read.
    #[error("failed to read registry at {path}: {source}")]
    RegistryRead {
        /// Path to the registry file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Registry parsing failed.
    #[error("registry parse error: {0}")]
    Registry(#[from] serde_json::Error),
    /// The registry is too small to fill one panel.
    #[error("registry holds {have} poems but a panel needs {need}")]
    NotEnoughPoems {
        /// Poems found in the registry.
        have: usize,
        /// Poems required per panel.
        need: usize,
    },
    /// Persisting seeded data failed.
    #[error("seeding store error: {0}")]
    Store(#[from] RepositoryError),
}

/// What startup seeding did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Catalog and pool were loaded.
    Seeded {
        /// Poems inserted.
        poems: usize,
        /// Slots inserted.
        slots: usize,
    },
    /// The catalog already holds data; nothing was touched.
    SkippedExisting,
}

/// One poem in the JSON registry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PoemSeed {
    poem_id: i32,
    content: String,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    source_type: Option<String>,
}

impl From<PoemSeed> for Poem {
    fn from(seed: PoemSeed) -> Self {
        Self {
            id: PoemId::new(seed.poem_id),
            content: seed.content,
            topic: seed.topic,
            source_type: seed.source_type,
        }
    }
}

fn parse_registry(raw: &str) -> Result<Vec<Poem>, SeedError> {
    let seeds: Vec<PoemSeed> = serde_json::from_str(raw)?;
    Ok(seeds.into_iter().map(Poem::from).collect())
}

/// Generate the slot pool: each slot is a random sample of `PANEL_SIZE`
/// distinct poem ids, gold slots first in the id sequence.
fn generate_pool(poems: &[Poem], gold_slots: u32, regular_slots: u32) -> Vec<SurveySlot> {
    let ids: Vec<PoemId> = poems.iter().map(|poem| poem.id).collect();
    let mut rng = SmallRng::from_entropy();
    let total = gold_slots + regular_slots;

    (1..=total)
        .map(|n| {
            let panel: Vec<PoemId> = ids
                .choose_multiple(&mut rng, PANEL_SIZE as usize)
                .copied()
                .collect();
            SurveySlot::new(SlotId::new(n as i32), panel, n <= gold_slots, 0)
        })
        .collect()
}

/// Apply seeding on startup when enabled.
///
/// Skips quietly when the catalog already holds poems, so restarting a
/// seeded deployment never duplicates data.
pub async fn seed_on_startup(
    settings: &SeedSettings,
    poems: &Arc<dyn PoemRepository>,
    slots: &Arc<dyn SlotRepository>,
) -> Result<Option<SeedOutcome>, SeedError> {
    if !settings.is_enabled {
        return Ok(None);
    }
    let path = settings
        .registry_path
        .as_ref()
        .ok_or(SeedError::MissingRegistryPath)?;

    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::RegistryRead {
            path: path.clone(),
            source,
        })?;
    let catalog = parse_registry(&raw)?;

    if poems.count().await? > 0 {
        info!("catalog already populated, skipping seeding");
        return Ok(Some(SeedOutcome::SkippedExisting));
    }
    if catalog.len() < PANEL_SIZE as usize {
        return Err(SeedError::NotEnoughPoems {
            have: catalog.len(),
            need: PANEL_SIZE as usize,
        });
    }

    poems.insert_catalog(&catalog).await?;
    let pool = generate_pool(&catalog, settings.gold_slots, settings.regular_slots);
    slots.insert_pool(&pool).await?;

    info!(
        poems = catalog.len(),
        slots = pool.len(),
        gold = settings.gold_slots,
        "survey data seeded"
    );
    Ok(Some(SeedOutcome::Seeded {
        poems: catalog.len(),
        slots: pool.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn catalog(n: i32) -> Vec<Poem> {
        (1..=n)
            .map(|id| Poem::new(PoemId::new(id), format!("poem body {id}")))
            .collect()
    }

    #[test]
    fn registry_parses_optional_metadata() {
        let raw = r#"[
            { "poemId": 1, "content": "quiet rivers", "topic": "nature" },
            { "poemId": 2, "content": "loud cities" }
        ]"#;
        let poems = parse_registry(raw).expect("valid registry");
        assert_eq!(poems.len(), 2);
        assert_eq!(poems.first().and_then(|p| p.topic.as_deref()), Some("nature"));
        assert_eq!(poems.get(1).and_then(|p| p.topic.as_deref()), None);
    }

    #[test]
    fn generated_panels_hold_distinct_ids_and_gold_comes_first() {
        let poems = catalog(30);
        let pool = generate_pool(&poems, 2, 3);
        assert_eq!(pool.len(), 5);

        let gold_ids: Vec<i32> = pool
            .iter()
            .filter(|slot| slot.is_gold())
            .map(|slot| slot.id().get())
            .collect();
        assert_eq!(gold_ids, vec![1, 2]);

        for slot in &pool {
            assert_eq!(slot.poem_ids().len(), PANEL_SIZE as usize);
            assert_eq!(slot.usage_count(), 0);
            let distinct: HashSet<i32> =
                slot.poem_ids().iter().map(|id| id.get()).collect();
            assert_eq!(distinct.len(), PANEL_SIZE as usize, "no repeats in a panel");
        }
    }

    #[tokio::test]
    async fn disabled_settings_are_a_no_op() {
        let store = Arc::new(crate::outbound::memory::MemoryStore::new());
        let poems: Arc<dyn PoemRepository> = store.clone();
        let slots: Arc<dyn SlotRepository> = store;

        let outcome = seed_on_startup(&SeedSettings::disabled(), &poems, &slots)
            .await
            .expect("no-op");
        assert_eq!(outcome, None);
    }

    #[tokio::test]
    async fn populated_catalog_skips_seeding() {
        let store = Arc::new(crate::outbound::memory::MemoryStore::new());
        store
            .insert_catalog(&catalog(1))
            .await
            .expect("pre-populate");
        let poems: Arc<dyn PoemRepository> = store.clone();
        let slots: Arc<dyn SlotRepository> = store;

        let registry = tempfile_registry().await;
        let settings = SeedSettings {
            is_enabled: true,
            registry_path: Some(registry.clone()),
            gold_slots: 1,
            regular_slots: 1,
        };
        let outcome = seed_on_startup(&settings, &poems, &slots)
            .await
            .expect("skip");
        assert_eq!(outcome, Some(SeedOutcome::SkippedExisting));

        let _ = tokio::fs::remove_file(registry).await;
    }

    async fn tempfile_registry() -> PathBuf {
        let seeds: Vec<serde_json::Value> = (1..=PANEL_SIZE as i32)
            .map(|id| serde_json::json!({ "poemId": id, "content": format!("poem body {id}") }))
            .collect();
        let path = std::env::temp_dir().join(format!(
            "survey-seed-registry-{}.json",
            std::process::id()
        ));
        tokio::fs::write(&path, serde_json::to_vec(&seeds).expect("serialise"))
            .await
            .expect("write registry");
        path
    }
}
