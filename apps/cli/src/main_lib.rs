use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde_json::Value;
use studyshare_backend::{BackendConfig, RestClient};
use studyshare_core::browse::{BrowseService, BrowseServiceTrait};
use studyshare_core::listing::ListingConfig;
use studyshare_core::materials::{MaterialService, MaterialServiceTrait};
use studyshare_core::planner::PlannerService;
use studyshare_core::query::{DataClient, MemoryDataClient};
use studyshare_core::requests::RequestService;
use studyshare_core::revision::RevisionService;
use studyshare_core::stats::{StatsService, StatsServiceTrait};
use studyshare_core::storage::{FileLocalStore, LocalStore};
use studyshare_core::thanks::{ThanksService, ThanksServiceTrait};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// File in the data directory that seeds the offline collaborator.
pub const OFFLINE_FIXTURE: &str = "offline.json";

pub struct AppState {
    pub materials: Arc<dyn MaterialServiceTrait>,
    pub browse: Arc<dyn BrowseServiceTrait>,
    pub requests: Arc<RequestService>,
    pub thanks: Arc<dyn ThanksServiceTrait>,
    pub stats: Arc<dyn StatsServiceTrait>,
    pub planner: PlannerService,
    pub revision: RevisionService,
    pub listing_config: ListingConfig,
    pub coalesce_window: std::time::Duration,
    /// `None` in offline mode; realtime needs a live backend.
    pub backend: Option<BackendConfig>,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn build_state(config: &Config, offline: bool) -> anyhow::Result<Arc<AppState>> {
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("Could not create data directory {}", config.data_dir.display())
    })?;

    let (client, backend): (Arc<dyn DataClient>, Option<BackendConfig>) = if offline {
        let client = load_offline_client(&config.data_dir.join(OFFLINE_FIXTURE))?;
        tracing::info!("Running offline against {}", OFFLINE_FIXTURE);
        (Arc::new(client), None)
    } else {
        let backend = config.backend()?;
        let client = RestClient::new(&backend)?;
        tracing::info!("Using backend at {}", backend.api_url);
        (Arc::new(client), Some(backend))
    };

    let store: Arc<dyn LocalStore> = Arc::new(FileLocalStore::in_dir(&config.data_dir));
    tracing::debug!("Local state file: {}", config.data_dir.display());

    Ok(Arc::new(AppState {
        materials: Arc::new(MaterialService::new(client.clone())),
        browse: Arc::new(BrowseService::new(client.clone())),
        requests: Arc::new(RequestService::new(client.clone())),
        thanks: Arc::new(ThanksService::new(client.clone())),
        stats: Arc::new(StatsService::new(client)),
        planner: PlannerService::new(store.clone()),
        revision: RevisionService::new(store),
        listing_config: ListingConfig {
            debounce: config.debounce,
            ..ListingConfig::default()
        },
        coalesce_window: config.coalesce_window,
        backend,
    }))
}

/// Seeds an in-memory collaborator from `{ "table": [rows...] }`.
///
/// A missing fixture yields empty tables.
pub fn load_offline_client(path: &Path) -> anyhow::Result<MemoryDataClient> {
    let client = MemoryDataClient::new();
    if !path.exists() {
        tracing::warn!("No offline fixture at {}; tables are empty", path.display());
        return Ok(client);
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    let tables: HashMap<String, Vec<Value>> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid offline fixture {}", path.display()))?;
    for (table, rows) in tables {
        tracing::debug!("Seeding {} row(s) into '{}'", rows.len(), table);
        client.seed(&table, rows)?;
    }
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use studyshare_core::query::SelectQuery;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_offline_fixture_seeds_tables() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(OFFLINE_FIXTURE);
        std::fs::write(
            &path,
            r#"{ "notes": [{ "id": 1, "title": "Algebra" }], "requests": [] }"#,
        )
        .unwrap();

        let client = load_offline_client(&path).unwrap();
        let rows = client.select(&SelectQuery::new("notes")).await.unwrap();
        assert_eq!(rows.len(), 1);

        let empty = load_offline_client(&dir.path().join("missing.json")).unwrap();
        assert!(empty.select(&SelectQuery::new("notes")).await.unwrap().is_empty());
    }

    #[test]
    fn test_build_state_offline_needs_no_credentials() {
        let dir = tempdir().unwrap();
        let config = Config {
            api_url: None,
            api_key: None,
            data_dir: dir.path().join("data"),
            log_format: "text".into(),
            debounce: std::time::Duration::from_millis(10),
            coalesce_window: std::time::Duration::from_millis(10),
        };
        let state = build_state(&config, true).unwrap();
        assert!(state.backend.is_none());
        assert_eq!(state.listing_config.debounce.as_millis(), 10);
        assert!(build_state(&config, false).is_err());
    }
}
