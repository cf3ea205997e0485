//! Versioned envelopes for client-local blobs.
//!
//! Blobs are stored as `{ "version": N, "data": ... }`. Anything without that
//! shape is a legacy blob and is treated as version 0. On load, the migration
//! registered for each stored version is applied in turn until the current
//! version is reached. Blobs written by a newer client are rejected rather
//! than guessed at.

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::store_traits::LocalStore;
use crate::errors::{Result, StorageError};

/// Upgrades the payload of one version to the next.
pub type MigrationFn = fn(Value) -> Result<Value>;

/// A record persisted under a fixed key with a schema version.
pub trait VersionedRecord: Serialize + DeserializeOwned {
    const STORAGE_KEY: &'static str;
    const CURRENT_VERSION: u32;

    /// Migrations keyed by the version they upgrade from.
    fn migrations() -> &'static [(u32, MigrationFn)];
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    data: Value,
}

/// Splits a raw blob into its version and payload.
fn open_envelope(raw: Value) -> (u32, Value) {
    let is_envelope = raw.as_object().is_some_and(|o| {
        o.len() == 2 && o.contains_key("data") && o.get("version").is_some_and(Value::is_u64)
    });
    if !is_envelope {
        return (0, raw);
    }
    match serde_json::from_value::<Envelope>(raw.clone()) {
        Ok(envelope) => (envelope.version, envelope.data),
        Err(_) => (0, raw),
    }
}

/// Brings `data` from `version` up to `T::CURRENT_VERSION`.
pub fn migrate_to_current<T: VersionedRecord>(mut version: u32, mut data: Value) -> Result<Value> {
    if version > T::CURRENT_VERSION {
        return Err(StorageError::UnsupportedVersion {
            key: T::STORAGE_KEY.to_string(),
            found: version,
            supported: T::CURRENT_VERSION,
        }
        .into());
    }
    while version < T::CURRENT_VERSION {
        let migrate = T::migrations()
            .iter()
            .find(|(from, _)| *from == version)
            .map(|(_, f)| *f)
            .ok_or(StorageError::MissingMigration(version))?;
        data = migrate(data)?;
        version += 1;
        info!("Migrated '{}' to version {}", T::STORAGE_KEY, version);
    }
    Ok(data)
}

/// Loads and upgrades the record, or `None` when nothing is stored.
pub fn load_versioned<T: VersionedRecord>(store: &dyn LocalStore) -> Result<Option<T>> {
    let Some(raw) = store.get(T::STORAGE_KEY)? else {
        return Ok(None);
    };
    let corrupt = |message: String| StorageError::Corrupt {
        key: T::STORAGE_KEY.to_string(),
        message,
    };

    let value: Value = serde_json::from_str(&raw).map_err(|e| corrupt(e.to_string()))?;
    let (version, data) = open_envelope(value);
    debug!("Loading '{}' stored at version {}", T::STORAGE_KEY, version);

    let data = migrate_to_current::<T>(version, data)?;
    let record = serde_json::from_value(data).map_err(|e| corrupt(e.to_string()))?;
    Ok(Some(record))
}

/// Writes the record wrapped in a current-version envelope.
pub fn save_versioned<T: VersionedRecord>(store: &dyn LocalStore, record: &T) -> Result<()> {
    let envelope = Envelope {
        version: T::CURRENT_VERSION,
        data: serde_json::to_value(record)?,
    };
    let raw = serde_json::to_string(&envelope)?;
    store.set(T::STORAGE_KEY, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::storage::MemoryLocalStore;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
        label: String,
    }

    fn v0_to_v1(data: Value) -> Result<Value> {
        Ok(json!({ "count": data.as_u64().unwrap_or(0) }))
    }

    fn v1_to_v2(mut data: Value) -> Result<Value> {
        data["label"] = json!("default");
        Ok(data)
    }

    const COUNTER_MIGRATIONS: &[(u32, MigrationFn)] = &[(0, v0_to_v1), (1, v1_to_v2)];

    impl VersionedRecord for Counter {
        const STORAGE_KEY: &'static str = "counter";
        const CURRENT_VERSION: u32 = 2;

        fn migrations() -> &'static [(u32, MigrationFn)] {
            COUNTER_MIGRATIONS
        }
    }

    #[test]
    fn test_legacy_blob_runs_every_migration() {
        let store = MemoryLocalStore::new();
        store.set("counter", "7").unwrap();

        let loaded: Counter = load_versioned(&store).unwrap().unwrap();
        assert_eq!(
            loaded,
            Counter {
                count: 7,
                label: "default".into()
            }
        );
    }

    #[test]
    fn test_intermediate_version_runs_remaining_migrations() {
        let store = MemoryLocalStore::new();
        store
            .set("counter", r#"{"version":1,"data":{"count":3}}"#)
            .unwrap();
        let loaded: Counter = load_versioned(&store).unwrap().unwrap();
        assert_eq!(loaded.count, 3);
        assert_eq!(loaded.label, "default");
    }

    #[test]
    fn test_save_then_load_is_identity() {
        let store = MemoryLocalStore::new();
        let record = Counter {
            count: 1,
            label: "x".into(),
        };
        save_versioned(&store, &record).unwrap();

        let raw: Value = serde_json::from_str(&store.get("counter").unwrap().unwrap()).unwrap();
        assert_eq!(raw["version"], json!(2));
        assert_eq!(load_versioned::<Counter>(&store).unwrap(), Some(record));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let store = MemoryLocalStore::new();
        store
            .set("counter", r#"{"version":9,"data":{"count":3}}"#)
            .unwrap();
        assert!(matches!(
            load_versioned::<Counter>(&store),
            Err(Error::Storage(StorageError::UnsupportedVersion { found: 9, supported: 2, .. }))
        ));
    }

    #[test]
    fn test_missing_and_corrupt_blobs() {
        let store = MemoryLocalStore::new();
        assert_eq!(load_versioned::<Counter>(&store).unwrap(), None);

        store.set("counter", "{not json").unwrap();
        assert!(matches!(
            load_versioned::<Counter>(&store),
            Err(Error::Storage(StorageError::Corrupt { .. }))
        ));
    }
}
