//! Save/continue persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Corruption detection: anything unreadable is logged and treated as no save

use serde::{Deserialize, Serialize};

use crate::error::SaveError;
use crate::platform::storage::KeyValueStore;
use crate::sim::state::{Checkpoint, Stats};

/// Storage key for the single save slot
pub const SAVE_KEY: &str = "jungleQuest2026_save";
/// Envelope version written by this build
pub const SAVE_VERSION: u32 = 1;

/// What a save restores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub stats: Stats,
    /// 1-based level number
    pub level: u32,
    pub checkpoint: Option<Checkpoint>,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    data: SaveData,
}

pub fn save(store: &dyn KeyValueStore, data: &SaveData) -> Result<(), SaveError> {
    let envelope = Envelope {
        version: SAVE_VERSION,
        data: data.clone(),
    };
    let json = serde_json::to_string(&envelope)?;
    store.set(SAVE_KEY, &json)?;
    log::info!("Game saved (level {})", data.level);
    Ok(())
}

/// The stored save, if there is a readable one
pub fn load(store: &dyn KeyValueStore) -> Option<SaveData> {
    let json = match store.get(SAVE_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            log::error!("Failed to read save: {}", e);
            return None;
        }
    };
    match serde_json::from_str::<Envelope>(&json) {
        Ok(envelope) if envelope.version == SAVE_VERSION => Some(envelope.data),
        Ok(envelope) => {
            log::warn!("Ignoring save with unsupported version {}", envelope.version);
            None
        }
        Err(e) => {
            log::error!("Failed to load save: {}", e);
            None
        }
    }
}

pub fn has_save(store: &dyn KeyValueStore) -> bool {
    load(store).is_some()
}

pub fn clear(store: &dyn KeyValueStore) -> Result<(), SaveError> {
    store.remove(SAVE_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;
    use crate::sim::state::Era;

    fn sample() -> SaveData {
        SaveData {
            stats: Stats {
                score: 4200,
                lives: 2,
                bananas: 17,
                keys: 5,
                quantum_energy: 64.5,
                timeline: Era::Future,
                total_time: 93_000.0,
            },
            level: 2,
            checkpoint: Some(Checkpoint {
                x: 1500.0,
                y: 320.0,
                level: 1,
            }),
            timestamp: 1_760_000_000_000,
        }
    }

    #[test]
    fn test_save_roundtrip() {
        let store = MemoryStore::new();
        assert!(!has_save(&store));
        save(&store, &sample()).unwrap();
        assert_eq!(load(&store), Some(sample()));
        clear(&store).unwrap();
        assert_eq!(load(&store), None);
    }

    #[test]
    fn test_stats_use_camel_case() {
        let store = MemoryStore::new();
        save(&store, &sample()).unwrap();
        let json = store.get(SAVE_KEY).unwrap().unwrap();
        assert!(json.contains("\"quantumEnergy\":64.5"));
        assert!(json.contains("\"timeline\":2048"));
    }

    #[test]
    fn test_corrupt_save_is_absent() {
        let store = MemoryStore::new();
        store.set(SAVE_KEY, "{\"version\":1,\"data\":").unwrap();
        assert_eq!(load(&store), None);

        store
            .set(SAVE_KEY, r#"{"version":1,"data":{"stats":{"timeline":1999}}}"#)
            .unwrap();
        assert_eq!(load(&store), None);
    }

    #[test]
    fn test_future_version_ignored() {
        let store = MemoryStore::new();
        save(&store, &sample()).unwrap();
        let json = store.get(SAVE_KEY).unwrap().unwrap().replace("\"version\":1", "\"version\":9");
        store.set(SAVE_KEY, &json).unwrap();
        assert_eq!(load(&store), None);
    }
}
