use core::error;
use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use jokenpo_common::model::record::{RoundRecord, Stats};
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::engine::GameState;

pub const STATS_KEY: &str = "jokenpoStats";
pub const HISTORY_KEY: &str = "jokenpoHistory";

const SCHEMA: &str = include_str!("../../../sql/create_tables.sql");

pub type Result<T> = std::result::Result<T, Box<dyn error::Error + Send + Sync>>;

/// String key-value storage the game state is saved into.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().map_err(|e| e.to_string())?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().map_err(|e| e.to_string())?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// SQLite-backed store. Opens a connection per call.
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Creates the table if needed.
    pub fn open(db_path: impl Into<String>) -> Result<Self> {
        let store = SqliteStore {
            db_path: db_path.into(),
        };
        store.connection()?.execute_batch(SCHEMA)?;
        Ok(store)
    }

    fn connection(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db_path)?)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .connection()?
            .query_row("SELECT value FROM key_value WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.connection()?.execute(
            "INSERT INTO key_value (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, value),
        )?;
        Ok(())
    }
}

/// Writes stats and full round history.
pub fn save_state(store: &dyn KeyValueStore, state: &GameState) -> Result<()> {
    store.set(STATS_KEY, &serde_json::to_string(&state.stats())?)?;
    store.set(HISTORY_KEY, &serde_json::to_string(state.game_history())?)?;
    Ok(())
}

/// Restores saved state. Never fails: anything missing or unreadable starts fresh.
pub fn load_state(store: &dyn KeyValueStore) -> GameState {
    let stats = load_value::<Stats>(store, STATS_KEY)
        .filter(|stats| {
            let consistent = stats.is_consistent();
            if !consistent {
                warn!("Saved stats {:?} do not add up, starting from zero", stats);
            }
            consistent
        })
        .unwrap_or_default();
    let history = load_value::<VecDeque<RoundRecord>>(store, HISTORY_KEY).unwrap_or_default();
    debug!(
        "Loaded {} rounds of history, stats {:?}",
        history.len(),
        stats
    );
    GameState::restore(stats, history)
}

fn load_value<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let text = match store.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!("Nothing saved under {}", key);
            return None;
        }
        Err(e) => {
            warn!("Failed to read {}: {}", key, e);
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed {}: {}", key, e);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use jokenpo_agent::opponent::Opponent;
    use jokenpo_common::model::game::Move;
    use uuid::Uuid;

    use super::*;

    // Every call fails, like a database that has gone away
    pub(crate) struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Err(format!("cannot read {}", key).into())
        }

        fn set(&self, key: &str, _value: &str) -> Result<()> {
            Err(format!("cannot write {}", key).into())
        }
    }

    fn temp_db() -> String {
        let db_path = std::env::temp_dir().join(format!("jokenpo_test_{}.db", Uuid::new_v4()));
        db_path.to_str().unwrap().to_string()
    }

    fn played_state() -> GameState {
        let mut state = GameState::new();
        let mut opponent = Opponent::new(Some(21));
        for m in [Move::Rock, Move::Paper, Move::Scissors, Move::Rock] {
            state.play_round(m, &mut opponent, "09:30:00".to_owned());
        }
        state
    }

    #[test]
    fn empty_store_loads_defaults() {
        let state = load_state(&MemoryStore::new());
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn memory_store_saves_and_loads() {
        let store = MemoryStore::new();
        let state = played_state();
        save_state(&store, &state).unwrap();
        let loaded = load_state(&store);
        assert_eq!(loaded.stats(), state.stats());
        assert_eq!(loaded.game_history(), state.game_history());
        assert!(loaded.move_history().is_empty());
    }

    #[test]
    fn malformed_values_fall_back() {
        let store = MemoryStore::new();
        store.set(STATS_KEY, "{not json").unwrap();
        store.set(HISTORY_KEY, "[{\"player\":\"lizard\"}]").unwrap();
        assert_eq!(load_state(&store), GameState::new());
    }

    #[test]
    fn inconsistent_stats_fall_back() {
        let store = MemoryStore::new();
        store
            .set(STATS_KEY, r#"{"wins":1,"losses":0,"draws":1,"total":1}"#)
            .unwrap();
        assert_eq!(load_state(&store).stats(), Stats::default());
    }

    #[test]
    fn store_errors_load_defaults() {
        assert_eq!(load_state(&FailingStore), GameState::new());
        assert!(save_state(&FailingStore, &played_state()).is_err());
    }

    #[test]
    fn full_saved_stats_keep_playing() {
        let store = MemoryStore::new();
        store
            .set(
                STATS_KEY,
                r#"{"wins":4294967295,"losses":0,"draws":0,"total":4294967295}"#,
            )
            .unwrap();
        let mut state = load_state(&store);
        let mut opponent = Opponent::new(Some(9));
        state.play_round(Move::Rock, &mut opponent, "10:00:00".to_owned());
        assert_eq!(state.stats().total, u32::MAX);
        assert!(state.stats().is_consistent());
        assert_eq!(state.game_history().len(), 1);
        save_state(&store, &state).unwrap();
        assert_eq!(load_state(&store).stats(), state.stats());
    }

    #[test]
    fn exported_game_loads() {
        let store = MemoryStore::new();
        store
            .set(STATS_KEY, r#"{"wins":1,"losses":0,"draws":0,"total":1}"#)
            .unwrap();
        store
            .set(
                HISTORY_KEY,
                r#"[{"player":"paper","computer":"rock","result":"win","timestamp":"8:15:02 PM"}]"#,
            )
            .unwrap();
        let state = load_state(&store);
        assert_eq!(state.stats().wins, 1);
        assert_eq!(state.game_history()[0].opponent_move, Move::Rock);
    }

    #[test]
    fn sqlite_store_round_trip() {
        let db_path = temp_db();
        let state = played_state();
        {
            let store = SqliteStore::open(&db_path).unwrap();
            save_state(&store, &state).unwrap();
        }
        let store = SqliteStore::open(&db_path).unwrap();
        let loaded = load_state(&store);
        assert_eq!(loaded.stats(), state.stats());
        assert_eq!(loaded.game_history(), state.game_history());
        let _ = std::fs::remove_file(db_path);
    }

    #[test]
    fn sqlite_set_overwrites() {
        let db_path = temp_db();
        let store = SqliteStore::open(&db_path).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("two".to_owned()));
        let _ = std::fs::remove_file(db_path);
    }
}
