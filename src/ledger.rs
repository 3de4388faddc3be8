// 📒 Ledger Store - world state + append-only history per key
//
// The contract never talks to a concrete database. It sees a store that can
// answer "what is the value now", "what values did this key ever have" and
// accept a committed write set. Backends: `MemoryLedger` (here) and
// `SqliteLedger` (db.rs).

use crate::db::Event;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

// ============================================================================
// KEY MODIFICATION
// ============================================================================

/// One committed write to a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyModification {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: Vec<u8>,
    /// Always false for cars; kept so history entries carry the full shape.
    pub is_delete: bool,
}

// ============================================================================
// WRITE SET
// ============================================================================

/// Writes buffered by one transaction, applied by `LedgerStore::commit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSet {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    /// In first-write order; a key appears at most once.
    pub writes: Vec<(String, Vec<u8>)>,
}

impl WriteSet {
    pub fn new(tx_id: String, timestamp: DateTime<Utc>) -> Self {
        WriteSet {
            tx_id,
            timestamp,
            writes: Vec::new(),
        }
    }

    /// Buffer a write; a second write to the same key replaces the first.
    pub fn put(&mut self, key: &str, value: Vec<u8>) {
        match self.writes.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.writes.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.writes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn modification(&self, value: &[u8]) -> KeyModification {
        KeyModification {
            tx_id: self.tx_id.clone(),
            timestamp: self.timestamp,
            value: value.to_vec(),
            is_delete: false,
        }
    }
}

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Key-value store with history, as provided by the hosting ledger.
pub trait LedgerStore {
    /// Current value of a key, `None` if it was never written.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Every committed modification of a key, oldest first.
    fn history_for_key(&self, key: &str) -> Result<Vec<KeyModification>>;

    /// All keys with a current value, sorted.
    fn keys(&self) -> Result<Vec<String>>;

    /// Apply a write set atomically: all writes land or none do.
    fn commit(&mut self, write_set: &WriteSet) -> Result<()>;

    /// Append an entry to the audit trail.
    fn record_event(&mut self, event: &Event) -> Result<()>;

    /// Audit trail for one entity, oldest first.
    fn events_for_entity(&self, entity_type: &str, entity_id: &str) -> Result<Vec<Event>>;
}

// ============================================================================
// MEMORY LEDGER
// ============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    world: BTreeMap<String, Vec<u8>>,
    history: HashMap<String, Vec<KeyModification>>,
    events: Vec<Event>,
}

/// In-memory ledger - stands in for the platform's mock stub.
///
/// Clones share the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| anyhow!("memory ledger lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| anyhow!("memory ledger lock poisoned"))
    }
}

impl LedgerStore for MemoryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read()?.world.get(key).cloned())
    }

    fn history_for_key(&self, key: &str) -> Result<Vec<KeyModification>> {
        Ok(self.read()?.history.get(key).cloned().unwrap_or_default())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.read()?.world.keys().cloned().collect())
    }

    fn commit(&mut self, write_set: &WriteSet) -> Result<()> {
        let mut state = self.write()?;

        for (key, value) in &write_set.writes {
            state.world.insert(key.clone(), value.clone());
            state
                .history
                .entry(key.clone())
                .or_default()
                .push(write_set.modification(value));
        }

        Ok(())
    }

    fn record_event(&mut self, event: &Event) -> Result<()> {
        self.write()?.events.push(event.clone());
        Ok(())
    }

    fn events_for_entity(&self, entity_type: &str, entity_id: &str) -> Result<Vec<Event>> {
        Ok(self
            .read()?
            .events
            .iter()
            .filter(|e| e.entity_type == entity_type && e.entity_id == entity_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================
