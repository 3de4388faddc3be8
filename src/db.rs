use crate::ledger::{KeyModification, LedgerStore, WriteSet};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Event for audit trail - every committed invocation leaves one
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub data: serde_json::Value,
    pub actor: String,
}

impl Event {
    pub fn new(
        event_type: &str,
        entity_type: &str,
        entity_id: &str,
        data: serde_json::Value,
        actor: &str,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            data,
            actor: actor.to_string(),
        }
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL for crash recovery (in-memory databases report "memory")
    let _mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

    // ==========================================================================
    // World State (latest value per key)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS world_state (
            key TEXT PRIMARY KEY,
            value BLOB NOT NULL,
            tx_id TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Key History (append-only, one row per committed write)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS key_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL,
            tx_id TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            value BLOB NOT NULL,
            is_delete INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    // ==========================================================================
    // Events Table (audit trail)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            data TEXT NOT NULL,
            actor TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_key_history_key ON key_history(key)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_type, entity_id)",
        [],
    )?;

    Ok(())
}

/// Insert event into audit trail
pub fn insert_event(conn: &Connection, event: &Event) -> Result<()> {
    let data_json = serde_json::to_string(&event.data)?;

    conn.execute(
        "INSERT INTO events (
            event_id, timestamp, event_type, entity_type, entity_id, data, actor
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.event_id,
            event.timestamp.to_rfc3339(),
            event.event_type,
            event.entity_type,
            event.entity_id,
            data_json,
            event.actor,
        ],
    )?;

    Ok(())
}

/// Get events for a specific entity, in insertion order
pub fn get_events_for_entity(
    conn: &Connection,
    entity_type: &str,
    entity_id: &str,
) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT event_id, timestamp, event_type, entity_type, entity_id, data, actor
         FROM events
         WHERE entity_type = ?1 AND entity_id = ?2
         ORDER BY id ASC",
    )?;

    let events = stmt
        .query_map(params![entity_type, entity_id], |row| {
            let timestamp_str: String = row.get(1)?;
            let data_json: String = row.get(5)?;

            Ok(Event {
                event_id: row.get(0)?,
                timestamp: parse_timestamp(1, &timestamp_str)?,
                event_type: row.get(2)?,
                entity_type: row.get(3)?,
                entity_id: row.get(4)?,
                data: serde_json::from_str(&data_json).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
                })?,
                actor: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

// ============================================================================
// SQLITE LEDGER
// ============================================================================

/// Ledger persisted in a SQLite file (or in memory for tests).
pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open ledger database {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn).context("Failed to set up ledger schema")?;
        Ok(SqliteLedger { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Number of keys with a current value
    pub fn verify_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM world_state", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl LedgerStore for SqliteLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM world_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn history_for_key(&self, key: &str) -> Result<Vec<KeyModification>> {
        let mut stmt = self.conn.prepare(
            "SELECT tx_id, timestamp, value, is_delete
             FROM key_history
             WHERE key = ?1
             ORDER BY id ASC",
        )?;

        let history = stmt
            .query_map(params![key], |row| {
                let timestamp_str: String = row.get(1)?;
                Ok(KeyModification {
                    tx_id: row.get(0)?,
                    timestamp: parse_timestamp(1, &timestamp_str)?,
                    value: row.get(2)?,
                    is_delete: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM world_state ORDER BY key ASC")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    fn commit(&mut self, write_set: &WriteSet) -> Result<()> {
        let timestamp = write_set.timestamp.to_rfc3339();
        let tx = self.conn.transaction()?;

        for (key, value) in &write_set.writes {
            tx.execute(
                "INSERT INTO world_state (key, value, tx_id, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    tx_id = excluded.tx_id,
                    updated_at = excluded.updated_at",
                params![key, value, write_set.tx_id, timestamp],
            )?;

            tx.execute(
                "INSERT INTO key_history (key, tx_id, timestamp, value, is_delete)
                 VALUES (?1, ?2, ?3, ?4, 0)",
                params![key, write_set.tx_id, timestamp, value],
            )?;
        }

        tx.commit()
            .with_context(|| format!("Failed to commit transaction {}", write_set.tx_id))?;
        Ok(())
    }

    fn record_event(&mut self, event: &Event) -> Result<()> {
        insert_event(&self.conn, event)
    }

    fn events_for_entity(&self, entity_type: &str, entity_id: &str) -> Result<Vec<Event>> {
        get_events_for_entity(&self.conn, entity_type, entity_id)
    }
}
