// Transaction stub - the contract's view of the ledger for one invocation
//
// Reads go through the stub's own write buffer first, then the store.
// Writes stay in the buffer until the host commits them.

use crate::ledger::{KeyModification, LedgerStore, WriteSet};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

pub struct Stub<'a, S: LedgerStore> {
    store: &'a S,
    write_set: WriteSet,
}

impl<'a, S: LedgerStore> Stub<'a, S> {
    /// Open a stub with a fresh transaction id and timestamp.
    pub fn new<A: AsRef<str>>(store: &'a S, function: &str, args: &[A]) -> Self {
        let nonce = uuid::Uuid::new_v4();
        Stub {
            store,
            write_set: WriteSet::new(compute_tx_id(function, args, &nonce), Utc::now()),
        }
    }

    pub fn tx_id(&self) -> &str {
        &self.write_set.tx_id
    }

    pub fn tx_timestamp(&self) -> DateTime<Utc> {
        self.write_set.timestamp
    }

    pub fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(pending) = self.write_set.get(key) {
            return Ok(Some(pending.to_vec()));
        }
        self.store.get_state(key)
    }

    pub fn put_state(&mut self, key: &str, value: Vec<u8>) {
        self.write_set.put(key, value);
    }

    /// Committed history only; this transaction's own writes are not in it yet.
    pub fn get_history_for_key(&self, key: &str) -> Result<Vec<KeyModification>> {
        self.store.history_for_key(key)
    }

    /// Committed keys plus keys written by this transaction, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = self.store.keys()?;
        keys.extend(self.write_set.writes.iter().map(|(k, _)| k.clone()));
        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    pub fn into_write_set(self) -> WriteSet {
        self.write_set
    }
}

/// SHA-256 over function, args and nonce, hex encoded (64 chars).
pub fn compute_tx_id<A: AsRef<str>>(function: &str, args: &[A], nonce: &uuid::Uuid) -> String {
    let mut hasher = Sha256::new();
    hasher.update(function.as_bytes());
    for arg in args {
        hasher.update([0u8]);
        hasher.update(arg.as_ref().as_bytes());
    }
    hasher.update([0u8]);
    hasher.update(nonce.as_bytes());
    format!("{:x}", hasher.finalize())
}
