// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-memory record of the secrets currently being replicated.

use std::collections::HashMap;

/// A source secret the replicator is tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedSecret {
    pub name: String,
    pub source_namespace: String,
}

impl WatchedSecret {
    pub fn new(name: impl Into<String>, source_namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_namespace: source_namespace.into(),
        }
    }

    /// Check if a namespace should receive a replica of this secret
    pub fn targets(&self, namespace: &str) -> bool {
        namespace != self.source_namespace
    }
}

/// Secrets being replicated, keyed by name.
///
/// Owned by the replication manager; every read and write happens on its task.
#[derive(Debug, Default)]
pub struct Registry {
    secrets: HashMap<String, WatchedSecret>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a record, returning the previous one
    pub fn put(&mut self, record: WatchedSecret) -> Option<WatchedSecret> {
        self.secrets.insert(record.name.clone(), record)
    }

    /// Remove a record; absent names are a no-op
    pub fn remove(&mut self, name: &str) -> Option<WatchedSecret> {
        self.secrets.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.secrets.contains_key(name)
    }

    /// Point-in-time copy of all records, ordered by name
    pub fn snapshot(&self) -> Vec<WatchedSecret> {
        let mut records: Vec<WatchedSecret> = self.secrets.values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}
