//! Effect memo cache.
//!
//! Maps (method id, incoming context) to the context a method body leaves behind. A hit lets the checker skip the
//! body walk entirely. The cache is owned by whoever coordinates a run; parallel workers each keep a shard and fold
//! them together with [`EffectMemo::merge`].

use std::collections::HashMap;

use super::context::{ContextFingerprint, ScopeEffect};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey {
    method_id: String,
    fingerprint: ContextFingerprint,
}

impl MemoKey {
    pub fn new(method_id: impl Into<String>, fingerprint: ContextFingerprint) -> Self {
        Self {
            method_id: method_id.into(),
            fingerprint,
        }
    }

    pub fn method_id(&self) -> &str {
        &self.method_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct EffectMemo {
    entries: HashMap<MemoKey, ScopeEffect>,
}

impl EffectMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &MemoKey) -> Option<&ScopeEffect> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: MemoKey, effect: ScopeEffect) {
        self.entries.insert(key, effect);
    }

    /// Fold a worker's shard into this cache. Entries already present win.
    pub fn merge(&mut self, shard: EffectMemo) {
        for (key, effect) in shard.entries {
            self.entries.entry(key).or_insert(effect);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
