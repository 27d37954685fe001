//! Bipartite feature index: key <-> super-feature, supporting incremental
//! Put/Delete and similarity lookup.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::feature::{FeatureGenerator, SuperFeature, SuperFeatures};

/// Mutable bipartite index mapping keys to super-features and back.
///
/// `key_feature_table` is a `BTreeMap` (not a `HashMap`) specifically so
/// that iteration order is deterministic by key — `CountAllSimilarRecords`
/// and driver behavior must be reproducible across runs given identical
/// inputs and transform constants.
pub struct FeatureIndexTable {
    key_feature_table: BTreeMap<String, SuperFeatures>,
    feature_key_table: HashMap<SuperFeature, Vec<String>>,
    generator: FeatureGenerator,
}

impl FeatureIndexTable {
    /// Build an index backed by the given feature generator.
    pub fn new(generator: FeatureGenerator) -> Self {
        Self {
            key_feature_table: BTreeMap::new(),
            feature_key_table: HashMap::new(),
            generator,
        }
    }

    /// Index `value` under `key`, computing its super-features. If `key`
    /// was already indexed, its prior mapping is fully removed first.
    pub fn put(&mut self, key: &str, value: &[u8]) {
        self.delete(key);

        let sfs = self.generator.generate(value);
        for &sf in &sfs.0 {
            self.feature_key_table
                .entry(sf)
                .or_default()
                .push(key.to_string());
        }
        self.key_feature_table.insert(key.to_string(), sfs);
    }

    /// Remove `key` from the index. No-op if `key` is absent.
    pub fn delete(&mut self, key: &str) {
        let Some(sfs) = self.key_feature_table.remove(key) else {
            return;
        };
        self.execute_delete_buckets(key, &sfs);
    }

    fn execute_delete_buckets(&mut self, key: &str, sfs: &SuperFeatures) {
        for sf in &sfs.0 {
            if let Some(bucket) = self.feature_key_table.get_mut(sf) {
                bucket.retain(|k| k != key);
                if bucket.is_empty() {
                    self.feature_key_table.remove(sf);
                }
            }
        }
    }

    /// Collect every key sharing at least one super-feature with `key`
    /// (with multiplicity — a candidate sharing multiple super-features
    /// appears once per shared super-feature), then remove the entire
    /// cluster (every returned key, plus `key` itself) from the index.
    ///
    /// Returns an empty vector, with no side effect, if `key` is absent.
    pub fn get_similar_records_keys(&mut self, key: &str) -> Vec<String> {
        let Some(sfs) = self.key_feature_table.get(key).cloned() else {
            return Vec::new();
        };

        let mut similar_keys = Vec::new();
        for sf in &sfs.0 {
            if let Some(bucket) = self.feature_key_table.get(sf) {
                for candidate in bucket {
                    if candidate != key {
                        similar_keys.push(candidate.clone());
                    }
                }
            }
        }

        for similar_key in &similar_keys {
            self.delete(similar_key);
        }
        self.execute_delete_buckets(key, &sfs);
        self.key_feature_table.remove(key);

        debug!(key, found = similar_keys.len(), "extracted similarity cluster");
        similar_keys
    }

    /// Number of distinct keys participating in any super-feature bucket
    /// whose size exceeds one. Read-only; does not mutate the table.
    pub fn count_all_similar_records(&self) -> usize {
        let mut similar_keys: HashSet<&str> = HashSet::new();
        for bucket in self.feature_key_table.values() {
            if bucket.len() > 1 {
                similar_keys.extend(bucket.iter().map(String::as_str));
            }
        }
        similar_keys.len()
    }

    /// `true` iff `key` currently has an entry in the index.
    pub fn contains(&self, key: &str) -> bool {
        self.key_feature_table.contains_key(key)
    }

    /// Number of keys currently indexed.
    pub fn len(&self) -> usize {
        self.key_feature_table.len()
    }
}
