//! Corpus-walk glue: connects the feature index to the delta dispatcher
//! and reports what happened.
//!
//! This module has no algorithmic content of its own — it is the ~10%
//! driver that plugs [`crate::index::FeatureIndexTable`] into
//! [`crate::delta`], the same role `ScanSimilarRecords` and the
//! per-codec compress/uncompress loops play in the original tool.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::instrument;

use crate::config::FeatureIndexConfig;
use crate::delta::{delta_compress, delta_uncompress, CodecTag};
use crate::error::CoreError;
use crate::feature::FeatureGenerator;
use crate::index::FeatureIndexTable;

/// One similarity cluster: a base record key and the keys judged similar
/// to it, in the order `GetSimilarRecordsKeys` returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityCluster {
    /// The key the cluster was extracted from.
    pub base_key: String,
    /// Keys found similar to `base_key`. Already removed from the index
    /// by the time this struct is produced.
    pub similar_keys: Vec<String>,
}

/// Scan every key of `corpus` in stable (lexicographic) order, indexing
/// it and then immediately extracting its similarity cluster. Mirrors
/// `ScanSimilarRecords`: once a key has been consumed as part of some
/// earlier cluster, it is never visited again.
#[instrument(skip(corpus, generator))]
pub fn scan_similar_records(
    corpus: &BTreeMap<String, Vec<u8>>,
    generator: FeatureGenerator,
) -> Vec<SimilarityCluster> {
    let mut index = FeatureIndexTable::new(generator);
    for (key, value) in corpus {
        index.put(key, value);
    }

    let mut clusters = Vec::new();
    for key in corpus.keys() {
        if !index.contains(key) {
            continue;
        }
        let similar_keys = index.get_similar_records_keys(key);
        if similar_keys.is_empty() {
            continue;
        }
        clusters.push(SimilarityCluster {
            base_key: key.clone(),
            similar_keys,
        });
    }
    clusters
}

/// Build a feature index driver using [`FeatureIndexConfig::default`].
pub fn scan_similar_records_default(
    corpus: &BTreeMap<String, Vec<u8>>,
) -> Result<Vec<SimilarityCluster>, CoreError> {
    let generator = FeatureGenerator::new(FeatureIndexConfig::default())?;
    Ok(scan_similar_records(corpus, generator))
}

/// Outcome of one `DeltaCompress` + `DeltaUncompress` attempt against a
/// single `(base, input)` pair, for one codec tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialOutcome {
    /// Compressed, decompressed, and the round-trip matched the input.
    Accepted {
        /// Bytes of the original input.
        original_len: usize,
        /// Bytes of the encoded delta frame.
        compressed_len: usize,
    },
    /// Encode failed (ratio gate, size ceiling, empty input, backend error).
    Rejected,
    /// Encode succeeded but decode produced a mismatching buffer — would
    /// indicate a codec backend bug, never expected in practice.
    RoundTripMismatch,
}

/// Running totals for one codec tag across a corpus pass, matching the
/// shape of the original tool's per-codec `Statistics` row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodecStats {
    /// How many `(base, input)` pairs were offered to this codec.
    pub attempted: usize,
    /// How many cleared the ratio gate and round-tripped correctly.
    pub accepted: usize,
    /// Sum of original byte lengths over accepted attempts.
    pub total_original_bytes: u64,
    /// Sum of encoded delta-frame lengths over accepted attempts.
    pub total_compressed_bytes: u64,
    /// Wall time spent in `delta_compress` across all attempts.
    pub compress_time: Duration,
    /// Wall time spent in `delta_uncompress` across accepted attempts.
    pub uncompress_time: Duration,
}

impl CodecStats {
    /// `total_compressed_bytes / total_original_bytes`, or `0.0` if
    /// nothing was ever accepted.
    pub fn ratio(&self) -> f64 {
        if self.total_original_bytes == 0 {
            0.0
        } else {
            self.total_compressed_bytes as f64 / self.total_original_bytes as f64
        }
    }
}

/// Run every cluster's `(base, similar)` pairs through every dispatchable
/// codec tag, accumulating one [`CodecStats`] per tag. This is a plain
/// (non-side-effecting) read over already-extracted clusters; the
/// feature index itself is no longer touched by this point.
pub fn run_delta_trials(
    corpus: &BTreeMap<String, Vec<u8>>,
    clusters: &[SimilarityCluster],
) -> BTreeMap<CodecTag, CodecStats> {
    let mut stats: BTreeMap<CodecTag, CodecStats> = CodecTag::dispatchable()
        .into_iter()
        .map(|tag| (tag, CodecStats::default()))
        .collect();

    for cluster in clusters {
        let Some(base) = corpus.get(&cluster.base_key) else {
            continue;
        };
        for similar_key in &cluster.similar_keys {
            let Some(input) = corpus.get(similar_key) else {
                continue;
            };
            for tag in CodecTag::dispatchable() {
                let entry = stats.get_mut(&tag).expect("tag seeded above");
                entry.attempted += 1;
                record_trial(tag, input, base, entry);
            }
        }
    }

    stats
}

fn record_trial(tag: CodecTag, input: &[u8], base: &[u8], entry: &mut CodecStats) {
    let compress_start = std::time::Instant::now();
    let delta = match delta_compress(tag, input, base) {
        Ok(delta) => delta,
        Err(_) => return,
    };
    entry.compress_time += compress_start.elapsed();

    let uncompress_start = std::time::Instant::now();
    let outcome = match delta_uncompress(tag, &delta, base) {
        Ok(decoded) if decoded == input => TrialOutcome::Accepted {
            original_len: input.len(),
            compressed_len: delta.len(),
        },
        Ok(_) => TrialOutcome::RoundTripMismatch,
        Err(_) => TrialOutcome::Rejected,
    };
    entry.uncompress_time += uncompress_start.elapsed();

    if let TrialOutcome::Accepted {
        original_len,
        compressed_len,
    } = outcome
    {
        entry.accepted += 1;
        entry.total_original_bytes += original_len as u64;
        entry.total_compressed_bytes += compressed_len as u64;
    }
}

// `CodecTag` needs a total order to live as a `BTreeMap` key with
// deterministic iteration, matching the same determinism concern that
// drove `key_feature_table`'s choice of `BTreeMap` over `HashMap`.
impl PartialOrd for CodecTag {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CodecTag {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}
