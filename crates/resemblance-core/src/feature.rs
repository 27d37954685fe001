//! Odess-style feature generation: affine transforms of a Gear rolling hash
//! at content-defined sample points, folded into super-features.

use rand::Rng;

use crate::config::{FeatureIndexConfig, FixTransformConstants};
use crate::error::CoreError;
use crate::gear::{GearHash, GEAR_TABLE};

/// One raw feature: the max over sampled positions of an affine transform
/// of the rolling hash.
pub type Feature = u64;

/// One super-feature: `xxhash64` of a group of raw features (or a raw
/// feature copied through unchanged when `feature_count == super_feature_count`).
pub type SuperFeature = u64;

/// Seed xxHash64 uses when folding a group of features into a super-feature.
const SUPER_FEATURE_SEED: u64 = 0x7fcaf1;

/// A record's super-feature vector. Two records are "similar" iff they
/// share at least one entry; [`crate::index::FeatureIndexTable`] tests
/// that via its `feature_key_table` bucket map rather than by comparing
/// two `SuperFeatures` directly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuperFeatures(pub Vec<SuperFeature>);

/// Per-feature affine transform constants `(a_i, b_i)`, fixed for the
/// generator's lifetime.
#[derive(Debug, Clone)]
struct TransformConstants {
    a: Vec<u64>,
    b: Vec<u64>,
}

impl TransformConstants {
    fn fixed(feature_count: usize) -> Self {
        // Draw 2*N distinct entries from the Gear table so the fixed mode
        // shares the "same 256+N constants" baseline the design notes call
        // for, without colliding with the table's own 256 rolling-hash
        // constants.
        let a = (0..feature_count)
            .map(|i| GEAR_TABLE[i % GEAR_TABLE.len()])
            .collect();
        let b = (0..feature_count)
            .map(|i| GEAR_TABLE[(i + 128) % GEAR_TABLE.len()].rotate_left(17))
            .collect();
        Self { a, b }
    }

    fn random(feature_count: usize) -> Self {
        let mut rng = rand::thread_rng();
        let a = (0..feature_count).map(|_| rng.gen::<u64>()).collect();
        let b = (0..feature_count).map(|_| rng.gen::<u64>()).collect();
        Self { a, b }
    }
}

/// Converts one record's bytes into a fixed-size vector of super-features.
///
/// Stateless per call from the caller's point of view: `generate` zeros
/// its scratch buffer before each value, so generators are freely
/// reusable across records.
pub struct FeatureGenerator {
    config: FeatureIndexConfig,
    transform: TransformConstants,
    scratch: Vec<Feature>,
}

impl FeatureGenerator {
    /// Build a generator from a validated configuration.
    pub fn new(config: FeatureIndexConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let transform = match config.fix_transform_constants {
            FixTransformConstants::On => TransformConstants::fixed(config.feature_count),
            FixTransformConstants::Off => TransformConstants::random(config.feature_count),
        };
        Ok(Self {
            scratch: vec![0u64; config.feature_count],
            config,
            transform,
        })
    }

    /// Generate the super-features of one value. Empty input yields
    /// all-zero features and the corresponding deterministic super-features.
    pub fn generate(&mut self, value: &[u8]) -> SuperFeatures {
        self.scratch.iter_mut().for_each(|f| *f = 0);

        let mut hash = GearHash::new();
        for &byte in value {
            let h = hash.update(byte);
            if h & self.config.sample_mask == 0 {
                for j in 0..self.config.feature_count {
                    let transformed = h
                        .wrapping_mul(self.transform.a[j])
                        .wrapping_add(self.transform.b[j]);
                    if transformed > self.scratch[j] {
                        self.scratch[j] = transformed;
                    }
                }
            }
        }

        self.make_super_features()
    }

    fn make_super_features(&self) -> SuperFeatures {
        let n = self.config.feature_count;
        let m = self.config.super_feature_count;
        if m == n {
            return SuperFeatures(self.scratch.clone());
        }
        let group_len = self.config.group_size();
        let sfs = (0..m)
            .map(|j| {
                let start = j * group_len;
                let group = &self.scratch[start..start + group_len];
                let bytes: Vec<u8> = group.iter().flat_map(|f| f.to_le_bytes()).collect();
                xxhash_rust::xxh64::xxh64(&bytes, SUPER_FEATURE_SEED)
            })
            .collect();
        SuperFeatures(sfs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_generator() -> FeatureGenerator {
        let config = FeatureIndexConfig {
            fix_transform_constants: FixTransformConstants::On,
            ..FeatureIndexConfig::default()
        };
        FeatureGenerator::new(config).unwrap()
    }

    #[test]
    fn empty_value_yields_zero_features() {
        let mut gen = fixed_generator();
        let sfs = gen.generate(b"");
        // all-zero raw features -> deterministic grouped hash, not necessarily zero
        let sfs2 = gen.generate(b"");
        assert_eq!(sfs, sfs2);
    }

    #[test]
    fn identical_values_produce_identical_super_features() {
        let mut gen = fixed_generator();
        let sfs1 = gen.generate(b"the quick brown fox jumps over the lazy dog");
        let sfs2 = gen.generate(b"the quick brown fox jumps over the lazy dog");
        assert_eq!(sfs1, sfs2);
    }

    #[test]
    fn determinism_across_generators_with_fixed_constants() {
        let mut gen1 = fixed_generator();
        let mut gen2 = fixed_generator();
        let data = vec![7u8; 4096];
        assert_eq!(gen1.generate(&data), gen2.generate(&data));
    }

    #[test]
    fn disjoint_large_values_are_unlikely_to_share_superfeatures() {
        let mut gen = fixed_generator();
        let zeros = vec![0u8; 1024 * 1024];
        let ones = vec![0xFFu8; 1024 * 1024];
        let sfs_zeros = gen.generate(&zeros);
        let sfs_ones = gen.generate(&ones);
        assert!(!sfs_zeros.0.iter().any(|sf| sfs_ones.0.contains(sf)));
    }

    #[test]
    fn copy_mode_when_m_equals_n() {
        let config = FeatureIndexConfig {
            feature_count: 4,
            super_feature_count: 4,
            fix_transform_constants: FixTransformConstants::On,
            ..FeatureIndexConfig::default()
        };
        let mut gen = FeatureGenerator::new(config).unwrap();
        let sfs = gen.generate(b"some bytes of test content for copy mode path");
        assert_eq!(sfs.0.len(), 4);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = FeatureIndexConfig {
            feature_count: 12,
            super_feature_count: 5,
            ..FeatureIndexConfig::default()
        };
        assert!(FeatureGenerator::new(config).is_err());
    }
}
