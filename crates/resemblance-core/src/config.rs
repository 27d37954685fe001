//! Driver-visible configuration for the feature generator and index.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// `1/128` sampling mask: ~7 set bits, sampling probability ~2^-7.
pub const K1_128_RATIO_MASK: u64 = 0x0000_4003_0341_0000;

/// Whether the per-feature affine transform constants are drawn fresh at
/// construction (`Off`) or loaded from a fixed table (`On`), so tests and
/// repeat runs can get bit-identical similarity verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FixTransformConstants {
    /// Draw random transform constants at construction time.
    #[default]
    Off,
    /// Load transform constants from the fixed table derived from
    /// [`crate::gear::GEAR_TABLE`].
    On,
}

/// Configuration recognized by the core: sample mask, feature/super-feature
/// counts, and the transform-constant determinism toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureIndexConfig {
    /// Content-defined sampling mask.
    pub sample_mask: u64,
    /// Number of features per record (N).
    pub feature_count: usize,
    /// Number of super-features per record (M). Must divide `feature_count`.
    pub super_feature_count: usize,
    /// Whether transform constants are fixed across runs.
    pub fix_transform_constants: FixTransformConstants,
}

impl Default for FeatureIndexConfig {
    fn default() -> Self {
        Self {
            sample_mask: K1_128_RATIO_MASK,
            feature_count: 12,
            super_feature_count: 3,
            fix_transform_constants: FixTransformConstants::Off,
        }
    }
}

impl FeatureIndexConfig {
    /// Validate the `N mod M == 0` constraint.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.super_feature_count == 0
            || self.feature_count % self.super_feature_count != 0
        {
            return Err(CoreError::InvalidConfig {
                feature_count: self.feature_count,
                super_feature_count: self.super_feature_count,
            });
        }
        Ok(())
    }

    /// Group size `g = N / M` of raw features folded into one super-feature.
    pub fn group_size(&self) -> usize {
        self.feature_count / self.super_feature_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        FeatureIndexConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_non_dividing_super_feature_count() {
        let cfg = FeatureIndexConfig {
            feature_count: 12,
            super_feature_count: 5,
            ..FeatureIndexConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(CoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rejects_zero_super_feature_count() {
        let cfg = FeatureIndexConfig {
            super_feature_count: 0,
            ..FeatureIndexConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn group_size_matches_default() {
        let cfg = FeatureIndexConfig::default();
        assert_eq!(cfg.group_size(), 4);
    }
}
