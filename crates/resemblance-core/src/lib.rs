#![warn(missing_docs)]

//! Odess-style resemblance detection and delta-codec dispatch over an
//! in-memory record corpus: Gear rolling hash, feature generation,
//! bipartite similarity index, and a varint-framed delta codec
//! dispatcher with a compression-ratio gate.

pub mod codecs;
pub mod config;
pub mod delta;
pub mod driver;
pub mod error;
pub mod feature;
pub mod gear;
pub mod index;
pub mod varint;

pub use config::{FeatureIndexConfig, FixTransformConstants};
pub use delta::{delta_compress, delta_uncompress, CodecTag};
pub use driver::{run_delta_trials, scan_similar_records, CodecStats, SimilarityCluster};
pub use error::CoreError;
pub use feature::{FeatureGenerator, SuperFeatures};
pub use index::FeatureIndexTable;
