//! Error types for the resemblance-core subsystem

/// All errors that can occur during resemblance detection and delta dispatch.
///
/// Every variant here corresponds to a "do not store as delta, keep the raw
/// value" outcome at the dispatcher boundary; none of these are abrupt
/// control transfers, they are ordinary `Result::Err` values the driver
/// matches on (or simply treats as failure).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Encode/decode called with an empty input or base buffer
    #[error("empty input or base buffer")]
    EmptyInput,
    /// Input exceeds the codec's hard size ceiling
    #[error("input of {len} bytes exceeds the codec's {limit}-byte ceiling")]
    SizeLimitExceeded {
        /// Length of the rejected input
        len: usize,
        /// The codec's hard ceiling
        limit: u64,
    },
    /// The underlying codec backend reported failure
    #[error("codec backend failed: {0}")]
    CodecStatusNonZero(String),
    /// Dispatch was attempted against `CodecTag::None` or the reserved
    /// `CodecTag::GDeltaInit` tag, neither of which has a backend
    #[error("no codec backend for this tag")]
    NoCodec,
    /// Encode succeeded but did not clear the 12.5% compression-ratio gate
    #[error("compressed size did not clear the ratio gate")]
    RatioGateFailed,
    /// Decode could not parse the varint32 length prefix
    #[error("malformed delta frame: bad varint32 prefix")]
    MalformedDeltaFrame,
    /// Decoded payload length did not match the declared original length
    #[error("length mismatch: decoded {actual} bytes, expected {expected}")]
    LengthMismatch {
        /// Bytes actually produced by the codec
        actual: usize,
        /// Original length declared in the frame
        expected: usize,
    },
    /// Feature/super-feature counts fail the `N mod M == 0` constraint
    #[error(
        "invalid config: feature_count ({feature_count}) must be a multiple of super_feature_count ({super_feature_count})"
    )]
    InvalidConfig {
        /// Configured feature count N
        feature_count: usize,
        /// Configured super-feature count M
        super_feature_count: usize,
    },
}
