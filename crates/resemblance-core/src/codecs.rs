//! Codec backends plugged into the delta dispatcher.
//!
//! The four non-`None` codec tags are external collaborators: the
//! dispatcher only needs an opaque `(encode, decode)` pair per tag plus
//! that codec's hard input-size ceiling. No maintained Rust crate ships
//! the original xdelta3/edelta/gdelta algorithms, so every tag is backed
//! here by the same real, already-vetted primitive this codebase already
//! uses for reference-based delta compression: Zstd dictionary mode
//! (`zstd::stream::{read,write}` with `with_dictionary`), parameterized by
//! compression level and size ceiling. See DESIGN.md for the rationale.

use std::io::{Read, Write};

use crate::error::CoreError;

/// An opaque (encode, decode) pair behind a hard input-size ceiling, as
/// described in spec section 6's "codec collaborator contract".
pub trait CodecBackend: Send + Sync {
    /// Hard input-size ceiling in bytes; inputs longer than this are
    /// rejected before the codec is ever invoked.
    fn max_input_len(&self) -> u64;

    /// Encode `input` against `base`, returning the raw codec payload
    /// (the varint length prefix is not this backend's concern).
    fn encode(&self, input: &[u8], base: &[u8]) -> Result<Vec<u8>, CoreError>;

    /// Decode a raw codec payload against `base`.
    fn decode(&self, payload: &[u8], base: &[u8]) -> Result<Vec<u8>, CoreError>;
}

/// Zstd dictionary-mode codec: compresses/decompresses `input` using
/// `base` as the compression dictionary, at a fixed level.
pub struct ZstdDictCodec {
    level: i32,
    max_input_len: u64,
}

impl ZstdDictCodec {
    /// Build a backend at the given Zstd compression level with the given
    /// hard input-size ceiling.
    pub const fn new(level: i32, max_input_len: u64) -> Self {
        Self {
            level,
            max_input_len,
        }
    }
}

impl CodecBackend for ZstdDictCodec {
    fn max_input_len(&self) -> u64 {
        self.max_input_len
    }

    fn encode(&self, input: &[u8], base: &[u8]) -> Result<Vec<u8>, CoreError> {
        let mut encoder = zstd::stream::write::Encoder::with_dictionary(Vec::new(), self.level, base)
            .map_err(|e| CoreError::CodecStatusNonZero(e.to_string()))?;
        encoder
            .write_all(input)
            .map_err(|e| CoreError::CodecStatusNonZero(e.to_string()))?;
        encoder
            .finish()
            .map_err(|e| CoreError::CodecStatusNonZero(e.to_string()))
    }

    fn decode(&self, payload: &[u8], base: &[u8]) -> Result<Vec<u8>, CoreError> {
        let mut decoder = zstd::stream::read::Decoder::with_dictionary(payload, base)
            .map_err(|e| CoreError::CodecStatusNonZero(e.to_string()))?;
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|e| CoreError::CodecStatusNonZero(e.to_string()))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_dictionary() {
        let codec = ZstdDictCodec::new(3, u64::MAX);
        let base = b"the quick brown fox jumps over the lazy dog, repeatedly, many times over";
        let input = b"the quick brown fox jumps over the lazy dog, repeatedly, many times over!!";
        let encoded = codec.encode(input, base).unwrap();
        let decoded = codec.decode(&encoded, base).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn max_input_len_is_reported() {
        let codec = ZstdDictCodec::new(1, 65536);
        assert_eq!(codec.max_input_len(), 65536);
    }
}
