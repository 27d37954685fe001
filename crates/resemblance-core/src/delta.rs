//! Delta codec dispatcher: a uniform varint-framed wrapper around several
//! byte-level differential encoders, with round-trip safety and a
//! compression-quality gate.

use tracing::debug;

use crate::codecs::{CodecBackend, ZstdDictCodec};
use crate::error::CoreError;
use crate::varint::{get_varint32, put_varint32};

/// Delta codec selector. Tag values are fixed for external/wire
/// compatibility and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CodecTag {
    /// No delta compression; dispatching on this tag always fails.
    None = 0,
    /// Traditional delta compression algorithm.
    XDelta = 1,
    /// Fastest, lowest compression ratio.
    EDelta = 2,
    /// Faster and higher compression ratio than XDelta.
    GDelta = 3,
    /// Older baseline GDelta variant with a 64KiB input ceiling.
    GDeltaOriginal = 4,
    /// Reserved for forward wire-compatibility; never constructed by any
    /// public API in this crate.
    GDeltaInit = 5,
}

impl CodecTag {
    /// Human-readable label, matching the original tool's `ToString`.
    pub fn label(self) -> &'static str {
        match self {
            CodecTag::None => "no delta compression",
            CodecTag::XDelta => "xdelta",
            CodecTag::EDelta => "edelta",
            CodecTag::GDelta => "gdelta",
            CodecTag::GDeltaOriginal => "gdelta_original",
            CodecTag::GDeltaInit => "gdelta_init",
        }
    }

    /// The four non-`None`, non-reserved tags the dispatcher will
    /// actually drive end to end, in the order the original tool reports
    /// them.
    pub fn dispatchable() -> [CodecTag; 4] {
        [
            CodecTag::XDelta,
            CodecTag::EDelta,
            CodecTag::GDelta,
            CodecTag::GDeltaOriginal,
        ]
    }

    fn backend(self) -> Result<Box<dyn CodecBackend>, CoreError> {
        match self {
            CodecTag::None => Err(CoreError::NoCodec),
            // Traditional, general-purpose: mid compression level, no
            // additional ceiling beyond what `usize` already implies.
            CodecTag::XDelta => Ok(Box::new(ZstdDictCodec::new(6, u64::MAX))),
            // Fastest, lowest ratio.
            CodecTag::EDelta => Ok(Box::new(ZstdDictCodec::new(1, u32::MAX as u64))),
            // Faster and higher ratio than XDelta.
            CodecTag::GDelta => Ok(Box::new(ZstdDictCodec::new(19, u32::MAX as u64))),
            // Older baseline, 64KiB input ceiling.
            CodecTag::GDeltaOriginal => Ok(Box::new(ZstdDictCodec::new(12, 65_536))),
            CodecTag::GDeltaInit => Err(CoreError::NoCodec),
        }
    }
}

/// `compressed < raw - raw/8`, i.e. the compressed payload must save at
/// least ~12.5% over the raw size. Integer truncation on `raw/8` is
/// intentional and must be preserved exactly.
fn good_compression_ratio(compressed: usize, raw: usize) -> bool {
    compressed < raw - raw / 8
}

/// Encode `input` against `base` under `tag`, producing a self-describing
/// delta frame (`varint32 original_length | codec payload`).
///
/// Fails (without panicking) on an empty buffer, a `None`/reserved tag, a
/// size-ceiling violation, a codec-backend error, or a failed ratio gate
/// (§7 enumerates each as a `CoreError` variant). Every failure means
/// "do not store as delta; keep the raw value" — callers should not
/// inspect the partially built frame on error.
pub fn delta_compress(tag: CodecTag, input: &[u8], base: &[u8]) -> Result<Vec<u8>, CoreError> {
    if input.is_empty() || base.is_empty() {
        return Err(CoreError::EmptyInput);
    }
    let backend = tag.backend()?;

    if input.len() as u64 > backend.max_input_len() {
        return Err(CoreError::SizeLimitExceeded {
            len: input.len(),
            limit: backend.max_input_len(),
        });
    }

    let payload = backend.encode(input, base)?;
    if !good_compression_ratio(payload.len(), input.len()) {
        return Err(CoreError::RatioGateFailed);
    }

    let mut output = Vec::with_capacity(5 + payload.len());
    put_varint32(&mut output, input.len() as u32);
    output.extend_from_slice(&payload);

    debug!(
        tag = tag.label(),
        original = input.len(),
        compressed = payload.len(),
        "delta compress accepted"
    );
    Ok(output)
}

/// Decode a delta frame produced by [`delta_compress`] with the same
/// `tag` and `base`. Fails on an empty buffer, a `None`/reserved tag, a
/// malformed varint prefix, or a decoded-length mismatch.
pub fn delta_uncompress(tag: CodecTag, delta: &[u8], base: &[u8]) -> Result<Vec<u8>, CoreError> {
    if delta.is_empty() || base.is_empty() {
        return Err(CoreError::EmptyInput);
    }
    let backend = tag.backend()?;

    let (original_length, consumed) =
        get_varint32(delta).ok_or(CoreError::MalformedDeltaFrame)?;
    let payload = &delta[consumed..];

    let decoded = backend.decode(payload, base)?;
    if decoded.len() != original_length as usize {
        return Err(CoreError::LengthMismatch {
            actual: decoded.len(),
            expected: original_length as usize,
        });
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn repeated(pattern: &[u8], times: usize) -> Vec<u8> {
        pattern.iter().copied().cycle().take(pattern.len() * times).collect()
    }

    #[test]
    fn roundtrip_for_every_dispatchable_tag() {
        let base = repeated(b"The quick brown fox jumps over the lazy dog. ", 50);
        let mut input = base.clone();
        input.push(b'!');
        for tag in CodecTag::dispatchable() {
            let delta = delta_compress(tag, &input, &base)
                .unwrap_or_else(|e| panic!("{:?} encode failed: {e}", tag));
            let output = delta_uncompress(tag, &delta, &base).unwrap();
            assert_eq!(output, input, "{:?} round-trip mismatch", tag);
        }
    }

    #[test]
    fn ratio_gate_is_honest_whenever_encode_succeeds() {
        let base = repeated(b"abcdefghijklmnopqrstuvwxyz0123456789", 200);
        let mut input = base.clone();
        input.truncate(input.len() - 3);
        if let Ok(delta) = delta_compress(CodecTag::GDelta, &input, &base) {
            let (original_length, consumed) = get_varint32(&delta).unwrap();
            let payload_len = delta.len() - consumed;
            assert!(payload_len < original_length as usize - original_length as usize / 8);
        }
    }

    #[test]
    fn frame_prefix_matches_input_length() {
        let base = repeated(b"reference material reference material ", 100);
        let mut input = base.clone();
        input.push(b'x');
        let delta = delta_compress(CodecTag::GDelta, &input, &base).unwrap();
        let (declared, _) = get_varint32(&delta).unwrap();
        assert_eq!(declared as usize, input.len());
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(
            delta_compress(CodecTag::XDelta, &[], b"base"),
            Err(CoreError::EmptyInput)
        ));
        assert!(matches!(
            delta_compress(CodecTag::XDelta, b"input", &[]),
            Err(CoreError::EmptyInput)
        ));
    }

    #[test]
    fn none_tag_always_fails() {
        assert!(matches!(
            delta_compress(CodecTag::None, b"input", b"base"),
            Err(CoreError::NoCodec)
        ));
    }

    #[test]
    fn gdelta_original_enforces_64kib_ceiling() {
        let base = vec![b'a'; 200_000];
        let input = vec![b'b'; 100 * 1024];
        assert!(matches!(
            delta_compress(CodecTag::GDeltaOriginal, &input, &base),
            Err(CoreError::SizeLimitExceeded { .. })
        ));
    }

    #[test]
    fn ratio_gate_rejects_unrelated_random_data() {
        // Two unrelated pseudo-random buffers should not compress well
        // enough to clear the 12.5% gate.
        let mut a = vec![0u8; 1024];
        let mut b = vec![0u8; 1024];
        let mut state = 0x1234_5678_9abc_def0u64;
        for byte in a.iter_mut().chain(b.iter_mut()) {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            *byte = (state >> 56) as u8;
        }
        assert!(delta_compress(CodecTag::XDelta, &a, &b).is_err());
    }

    #[test]
    fn decode_with_tampered_length_prefix_fails() {
        let base = repeated(b"some shared reference content here, quite long indeed ", 60);
        let mut input = base.clone();
        input.push(b'z');
        let mut delta = delta_compress(CodecTag::GDelta, &input, &base).unwrap();
        let (declared, consumed) = get_varint32(&delta).unwrap();
        let mut tampered = Vec::new();
        put_varint32(&mut tampered, declared + 1);
        tampered.extend_from_slice(&delta[consumed..]);
        delta = tampered;
        assert!(matches!(
            delta_uncompress(CodecTag::GDelta, &delta, &base),
            Err(CoreError::LengthMismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_good_compression_ratio_matches_spec(compressed in 0usize..100_000, raw in 1usize..100_000) {
            let gate = good_compression_ratio(compressed, raw);
            prop_assert_eq!(gate, compressed < raw - raw / 8);
        }
    }
}
