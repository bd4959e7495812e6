// Serialization formats for abbreviation lists, used for both file
// persistence and clipboard interchange.

pub mod binary;
pub mod text;

pub use binary::BinaryCodec;
pub use text::TextCodec;

use crate::entry::AbbrevEntry;
use thiserror::Error;

/// Error for a byte stream that is not validly formatted for a codec.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Data that should be UTF-8 text is not.
    #[error("data is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The archive does not start with the expected magic bytes.
    #[error("unrecognized archive header")]
    BadHeader,

    /// The archive declares a version this build cannot read.
    #[error("unsupported archive version {0}")]
    UnsupportedVersion(u8),

    /// The archive ended before a declared field was complete.
    #[error("archive truncated at byte {0}")]
    Truncated(usize),

    /// The archive has bytes left over after the declared entries.
    #[error("{0} trailing bytes after the last entry")]
    TrailingData(usize),

    /// None of the offered clipboard formats matched a known codec.
    #[error("no offered format is recognized")]
    UnknownFormat,
}

/// A serialization format converting between entry lists and byte buffers.
///
/// Codecs perform no I/O; the surrounding file or clipboard plumbing hands
/// them in-memory buffers.
pub trait AbbrevCodec {
    /// Format tag used to select this codec when several formats are offered
    /// on a clipboard-like channel.
    fn identifier(&self) -> &'static str;

    fn encode(&self, entries: &[AbbrevEntry]) -> Vec<u8>;

    fn decode(&self, data: &[u8]) -> Result<Vec<AbbrevEntry>, DecodeError>;
}

/// Supported codecs in clipboard probe priority order: the structured
/// archive first, plain text second.
pub fn default_codecs() -> Vec<Box<dyn AbbrevCodec>> {
    vec![Box::new(BinaryCodec), Box::new(TextCodec)]
}

/// Encodes `entries` once per supported codec, producing the
/// `(identifier, bytes)` pairs a copy operation should offer.
pub fn encode_all(entries: &[AbbrevEntry]) -> Vec<(&'static str, Vec<u8>)> {
    default_codecs()
        .iter()
        .map(|codec| (codec.identifier(), codec.encode(entries)))
        .collect()
}

/// Decodes the best of the offered `(identifier, bytes)` pairs.
///
/// Codecs are tried in priority order; for each, the first offer with a
/// matching identifier is decoded. A decode failure falls through to the
/// next codec rather than aborting the paste.
pub fn decode_preferred(offers: &[(&str, &[u8])]) -> Result<Vec<AbbrevEntry>, DecodeError> {
    let mut last_err = DecodeError::UnknownFormat;
    for codec in default_codecs() {
        let Some(&(_, data)) = offers.iter().find(|(id, _)| *id == codec.identifier()) else {
            continue;
        };
        match codec.decode(data) {
            Ok(entries) => return Ok(entries),
            Err(e) => last_err = e,
        }
    }
    Err(last_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Abbrev, AbbrevEntry};

    fn sample() -> Vec<AbbrevEntry> {
        vec![
            AbbrevEntry::with_variants("c", "cat", vec![Abbrev::new("s", "s")]),
            AbbrevEntry::new("d", "dog"),
        ]
    }

    #[test]
    fn test_encode_all_offers_every_codec() {
        let offers = encode_all(&sample());
        assert_eq!(2, offers.len());
        assert_eq!(BinaryCodec.identifier(), offers[0].0);
        assert_eq!(TextCodec.identifier(), offers[1].0);
    }

    #[test]
    fn test_decode_preferred_picks_archive_first() {
        let entries = sample();
        // The archive must win even when the text offer is listed first.
        let archive = BinaryCodec.encode(&entries);
        let text = TextCodec.encode(&entries);
        let offers: Vec<(&str, &[u8])> = vec![
            (TextCodec.identifier(), text.as_slice()),
            (BinaryCodec.identifier(), archive.as_slice()),
        ];
        let decoded = decode_preferred(&offers).expect("decode should succeed");
        assert_eq!(entries, decoded);
    }

    #[test]
    fn test_decode_preferred_falls_back_on_corrupt_archive() {
        let entries = sample();
        let text = TextCodec.encode(&entries);
        let corrupt = vec![0u8; 7];
        let offers: Vec<(&str, &[u8])> = vec![
            (BinaryCodec.identifier(), corrupt.as_slice()),
            (TextCodec.identifier(), text.as_slice()),
        ];
        let decoded = decode_preferred(&offers).expect("text fallback should succeed");
        assert_eq!(entries, decoded);
    }

    #[test]
    fn test_decode_preferred_with_no_known_format() {
        let offers: Vec<(&str, &[u8])> = vec![("application/x-unrelated", b"?".as_slice())];
        assert!(matches!(
            decode_preferred(&offers),
            Err(DecodeError::UnknownFormat)
        ));
    }
}
