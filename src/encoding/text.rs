// Tab-delimited text format: one entry per line, human-editable.
//
// Grammar:   <abbreviation> TAB <expansion>[~<variant> ...] NEWLINE
// where each variant is <suffix>[=<expansion>]; the `=` part is omitted when
// the variant's expansion equals its suffix.

use super::{AbbrevCodec, DecodeError};
use crate::entry::{Abbrev, AbbrevEntry};

/// The human-readable tab-delimited codec.
pub struct TextCodec;

impl AbbrevCodec for TextCodec {
    fn identifier(&self) -> &'static str {
        "text/tab-separated-values"
    }

    fn encode(&self, entries: &[AbbrevEntry]) -> Vec<u8> {
        let mut out = String::new();
        for entry in entries {
            // Entries empty in both fields are transient editor rows; they
            // are not written as blank lines.
            if entry.is_empty() {
                continue;
            }
            out.push_str(&entry.abbreviation);
            out.push('\t');
            out.push_str(&format_expansion(&entry.expansion, entry.variants.as_deref()));
            out.push('\n');
        }
        out.into_bytes()
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<AbbrevEntry>, DecodeError> {
        let text = std::str::from_utf8(data)?;
        let mut entries = Vec::new();
        for line in text.lines() {
            let line = line.trim_start();
            if line.is_empty() {
                continue;
            }
            // A line without a second field is malformed and skipped; the
            // format is line-oriented and self-delimiting, so one bad line
            // never poisons the rest.
            let Some(split) = line.find(char::is_whitespace) else {
                continue;
            };
            let abbreviation = &line[..split];
            let field = line[split..].trim_start();
            if field.is_empty() {
                continue;
            }
            let (expansion, variants) = parse_expansion_and_variants(field);
            entries.push(AbbrevEntry {
                abbreviation: abbreviation.to_string(),
                expansion,
                variants,
            });
        }
        Ok(entries)
    }
}

/// Formats an expansion field, appending the `~`-introduced variant list
/// when variants are present.
pub fn format_expansion(expansion: &str, variants: Option<&[Abbrev]>) -> String {
    let Some(variants) = variants else {
        return expansion.to_string();
    };
    let mut out = String::with_capacity(expansion.len() + 16 * variants.len());
    out.push_str(expansion);
    let mut first = true;
    for variant in variants {
        out.push(if first { '~' } else { ' ' });
        first = false;
        out.push_str(&variant.abbreviation);
        if variant.expansion != variant.abbreviation {
            out.push('=');
            out.push_str(&variant.expansion);
        }
    }
    out
}

/// Splits an expansion field into the base expansion and, when a `~` is
/// present, the variant list that follows it.
///
/// A variant token with no `=` has an expansion equal to its suffix; a token
/// ending in a bare `=` likewise falls back to the suffix. Tokens with an
/// empty suffix are dropped.
pub fn parse_expansion_and_variants(field: &str) -> (String, Option<Vec<Abbrev>>) {
    let Some(tilde) = field.find('~') else {
        return (field.to_string(), None);
    };
    let expansion = field[..tilde].to_string();
    let mut variants = Vec::new();
    for token in field[tilde + 1..].split_whitespace() {
        let (suffix, value) = match token.find('=') {
            Some(eq) => (&token[..eq], &token[eq + 1..]),
            None => (token, ""),
        };
        if suffix.is_empty() {
            continue;
        }
        let expansion = if value.is_empty() { suffix } else { value };
        variants.push(Abbrev::new(suffix, expansion));
    }
    (expansion, Some(variants))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s_variant() -> Abbrev {
        Abbrev::new("s", "s")
    }

    fn ses_variant() -> Abbrev {
        Abbrev::new("s", "es")
    }

    fn ing_variant_doubling() -> Abbrev {
        Abbrev::new("g", ">ing")
    }

    #[test]
    fn test_format_expansion_no_variants() {
        assert_eq!("dog", format_expansion("dog", None));
    }

    #[test]
    fn test_format_expansion_empty_variants() {
        assert_eq!("dog", format_expansion("dog", Some(&[])));
    }

    #[test]
    fn test_format_expansion_minimal_variant() {
        assert_eq!("dog~s", format_expansion("dog", Some(&[s_variant()])));
    }

    #[test]
    fn test_format_expansion_basic_variant() {
        assert_eq!("dog~s=es", format_expansion("dog", Some(&[ses_variant()])));
    }

    #[test]
    fn test_format_expansion_multi_variants() {
        assert_eq!(
            "dog~s=es g=>ing",
            format_expansion("dog", Some(&[ses_variant(), ing_variant_doubling()]))
        );
    }

    #[test]
    fn test_parse_expansion_without_variants() {
        let (expansion, variants) = parse_expansion_and_variants("dog");
        assert_eq!("dog", expansion);
        assert!(variants.is_none());
    }

    #[test]
    fn test_parse_expansion_minimal_variant() {
        let (expansion, variants) = parse_expansion_and_variants("dog~s");
        assert_eq!("dog", expansion);
        assert_eq!(Some(vec![s_variant()]), variants);
    }

    #[test]
    fn test_parse_expansion_basic_variant() {
        let (expansion, variants) = parse_expansion_and_variants("dog~s=es");
        assert_eq!("dog", expansion);
        assert_eq!(Some(vec![ses_variant()]), variants);
    }

    #[test]
    fn test_parse_expansion_two_variants() {
        let (expansion, variants) = parse_expansion_and_variants("dog~s=es g=ing");
        assert_eq!("dog", expansion);
        assert_eq!(
            Some(vec![ses_variant(), Abbrev::new("g", "ing")]),
            variants
        );
    }

    #[test]
    fn test_parse_expansion_trailing_tilde_yields_empty_variant_list() {
        let (expansion, variants) = parse_expansion_and_variants("dog~");
        assert_eq!("dog", expansion);
        assert_eq!(Some(vec![]), variants);
    }

    #[test]
    fn test_parse_expansion_bare_equals_falls_back_to_suffix() {
        let (_, variants) = parse_expansion_and_variants("dog~s=");
        assert_eq!(Some(vec![s_variant()]), variants);
    }

    #[test]
    fn test_encode_literal_bytes() {
        let entries = vec![
            AbbrevEntry::with_variants("c", "cat", vec![s_variant()]),
            AbbrevEntry::new("d", "dog"),
        ];
        let bytes = TextCodec.encode(&entries);
        assert_eq!("c\tcat~s\nd\tdog\n".as_bytes(), bytes.as_slice());
    }

    #[test]
    fn test_encode_skips_fully_empty_entries() {
        let entries = vec![AbbrevEntry::default(), AbbrevEntry::new("d", "dog")];
        let bytes = TextCodec.encode(&entries);
        assert_eq!("d\tdog\n".as_bytes(), bytes.as_slice());
    }

    #[test]
    fn test_decode_round_trip() {
        let entries = vec![
            AbbrevEntry::with_variants("c", "cat", vec![s_variant()]),
            AbbrevEntry::new("d", "dog"),
        ];
        let decoded = TextCodec
            .decode(&TextCodec.encode(&entries))
            .expect("decode should succeed");
        assert_eq!(entries, decoded);
    }

    #[test]
    fn test_decode_tolerates_blank_lines_and_leading_whitespace() {
        let data = b"\n\n  c\tcat\n\n\td\tdog\n\n";
        let decoded = TextCodec.decode(data).expect("decode should succeed");
        assert_eq!(
            vec![AbbrevEntry::new("c", "cat"), AbbrevEntry::new("d", "dog")],
            decoded
        );
    }

    #[test]
    fn test_decode_skips_malformed_lines() {
        let data = b"loneword\nc\tcat\n";
        let decoded = TextCodec.decode(data).expect("decode should succeed");
        assert_eq!(vec![AbbrevEntry::new("c", "cat")], decoded);
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let data = [0xFF, 0xFE, 0xFD];
        assert!(matches!(
            TextCodec.decode(&data),
            Err(DecodeError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_decode_accepts_crlf_lines() {
        let data = b"c\tcat\r\nd\tdog\r\n";
        let decoded = TextCodec.decode(data).expect("decode should succeed");
        assert_eq!(
            vec![AbbrevEntry::new("c", "cat"), AbbrevEntry::new("d", "dog")],
            decoded
        );
    }
}
