// Structured archive format: length-prefixed records, self-describing
// enough to reject anything that is not one of our archives.
//
// Layout: magic "SHRT", version byte, u32 entry count, then per entry the
// abbreviation and expansion strings (u32 length + UTF-8 bytes each), a
// presence byte for the variant list, and when present a u32 variant count
// followed by each variant's two strings. All integers little-endian.

use super::{AbbrevCodec, DecodeError};
use crate::entry::{Abbrev, AbbrevEntry};

const MAGIC: &[u8; 4] = b"SHRT";
const VERSION: u8 = 1;

/// The structured archive codec, used for default-list persistence and as
/// the preferred clipboard format.
pub struct BinaryCodec;

impl AbbrevCodec for BinaryCodec {
    fn identifier(&self) -> &'static str {
        "application/x-shorthand-archive"
    }

    fn encode(&self, entries: &[AbbrevEntry]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(16 + entries.len() * 32);
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        put_u32(&mut buf, entries.len() as u32);
        for entry in entries {
            put_str(&mut buf, &entry.abbreviation);
            put_str(&mut buf, &entry.expansion);
            match &entry.variants {
                None => buf.push(0),
                Some(variants) => {
                    buf.push(1);
                    put_u32(&mut buf, variants.len() as u32);
                    for variant in variants {
                        put_str(&mut buf, &variant.abbreviation);
                        put_str(&mut buf, &variant.expansion);
                    }
                }
            }
        }
        buf
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<AbbrevEntry>, DecodeError> {
        let mut cursor = Cursor::new(data);
        if cursor.take(MAGIC.len())? != MAGIC.as_slice() {
            return Err(DecodeError::BadHeader);
        }
        let version = cursor.take(1)?[0];
        if version != VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }
        let count = cursor.take_u32()?;
        let mut entries = Vec::with_capacity(count.min(1024) as usize);
        for _ in 0..count {
            let abbreviation = cursor.take_str()?;
            let expansion = cursor.take_str()?;
            let variants = match cursor.take(1)?[0] {
                0 => None,
                _ => {
                    let variant_count = cursor.take_u32()?;
                    let mut variants = Vec::with_capacity(variant_count.min(1024) as usize);
                    for _ in 0..variant_count {
                        let abbreviation = cursor.take_str()?;
                        let expansion = cursor.take_str()?;
                        variants.push(Abbrev {
                            abbreviation,
                            expansion,
                        });
                    }
                    Some(variants)
                }
            };
            entries.push(AbbrevEntry {
                abbreviation,
                expansion,
                variants,
            });
        }
        if cursor.remaining() > 0 {
            return Err(DecodeError::TrailingData(cursor.remaining()));
        }
        Ok(entries)
    }
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn put_str(buf: &mut Vec<u8>, s: &str) {
    put_u32(buf, s.len() as u32);
    buf.extend_from_slice(s.as_bytes());
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::Truncated(self.pos));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn take_u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn take_str(&mut self) -> Result<String, DecodeError> {
        let len = self.take_u32()? as usize;
        let bytes = self.take(len)?;
        Ok(std::str::from_utf8(bytes)?.to_string())
    }
}
