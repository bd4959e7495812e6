pub mod casing;
pub mod encoding;
pub mod entry;
pub mod expander;
pub mod files;
pub mod resolver;
pub mod scanner;
pub mod suffixes;

// Re-export main types for convenient access
pub use encoding::{AbbrevCodec, BinaryCodec, DecodeError, TextCodec};
pub use entry::{Abbrev, AbbrevEntry};
pub use expander::{edit_for_typed_char, expand_text, ExpansionEdit};
pub use resolver::{AbbrevList, AbbrevProvider, AbbrevResolver};
pub use suffixes::{CommonSuffixes, SuffixRuleStore};
