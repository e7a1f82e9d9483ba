//! Compress lemma/inflection word lists into a stem table plus a shared
//! pattern catalog, and decode them back.
//!
//! The pipeline runs in one sequential pass:
//! 1. [`LineNormalizer`] cleans extracted lines and drops duplicates.
//! 2. [`RecordReader`] groups marker lines and their inflections into
//!    [`LemmaRecord`]s.
//! 3. [`compress`] finds the longest prefix shared by a lemma and all of its
//!    inflections and strips it.
//! 4. [`PatternInterner`] gives each distinct suffix list a dense id.
//! 5. [`DictionaryEncoder`] writes `stem\tpattern_id\tarity` per lemma and
//!    the catalog of patterns in id order.
//!
//! [`decode`] reverses one entry against a [`Catalog`].
//!
//! # Example
//! ```rust
//! use lemmapack_codec::{Catalog, compress_stream, decode, read_entries};
//!
//! # fn main() -> Result<(), lemmapack_codec::CodecError> {
//! let input = "@kala\nkalaa\nkalan\n@koira\nkoiraa\nkoiran\n";
//! let (mut words, mut patterns) = (Vec::new(), Vec::new());
//! let stats = compress_stream(input.as_bytes(), &mut words, &mut patterns)?;
//! assert_eq!(stats.patterns, 1);
//!
//! let catalog = Catalog::read_from(patterns.as_slice())?;
//! let entries = read_entries(words.as_slice())?;
//! let koira = decode(&entries[1], &catalog)?;
//! assert_eq!(koira.inflections, ["koiraa", "koiran"]);
//! # Ok(()) }
//! ```
//!
//! [`LemmaRecord`]: lemmapack_types::LemmaRecord

mod compress;
mod decode;
mod encode;
mod error;
mod intern;
mod normalize;
mod records;

pub use compress::{compress, shared_stem};
pub use decode::{
    Catalog, DecodedLemma, decode, parse_entry, pattern_fields, read_entries, resolve_pattern,
};
pub use encode::{DictionaryEncoder, EncodeStats, compress_stream, write_catalog};
pub use error::{CodecError, FormatError};
pub use intern::PatternInterner;
pub use normalize::{LineNormalizer, NormalizeStats, normalize_stream};
pub use records::RecordReader;

pub use lemmapack_types as types;
