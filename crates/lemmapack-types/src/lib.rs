//! Shared types for building and reading compressed lemma dictionaries.
//!
//! A [`LemmaRecord`] is a lemma with its ordered inflected forms as it comes
//! out of the normalized word list. Compressing a record yields a
//! [`CompressionUnit`]: the longest literal prefix shared by every member
//! (the stem) plus the residual suffixes. Suffix sequences are deduplicated
//! into patterns keyed by [`PatternId`], and each lemma is persisted as a
//! [`DictionaryEntry`] `(stem, pattern_id, arity)`.
//!
//! ```rust
//! use lemmapack_types::{LemmaRecord, Marker, Sigil};
//!
//! let record = LemmaRecord::parse_marker("@kala").unwrap();
//! assert_eq!(record.marker, Marker::Tagged(Sigil::At));
//! assert_eq!(record.lemma, "kala");
//! assert_eq!(record.untagged().unwrap().marker, Marker::Plain);
//! ```

use std::fmt;

/// Delimiter between fields on both output tables.
pub const FIELD_DELIMITER: &str = "\t";

/// Leading character that marks a line as the start of a new lemma.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Sigil {
    /// `@word`
    At,
    /// `!word`
    Bang,
}

impl Sigil {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '@' => Some(Sigil::At),
            '!' => Some(Sigil::Bang),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Sigil::At => '@',
            Sigil::Bang => '!',
        }
    }
}

/// Category tag carried by a lemma.
///
/// Marker lines in a word list always carry a sigil. `Plain` is the bare
/// alias of a tagged lemma, or a record assembled directly by a caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Marker {
    Plain,
    Tagged(Sigil),
}

impl Marker {
    pub fn sigil(self) -> Option<Sigil> {
        match self {
            Marker::Plain => None,
            Marker::Tagged(sigil) => Some(sigil),
        }
    }
}

/// A lemma and its inflected forms in input order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LemmaRecord {
    pub marker: Marker,
    /// Base form with any sigil stripped.
    pub lemma: String,
    pub inflections: Vec<String>,
}

impl LemmaRecord {
    pub fn new(marker: Marker, lemma: impl Into<String>) -> Self {
        Self {
            marker,
            lemma: lemma.into(),
            inflections: Vec::new(),
        }
    }

    pub fn with_inflections<I, S>(marker: Marker, lemma: impl Into<String>, inflections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            marker,
            lemma: lemma.into(),
            inflections: inflections.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a marker line (`@word` or `!word`) into an empty record.
    ///
    /// Returns `None` when the line does not start with a sigil.
    pub fn parse_marker(line: &str) -> Option<Self> {
        let mut chars = line.chars();
        let sigil = chars.next().and_then(Sigil::from_char)?;
        Some(Self::new(Marker::Tagged(sigil), chars.as_str()))
    }

    /// The untagged alias of a tagged record, without inflections.
    pub fn untagged(&self) -> Option<Self> {
        match self.marker {
            Marker::Plain => None,
            Marker::Tagged(_) => Some(Self::new(Marker::Plain, self.lemma.clone())),
        }
    }

    /// The line this record's marker was read from.
    pub fn marker_line(&self) -> String {
        match self.marker.sigil() {
            Some(sigil) => format!("{}{}", sigil.to_char(), self.lemma),
            None => self.lemma.clone(),
        }
    }

    /// The lemma followed by its inflections.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.lemma.as_str()).chain(self.inflections.iter().map(String::as_str))
    }
}

/// Dense pattern identifier; equal to the pattern's line in the catalog.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PatternId(pub u32);

impl PatternId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for PatternId {
    fn from(value: u32) -> Self {
        PatternId(value)
    }
}

/// Returned when a catalog position does not fit in a [`PatternId`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PatternIdOverflow(pub usize);

impl fmt::Display for PatternIdOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pattern index {} exceeds {}", self.0, u32::MAX)
    }
}

impl std::error::Error for PatternIdOverflow {}

impl TryFrom<usize> for PatternId {
    type Error = PatternIdOverflow;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        u32::try_from(index)
            .map(PatternId)
            .map_err(|_| PatternIdOverflow(index))
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A lemma split into its shared stem and per-member suffixes.
///
/// `suffixes[0]` belongs to the lemma, `suffixes[i]` to inflection `i - 1`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompressionUnit {
    pub stem: String,
    pub suffixes: Vec<String>,
}

impl CompressionUnit {
    pub fn arity(&self) -> usize {
        self.suffixes.len()
    }

    /// Rebuild every member as `stem + suffix`.
    pub fn expand(&self) -> Vec<String> {
        expand_forms(&self.stem, &self.suffixes)
    }
}

/// Concatenate a stem onto each suffix.
pub fn expand_forms<S: AsRef<str>>(stem: &str, suffixes: &[S]) -> Vec<String> {
    suffixes
        .iter()
        .map(|suffix| {
            let suffix = suffix.as_ref();
            let mut form = String::with_capacity(stem.len() + suffix.len());
            form.push_str(stem);
            form.push_str(suffix);
            form
        })
        .collect()
}

/// One persisted line of the entries table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DictionaryEntry {
    pub stem: String,
    pub pattern_id: PatternId,
    /// Number of suffixes in the referenced pattern.
    pub arity: usize,
}

impl fmt::Display for DictionaryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
            self.stem, self.pattern_id, self.arity
        )
    }
}
