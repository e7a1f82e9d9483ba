use std::io::BufRead;

use lemmapack_types::{DictionaryEntry, FIELD_DELIMITER, PatternId, expand_forms};

use crate::{CodecError, FormatError};

/// Pattern catalog indexed by [`PatternId`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Catalog {
    patterns: Vec<Vec<String>>,
}

impl Catalog {
    pub fn new(patterns: Vec<Vec<String>>) -> Self {
        Self { patterns }
    }

    /// Parse a catalog table; line `n` holds pattern `n`.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, CodecError> {
        let mut patterns: Vec<Vec<String>> = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.strip_suffix('\r').unwrap_or(&line);
            patterns.push(pattern_fields(line).map(|(_, s)| s.to_string()).collect());
        }
        Ok(Self { patterns })
    }

    pub fn get(&self, id: PatternId) -> Option<&[String]> {
        self.patterns.get(id.index()).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Split one catalog line into its suffixes, each with its byte offset.
pub fn pattern_fields(line: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    let mut offset = 0;
    line.split(FIELD_DELIMITER).map(move |field| {
        let start = offset;
        offset += field.len() + FIELD_DELIMITER.len();
        (start, field)
    })
}

/// Find the pattern an entry points at and check its arity.
pub fn resolve_pattern<'a, T>(
    entry: &DictionaryEntry,
    patterns: &'a [Vec<T>],
) -> Result<&'a [T], FormatError> {
    let suffixes = patterns
        .get(entry.pattern_id.index())
        .ok_or(FormatError::UnknownPattern {
            id: entry.pattern_id,
            len: patterns.len(),
        })?;
    if suffixes.len() != entry.arity {
        return Err(FormatError::ArityMismatch {
            id: entry.pattern_id,
            expected: entry.arity,
            actual: suffixes.len(),
        });
    }
    Ok(suffixes)
}

/// A lemma rebuilt from its entry and pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedLemma {
    pub lemma: String,
    pub inflections: Vec<String>,
}

/// Parse one `<stem>\t<pattern_id>\t<arity>` line.
pub fn parse_entry(line: &str) -> Result<DictionaryEntry, FormatError> {
    let malformed = |reason| FormatError::MalformedEntry {
        line: line.to_string(),
        reason,
    };
    let mut fields = line.split(FIELD_DELIMITER);
    let (Some(stem), Some(id), Some(arity), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed("expected three tab-separated fields"));
    };
    let id = id
        .parse::<u32>()
        .map_err(|_| malformed("pattern id is not a non-negative integer"))?;
    let arity = arity
        .parse::<usize>()
        .map_err(|_| malformed("arity is not a non-negative integer"))?;
    Ok(DictionaryEntry {
        stem: stem.to_string(),
        pattern_id: PatternId(id),
        arity,
    })
}

/// Parse a whole entries table.
pub fn read_entries<R: BufRead>(reader: R) -> Result<Vec<DictionaryEntry>, CodecError> {
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        entries.push(parse_entry(line)?);
    }
    Ok(entries)
}

/// Rebuild the lemma and its inflections in their original order.
pub fn decode(entry: &DictionaryEntry, catalog: &Catalog) -> Result<DecodedLemma, FormatError> {
    let suffixes = resolve_pattern(entry, &catalog.patterns)?;
    let mut forms = expand_forms(&entry.stem, suffixes).into_iter();
    let lemma = forms.next().unwrap_or_default();
    Ok(DecodedLemma {
        lemma,
        inflections: forms.collect(),
    })
}
