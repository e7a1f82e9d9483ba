use std::io::{self, BufRead, Write};

use lemmapack_types::{DictionaryEntry, FIELD_DELIMITER, LemmaRecord};
use tracing::{debug, info};

use crate::compress::compress;
use crate::intern::PatternInterner;
use crate::records::RecordReader;
use crate::CodecError;

/// Counters reported when an encoding run finishes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EncodeStats {
    pub lemmas_read: usize,
    pub entries_written: usize,
    /// Lemmas skipped because they had no inflections.
    pub dropped_empty: usize,
    pub patterns: usize,
}

/// Writes one entry line per compressed lemma, then the pattern catalog.
///
/// Entries go out as soon as they are pushed, in arrival order. The catalog
/// can only be written once every lemma has been seen, by [`finish`].
/// There is no recovery from a failed run; both tables must be rebuilt.
///
/// [`finish`]: DictionaryEncoder::finish
pub struct DictionaryEncoder<W> {
    entries: W,
    interner: PatternInterner,
    stats: EncodeStats,
}

impl<W: Write> DictionaryEncoder<W> {
    pub fn new(entries: W) -> Self {
        Self {
            entries,
            interner: PatternInterner::new(),
            stats: EncodeStats::default(),
        }
    }

    /// Compress, intern and write one record.
    ///
    /// Returns the written entry, or `None` when the record was dropped for
    /// having no inflections.
    pub fn push(&mut self, record: &LemmaRecord) -> Result<Option<DictionaryEntry>, CodecError> {
        self.stats.lemmas_read += 1;
        let Some(unit) = compress(record) else {
            debug!("dropping {} (no inflections)", record.marker_line());
            self.stats.dropped_empty += 1;
            return Ok(None);
        };

        if is_reserved(&unit.stem) || unit.suffixes.iter().any(|s| is_reserved(s)) {
            return Err(CodecError::ReservedCharacter {
                lemma: record.lemma.clone(),
            });
        }

        let pattern_id = self.interner.intern(&unit.suffixes)?;
        let entry = DictionaryEntry {
            arity: unit.arity(),
            stem: unit.stem,
            pattern_id,
        };
        writeln!(self.entries, "{entry}")?;
        self.stats.entries_written += 1;
        Ok(Some(entry))
    }

    pub fn interner(&self) -> &PatternInterner {
        &self.interner
    }

    /// Flush the entries table and write the catalog in id order.
    pub fn finish<C: Write>(mut self, catalog: C) -> Result<EncodeStats, CodecError> {
        self.entries.flush()?;
        write_catalog(&self.interner, catalog)?;
        self.stats.patterns = self.interner.len();
        info!(
            "encoded {} of {} lemmas with {} patterns ({} without inflections)",
            self.stats.entries_written,
            self.stats.lemmas_read,
            self.stats.patterns,
            self.stats.dropped_empty
        );
        Ok(self.stats)
    }
}

fn is_reserved(field: &str) -> bool {
    field.contains(['\t', '\n', '\r'])
}

/// Write one catalog line per pattern, suffixes joined by tabs.
pub fn write_catalog<C: Write>(interner: &PatternInterner, mut out: C) -> io::Result<()> {
    for (_, suffixes) in interner.patterns() {
        writeln!(out, "{}", suffixes.join(FIELD_DELIMITER))?;
    }
    out.flush()
}

/// Read a normalized word list and write both dictionary tables.
pub fn compress_stream<R, W, C>(input: R, entries: W, catalog: C) -> Result<EncodeStats, CodecError>
where
    R: BufRead,
    W: Write,
    C: Write,
{
    let mut encoder = DictionaryEncoder::new(entries);
    for record in RecordReader::new(input) {
        encoder.push(&record?)?;
    }
    encoder.finish(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lemmapack_types::{Marker, PatternId};

    fn record(lemma: &str, inflections: &[&str]) -> LemmaRecord {
        LemmaRecord::with_inflections(Marker::Plain, lemma, inflections.iter().copied())
    }

    #[test]
    fn writes_entries_in_arrival_order_and_catalog_last() {
        let mut entries = Vec::new();
        let mut catalog = Vec::new();
        let mut encoder = DictionaryEncoder::new(&mut entries);
        encoder.push(&record("kala", &["kalaa", "kalan"])).unwrap();
        encoder.push(&record("talo", &["talon"])).unwrap();
        encoder.push(&record("koira", &["koiraa", "koiran"])).unwrap();
        let stats = encoder.finish(&mut catalog).unwrap();

        assert_eq!(
            String::from_utf8(entries).unwrap(),
            "kala\t0\t3\ntalo\t1\t2\nkoira\t0\t3\n"
        );
        assert_eq!(String::from_utf8(catalog).unwrap(), "\ta\tn\n\tn\n");
        assert_eq!(stats.entries_written, 3);
        assert_eq!(stats.patterns, 2);
    }

    #[test]
    fn dropped_lemma_consumes_no_pattern() {
        let mut entries = Vec::new();
        let mut encoder = DictionaryEncoder::new(&mut entries);
        assert_eq!(encoder.push(&record("puu", &[])).unwrap(), None);
        let talo = encoder.push(&record("talo", &["talon"])).unwrap().unwrap();
        assert_eq!(talo.pattern_id, PatternId(0));
        assert_eq!(encoder.interner().len(), 1);
        let stats = encoder.finish(io::sink()).unwrap();
        assert_eq!(stats.dropped_empty, 1);
        assert_eq!(stats.lemmas_read, 2);
    }

    #[test]
    fn rejects_fields_holding_delimiters() {
        let mut encoder = DictionaryEncoder::new(io::sink());
        let err = encoder.push(&record("a\tb", &["a\tbc"])).unwrap_err();
        assert!(matches!(err, CodecError::ReservedCharacter { .. }));
    }

    #[test]
    fn stream_aborts_on_malformed_input() {
        let err = compress_stream("talon\n@talo\n".as_bytes(), io::sink(), io::sink()).unwrap_err();
        assert!(matches!(err, CodecError::MalformedRecord { line: 1, .. }));
    }
}
