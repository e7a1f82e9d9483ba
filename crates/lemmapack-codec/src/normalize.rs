use std::collections::HashSet;
use std::io::{BufRead, Write};

use lemmapack_types::Sigil;
use tracing::info;

use crate::CodecError;

const LINE_BREAK: &str = "<br/>";
const LINK_OPEN: &str = "[[";
const LINK_CLOSE: &str = "]]";

/// Counters reported by [`normalize_stream`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NormalizeStats {
    pub lines_read: usize,
    pub lines_written: usize,
    pub duplicates: usize,
}

/// Strips markup from extracted word lines and suppresses exact duplicates.
///
/// A tagged marker line also reserves its bare word (every leading sigil
/// stripped), so a later plain line spelling the same word is treated as a
/// duplicate of the lemma.
#[derive(Debug, Default)]
pub struct LineNormalizer {
    seen: HashSet<String>,
    duplicates: usize,
}

impl LineNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize one raw line into zero or more output lines.
    pub fn normalize(&mut self, raw: &str) -> Vec<String> {
        let mut out = Vec::new();
        // Pieces of a split line cannot contain another break.
        for piece in raw.trim().split(LINE_BREAK) {
            let line = strip_markup(piece.trim());
            if line.is_empty() {
                continue;
            }
            if self.seen.contains(line) {
                self.duplicates += 1;
                continue;
            }
            self.seen.insert(line.to_string());
            let bare = line.trim_start_matches(|c: char| Sigil::from_char(c).is_some());
            if bare.len() != line.len() {
                self.seen.insert(bare.to_string());
            }
            out.push(line.to_string());
        }
        out
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

fn strip_markup(line: &str) -> &str {
    let mut line = line;
    if let Some(start) = line.rfind(LINK_OPEN) {
        let inner = &line[start + LINK_OPEN.len()..];
        line = inner.split(LINK_CLOSE).next().unwrap_or(inner);
    }
    if let Some(end) = line.find('<') {
        line = &line[..end];
    }
    line.trim()
}

/// Normalize a whole word list, writing one cleaned line per output line.
pub fn normalize_stream<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
) -> Result<NormalizeStats, CodecError> {
    let mut normalizer = LineNormalizer::new();
    let mut stats = NormalizeStats::default();
    for line in reader.lines() {
        let raw = line?;
        stats.lines_read += 1;
        for cleaned in normalizer.normalize(&raw) {
            writeln!(writer, "{cleaned}")?;
            stats.lines_written += 1;
        }
    }
    writer.flush()?;
    stats.duplicates = normalizer.duplicates();
    info!(
        "normalized {} lines into {} ({} duplicates)",
        stats.lines_read, stats.lines_written, stats.duplicates
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_line_breaks_into_independent_lines() {
        let mut norm = LineNormalizer::new();
        assert_eq!(norm.normalize("kalat<br/>kaloja"), vec!["kalat", "kaloja"]);
    }

    #[test]
    fn unwraps_links_and_trailing_markup() {
        let mut norm = LineNormalizer::new();
        assert_eq!(norm.normalize("[[kalan]]"), vec!["kalan"]);
        assert_eq!(norm.normalize("see [[a]] or [[kalaa|x]]"), vec!["kalaa|x"]);
        assert_eq!(norm.normalize("kalassa<sup>1</sup>"), vec!["kalassa"]);
        assert!(norm.normalize("<span>").is_empty());
    }

    #[test]
    fn suppresses_duplicates_once_emitted() {
        let mut norm = LineNormalizer::new();
        assert_eq!(norm.normalize("kalan"), vec!["kalan"]);
        assert!(norm.normalize("  kalan ").is_empty());
        assert!(norm.normalize("[[kalan]]").is_empty());
        assert_eq!(norm.duplicates(), 2);
    }

    #[test]
    fn tagged_marker_reserves_bare_word() {
        let mut norm = LineNormalizer::new();
        assert_eq!(norm.normalize("@kala"), vec!["@kala"]);
        assert!(norm.normalize("kala").is_empty());
        assert_eq!(norm.normalize("!kala"), vec!["!kala"]);
        assert!(norm.normalize("@kala").is_empty());
    }

    #[test]
    fn stacked_sigils_reserve_only_the_bare_word() {
        let mut norm = LineNormalizer::new();
        assert_eq!(norm.normalize("@@kala"), vec!["@@kala"]);
        assert_eq!(norm.normalize("@kala"), vec!["@kala"]);
        assert!(norm.normalize("kala").is_empty());

        let mut out = Vec::new();
        normalize_stream("@@kala\n@kala\nkala\n".as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "@@kala\n@kala\n");
    }

    #[test]
    fn streams_and_counts() {
        let input = "@kala\nkala\nkalan<br/>kalaa\nkalan\n\n";
        let mut out = Vec::new();
        let stats = normalize_stream(input.as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "@kala\nkalan\nkalaa\n");
        assert_eq!(
            stats,
            NormalizeStats {
                lines_read: 5,
                lines_written: 3,
                duplicates: 2,
            }
        );
    }
}
