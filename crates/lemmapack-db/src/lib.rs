//! Load compressed lemma dictionaries and look up paradigms.
//!
//! A dictionary is two tables written by `lemmapack-codec`: the entries table
//! (`words.txt`, one `stem\tpattern_id\tarity` line per lemma) and the
//! pattern catalog (`inflections.txt`, one tab-joined suffix list per line).
//! Stems and suffixes borrow from the loaded bytes; callers choose between
//! memory-mapped files or owned buffers at runtime via [`LoadMode`].
//!
//! Every entry is checked against the catalog at load time, so lookups never
//! observe a dangling pattern id or an arity mismatch.
//!
//! # Example
//! ```no_run
//! use lemmapack_db::{Dictionary, LoadMode};
//!
//! # fn main() -> anyhow::Result<()> {
//! let dict = Dictionary::load_with_mode("/path/to/dict", LoadMode::Mmap)?;
//! for paradigm in dict.inflections("kala") {
//!     println!("{} -> {:?}", paradigm.lemma(), paradigm.inflections());
//! }
//! println!("kalan is a form of {:?}", dict.lemmas_for("kalan"));
//! # Ok(()) }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lemmapack_codec::{parse_entry, pattern_fields, resolve_pattern};
use lemmapack_types::{PatternId, expand_forms};
use memmap2::Mmap;
use tracing::info;

/// Default file name of the entries table inside a dictionary directory.
pub const WORDS_FILE: &str = "words.txt";
/// Default file name of the pattern catalog inside a dictionary directory.
pub const INFLECTIONS_FILE: &str = "inflections.txt";

/// Strategy for loading dictionary files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map both tables (fast, zero-copy).
    Mmap,
    /// Read both tables into owned buffers (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum FileKind {
    Words,
    Inflections,
}

#[derive(Clone, Copy)]
struct TextRef {
    file: FileKind,
    start: usize,
    len: usize,
}

struct DictFiles {
    words: Buffer,
    inflections: Buffer,
}

impl DictFiles {
    fn bytes(&self, file: FileKind) -> &[u8] {
        match file {
            FileKind::Words => self.words.as_slice(),
            FileKind::Inflections => self.inflections.as_slice(),
        }
    }

    fn text(&self, r: TextRef) -> &str {
        let bytes = self.bytes(r.file);
        let slice = &bytes[r.start..r.start + r.len];
        std::str::from_utf8(slice).expect("dictionary text validated at load")
    }
}

struct EntryData {
    stem: TextRef,
    pattern_id: PatternId,
}

/// One stored paradigm: a stem and the suffixes of its pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Paradigm<'a> {
    pub stem: &'a str,
    pub pattern_id: PatternId,
    /// `suffixes[0]` completes the lemma, the rest the inflections.
    pub suffixes: Vec<&'a str>,
}

impl Paradigm<'_> {
    pub fn lemma(&self) -> String {
        format!("{}{}", self.stem, self.suffixes.first().copied().unwrap_or_default())
    }

    /// Inflected forms in stored order, excluding the lemma.
    pub fn inflections(&self) -> Vec<String> {
        expand_forms(self.stem, self.suffixes.get(1..).unwrap_or_default())
    }

    /// The lemma followed by its inflections.
    pub fn forms(&self) -> Vec<String> {
        expand_forms(self.stem, &self.suffixes)
    }
}

/// In-memory view of a lemma dictionary backed by mmap or owned buffers.
pub struct Dictionary {
    files: DictFiles,
    patterns: Vec<Vec<TextRef>>,
    entries: Vec<EntryData>,
    by_lemma: HashMap<String, Vec<u32>>,
    by_form: HashMap<String, Vec<u32>>,
}

impl Dictionary {
    /// Load `words.txt` and `inflections.txt` from a directory.
    ///
    /// Defaults to memory-mapping the tables. Use [`load_with_mode`] to force
    /// owned buffers instead.
    ///
    /// [`load_with_mode`]: Dictionary::load_with_mode
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(dict_dir, LoadMode::Mmap)
    }

    /// Load from a directory choosing between mmap and owned buffers.
    pub fn load_with_mode(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dict_dir.as_ref();
        Self::load_files(dir.join(WORDS_FILE), dir.join(INFLECTIONS_FILE), mode)
    }

    /// Load from explicit table paths.
    pub fn load_files(
        words_path: impl AsRef<Path>,
        inflections_path: impl AsRef<Path>,
        mode: LoadMode,
    ) -> Result<Self> {
        let words_path = words_path.as_ref();
        let inflections_path = inflections_path.as_ref();
        for path in [words_path, inflections_path] {
            if !path.exists() {
                anyhow::bail!("missing dictionary table: {}", path.display());
            }
        }

        let files = DictFiles {
            words: load_file(words_path.to_path_buf(), mode)?,
            inflections: load_file(inflections_path.to_path_buf(), mode)?,
        };

        let patterns = parse_catalog(files.bytes(FileKind::Inflections))
            .with_context(|| format!("parsing {}", inflections_path.display()))?;
        let entries = parse_entries(files.bytes(FileKind::Words), &patterns)
            .with_context(|| format!("parsing {}", words_path.display()))?;

        let mut dict = Self {
            files,
            patterns,
            entries,
            by_lemma: HashMap::new(),
            by_form: HashMap::new(),
        };
        dict.build_indexes();
        info!(
            "loaded {} entries, {} patterns, {} lemmas",
            dict.entry_count(),
            dict.pattern_count(),
            dict.lemma_count()
        );
        Ok(dict)
    }

    fn build_indexes(&mut self) {
        let mut by_lemma: HashMap<String, Vec<u32>> = HashMap::new();
        let mut by_form: HashMap<String, Vec<u32>> = HashMap::new();
        for idx in 0..self.entries.len() {
            let paradigm = self.paradigm(idx);
            let forms = paradigm.forms();
            let idx = idx as u32;
            let mut forms = forms.into_iter();
            if let Some(lemma) = forms.next() {
                by_form.entry(lemma.clone()).or_default().push(idx);
                by_lemma.entry(lemma).or_default().push(idx);
            }
            for form in forms {
                let slot = by_form.entry(form).or_default();
                // A form repeated inside one paradigm maps back once.
                if slot.last() != Some(&idx) {
                    slot.push(idx);
                }
            }
        }
        self.by_lemma = by_lemma;
        self.by_form = by_form;
    }

    fn paradigm(&self, idx: usize) -> Paradigm<'_> {
        let entry = &self.entries[idx];
        Paradigm {
            stem: self.files.text(entry.stem),
            pattern_id: entry.pattern_id,
            suffixes: self.patterns[entry.pattern_id.index()]
                .iter()
                .map(|r| self.files.text(*r))
                .collect(),
        }
    }

    /// Check whether any entry reconstructs to this lemma.
    pub fn contains_lemma(&self, lemma: &str) -> bool {
        self.by_lemma.contains_key(lemma)
    }

    /// All paradigms stored for a lemma, in entry order.
    pub fn inflections(&self, lemma: &str) -> Vec<Paradigm<'_>> {
        self.by_lemma
            .get(lemma)
            .map(|ids| ids.iter().map(|idx| self.paradigm(*idx as usize)).collect())
            .unwrap_or_default()
    }

    /// Lemmas whose paradigm contains `form`, deduplicated, in entry order.
    pub fn lemmas_for(&self, form: &str) -> Vec<String> {
        let Some(ids) = self.by_form.get(form) else {
            return Vec::new();
        };
        let mut lemmas: Vec<String> = Vec::with_capacity(ids.len());
        for idx in ids {
            let lemma = self.paradigm(*idx as usize).lemma();
            if !lemmas.contains(&lemma) {
                lemmas.push(lemma);
            }
        }
        lemmas
    }

    /// Fetch the paradigm stored on a given line of the entries table.
    pub fn entry(&self, idx: usize) -> Option<Paradigm<'_>> {
        (idx < self.entries.len()).then(|| self.paradigm(idx))
    }

    /// Iterate over every stored paradigm in entry order.
    pub fn iter_paradigms(&self) -> impl Iterator<Item = Paradigm<'_>> + '_ {
        (0..self.entries.len()).map(|idx| self.paradigm(idx))
    }

    /// Number of lines in the entries table.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of distinct patterns in the catalog.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Number of distinct lemmas.
    pub fn lemma_count(&self) -> usize {
        self.by_lemma.len()
    }

    /// Number of distinct surface forms, lemmas included.
    pub fn form_count(&self) -> usize {
        self.by_form.len()
    }
}

fn load_file(path: PathBuf, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

/// Lines with their byte offsets, terminators stripped.
fn lines(bytes: &[u8]) -> impl Iterator<Item = (usize, &[u8])> + '_ {
    let mut offset = 0;
    bytes.split_inclusive(|b| *b == b'\n').map(move |piece| {
        let start = offset;
        offset += piece.len();
        let line = piece.strip_suffix(b"\n").unwrap_or(piece);
        (start, line.strip_suffix(b"\r").unwrap_or(line))
    })
}

fn parse_catalog(bytes: &[u8]) -> Result<Vec<Vec<TextRef>>> {
    let mut patterns = Vec::new();
    for (lineno, (start, line)) in lines(bytes).enumerate() {
        let text = std::str::from_utf8(line)
            .with_context(|| format!("pattern {lineno} is not valid utf-8"))?;
        let suffixes = pattern_fields(text)
            .map(|(offset, field)| TextRef {
                file: FileKind::Inflections,
                start: start + offset,
                len: field.len(),
            })
            .collect();
        patterns.push(suffixes);
    }
    Ok(patterns)
}

fn parse_entries(bytes: &[u8], patterns: &[Vec<TextRef>]) -> Result<Vec<EntryData>> {
    let mut entries = Vec::new();
    for (lineno, (start, line)) in lines(bytes).enumerate() {
        let text = std::str::from_utf8(line)
            .with_context(|| format!("line {} is not valid utf-8", lineno + 1))?;
        let entry = parse_entry(text).with_context(|| format!("line {}", lineno + 1))?;
        resolve_pattern(&entry, patterns).with_context(|| format!("line {}", lineno + 1))?;
        // The stem is the first field, so it starts where the line does.
        entries.push(EntryData {
            stem: TextRef {
                file: FileKind::Words,
                start,
                len: entry.stem.len(),
            },
            pattern_id: entry.pattern_id,
        });
    }
    Ok(entries)
}
