use std::io::{BufRead, Lines};

use lemmapack_types::LemmaRecord;

use crate::CodecError;

/// Groups a normalized word list into [`LemmaRecord`]s.
///
/// A line starting with `@` or `!` opens a new lemma; every following line
/// up to the next marker is one of its inflections. Blank lines are skipped.
/// Records without inflections are still yielded. Iteration stops after the
/// first error.
pub struct RecordReader<R> {
    lines: Lines<R>,
    line_no: usize,
    pending: Option<LemmaRecord>,
    done: bool,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            pending: None,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<LemmaRecord, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let raw = match self.lines.next() {
                Some(Ok(raw)) => raw,
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
                None => {
                    self.done = true;
                    return self.pending.take().map(Ok);
                }
            };
            self.line_no += 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(record) = LemmaRecord::parse_marker(line) {
                if let Some(finished) = self.pending.replace(record) {
                    return Some(Ok(finished));
                }
                continue;
            }

            match self.pending.as_mut() {
                Some(record) => record.inflections.push(line.to_string()),
                None => {
                    self.done = true;
                    return Some(Err(CodecError::MalformedRecord {
                        line: self.line_no,
                        text: line.to_string(),
                    }));
                }
            }
        }
    }
}
