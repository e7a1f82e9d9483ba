use std::iter;

use lemmapack_types::{CompressionUnit, LemmaRecord};

/// Split a record into its shared stem and per-member suffixes.
///
/// Returns `None` for a record without inflections; such lemmas are not
/// stored in the dictionary.
pub fn compress(record: &LemmaRecord) -> Option<CompressionUnit> {
    if record.inflections.is_empty() {
        return None;
    }
    let stem = shared_stem(&record.lemma, &record.inflections);
    let suffixes = record
        .members()
        .map(|member| member[stem.len()..].to_string())
        .collect();
    Some(CompressionUnit {
        stem: stem.to_string(),
        suffixes,
    })
}

/// Longest prefix of `lemma` that every inflection also starts with.
///
/// Candidates shrink one `char` at a time from the full lemma; the empty
/// string ends the search since it prefixes everything.
pub fn shared_stem<'a, S: AsRef<str>>(lemma: &'a str, inflections: &[S]) -> &'a str {
    let boundaries = lemma
        .char_indices()
        .map(|(idx, _)| idx)
        .chain(iter::once(lemma.len()));
    for end in boundaries.rev() {
        let partial = &lemma[..end];
        if inflections
            .iter()
            .all(|form| form.as_ref().starts_with(partial))
        {
            return partial;
        }
    }
    ""
}
