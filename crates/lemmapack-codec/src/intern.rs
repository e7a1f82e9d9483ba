use std::collections::HashMap;

use lemmapack_types::{PatternId, PatternIdOverflow};

/// Assigns dense ids to distinct suffix sequences in first-seen order.
///
/// Ids are never reused and nothing is evicted; the interner lives for one
/// compression run and backs the catalog that run writes.
#[derive(Debug, Default)]
pub struct PatternInterner {
    ids: HashMap<Vec<String>, PatternId>,
    patterns: Vec<Vec<String>>,
}

impl PatternInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `suffixes`, allocating the next one on first sight.
    ///
    /// Fails once every `u32` id has been handed out.
    pub fn intern(&mut self, suffixes: &[String]) -> Result<PatternId, PatternIdOverflow> {
        if let Some(id) = self.ids.get(suffixes) {
            return Ok(*id);
        }
        let id = PatternId::try_from(self.patterns.len())?;
        self.ids.insert(suffixes.to_vec(), id);
        self.patterns.push(suffixes.to_vec());
        Ok(id)
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

    /// Patterns in ascending id order.
    pub fn patterns(&self) -> impl Iterator<Item = (PatternId, &[String])> {
        (0..=u32::MAX)
            .map(PatternId)
            .zip(self.patterns.iter().map(Vec::as_slice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(suffixes: &[&str]) -> Vec<String> {
        suffixes.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn assigns_ids_in_first_seen_order() {
        let mut interner = PatternInterner::new();
        assert_eq!(interner.intern(&pattern(&["", "a", "n"])), Ok(PatternId(0)));
        assert_eq!(interner.intern(&pattern(&["", "n"])), Ok(PatternId(1)));
        assert_eq!(interner.intern(&pattern(&["", "a", "n"])), Ok(PatternId(0)));
        assert_eq!(interner.intern(&pattern(&["a", "n"])), Ok(PatternId(2)));
        assert_eq!(interner.len(), 3);
    }

    #[test]
    fn identity_is_by_value_and_order() {
        let mut interner = PatternInterner::new();
        let first = interner.intern(&pattern(&["", "a", "n"])).unwrap();
        let reordered = interner.intern(&pattern(&["", "n", "a"])).unwrap();
        assert_ne!(first, reordered);
        assert_eq!(interner.get(reordered), Some(pattern(&["", "n", "a"]).as_slice()));
        assert_eq!(interner.get(PatternId(9)), None);
    }

    #[test]
    fn iterates_patterns_by_id() {
        let mut interner = PatternInterner::new();
        interner.intern(&pattern(&["", "n"])).unwrap();
        interner.intern(&pattern(&["si", "den"])).unwrap();
        let ids: Vec<PatternId> = interner.patterns().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![PatternId(0), PatternId(1)]);
        assert_eq!(interner.get(PatternId(1)), Some(pattern(&["si", "den"]).as_slice()));
    }
}
