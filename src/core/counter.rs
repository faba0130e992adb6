// File: src/core/counter.rs
use crate::core::table::FrequencyTable;
use crate::core::types::Count;
use crate::error::CountError;
use std::collections::{BTreeMap, HashSet};

/// Sentence punctuation that never counts as a character.
pub const DEFAULT_SKIP: &str = "！？「」。";

/// Stands in for a word that has no written form; never counted.
pub const PLACEHOLDER: &str = "xizi";

const OPEN_CONTRACTION: char = '«';
const CLOSE_CONTRACTION: char = '»';

/// Builds a table by counting the characters of running text.
///
/// Whitespace, ASCII punctuation and [`DEFAULT_SKIP`] are ignored, plus any
/// extra characters passed to [`CharCounter::with_extra_skip`]. The
/// [`PLACEHOLDER`] token is skipped as a whole; any other `x` is an error.
/// `«…»` marks a contraction: the guillemets are dropped and the characters
/// between them counted, and they must pair up.
#[derive(Debug, Clone)]
pub struct CharCounter {
    counts: BTreeMap<char, Count>,
    skip: HashSet<char>,
}

impl CharCounter {
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
            skip: DEFAULT_SKIP.chars().collect(),
        }
    }

    pub fn with_extra_skip(mut self, extra: &str) -> Self {
        self.skip.extend(extra.chars());
        self
    }

    fn is_skipped(&self, c: char) -> bool {
        c.is_whitespace() || c.is_ascii_punctuation() || self.skip.contains(&c)
    }

    /// Adds every countable character of `text`. On error nothing from
    /// `text` is kept.
    pub fn add_text(&mut self, text: &str) -> Result<(), CountError> {
        let mut pending: BTreeMap<char, Count> = BTreeMap::new();
        let mut open_at: Option<usize> = None;
        let mut line = 1;
        let mut rest = text;

        while let Some(c) = rest.chars().next() {
            rest = &rest[c.len_utf8()..];
            if c == '\n' {
                line += 1;
            }

            match c {
                OPEN_CONTRACTION => {
                    if open_at.is_some() {
                        return Err(CountError::UnmatchedGuillemet { line, found: c });
                    }
                    open_at = Some(line);
                }
                CLOSE_CONTRACTION => {
                    if open_at.take().is_none() {
                        return Err(CountError::UnmatchedGuillemet { line, found: c });
                    }
                }
                _ if self.is_skipped(c) => log::trace!("skipped: {c:?}"),
                'x' => match rest.strip_prefix(&PLACEHOLDER[1..]) {
                    Some(after) => {
                        log::trace!("skipped placeholder");
                        rest = after;
                    }
                    None => return Err(CountError::StrayX { line }),
                },
                _ => {
                    let count = pending.entry(c).or_insert(0);
                    *count = count.saturating_add(1);
                }
            }
        }

        if let Some(line) = open_at {
            return Err(CountError::UnmatchedGuillemet {
                line,
                found: OPEN_CONTRACTION,
            });
        }

        for (c, n) in pending {
            let count = self.counts.entry(c).or_insert(0);
            *count = count.saturating_add(n);
        }
        Ok(())
    }

    pub fn finish(self) -> FrequencyTable {
        self.counts.into()
    }
}

impl Default for CharCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_characters_and_skips_punctuation() {
        let mut counter = CharCounter::new();
        counter.add_text("「我言汝。」 我学！\n«足手» 我?").unwrap();
        let table = counter.finish();

        assert_eq!(table.get('我'), Some(3));
        assert_eq!(table.get('言'), Some(1));
        assert_eq!(table.get('足'), Some(1));
        for skipped in ['「', '」', '。', '！', '«', '»', '?', ' ', '\n'] {
            assert_eq!(table.get(skipped), None, "{skipped:?}");
        }
        assert_eq!(table.total_count(), 8);
    }

    #[test]
    fn placeholder_is_not_counted() {
        let mut counter = CharCounter::new();
        counter.add_text("我xizi彼").unwrap();
        let table = counter.finish();

        for c in ['x', 'i', 'z'] {
            assert_eq!(table.get(c), None, "{c:?}");
        }
        assert_eq!(table.get('我'), Some(1));
        assert_eq!(table.get('彼'), Some(1));
        assert_eq!(table.total_count(), 2);
    }

    #[test]
    fn stray_x_is_rejected() {
        for text in ["我x彼", "\nxiz", "xizj", "x"] {
            let mut counter = CharCounter::new();
            let err = counter.add_text(text).unwrap_err();
            assert!(matches!(err, CountError::StrayX { .. }), "{text:?}: {err:?}");
        }

        let mut counter = CharCounter::new();
        assert_eq!(
            counter.add_text("我\n彼x").unwrap_err(),
            CountError::StrayX { line: 2 }
        );
    }

    #[test]
    fn unmatched_guillemets_are_rejected() {
        let mut counter = CharCounter::new();
        assert_eq!(
            counter.add_text("我\n«足手\n彼").unwrap_err(),
            CountError::UnmatchedGuillemet {
                line: 2,
                found: '«'
            }
        );
        assert_eq!(
            counter.add_text("足手»").unwrap_err(),
            CountError::UnmatchedGuillemet {
                line: 1,
                found: '»'
            }
        );
        assert_eq!(
            counter.add_text("«足«手»»").unwrap_err(),
            CountError::UnmatchedGuillemet {
                line: 1,
                found: '«'
            }
        );
    }

    #[test]
    fn failed_text_leaves_counts_untouched() {
        let mut counter = CharCounter::new();
        counter.add_text("我").unwrap();
        assert!(counter.add_text("我我«").is_err());
        let table = counter.finish();
        assert_eq!(table.get('我'), Some(1));
        assert_eq!(table.total_count(), 1);
    }

    #[test]
    fn accumulates_across_calls() {
        let mut counter = CharCounter::new();
        counter.add_text("ab").unwrap();
        counter.add_text("b").unwrap();
        let table = counter.finish();
        assert_eq!(table.get('a'), Some(1));
        assert_eq!(table.get('b'), Some(2));
    }

    #[test]
    fn extra_skip_characters() {
        let mut counter = CharCounter::new().with_extra_skip("、，");
        counter.add_text("汝、我，彼").unwrap();
        let table = counter.finish();
        assert_eq!(table.len(), 3);
        assert!(!table.contains('、'));
    }

    #[test]
    fn empty_text_gives_empty_table() {
        assert!(CharCounter::new().finish().is_empty());
    }
}
