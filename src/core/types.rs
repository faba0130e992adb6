// src/core/types.rs
use serde::{Deserialize, Serialize};

/// Occurrence count of a single character.
pub type Count = u64;

/// One row of a frequency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrequencyEntry {
    /// Exactly one Unicode scalar value.
    pub character: char,
    pub count: Count,
}

impl FrequencyEntry {
    pub fn new(character: char, count: Count) -> Self {
        Self { character, count }
    }
}

impl From<(char, Count)> for FrequencyEntry {
    fn from((character, count): (char, Count)) -> Self {
        Self { character, count }
    }
}
