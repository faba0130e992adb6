// File: src/core/merge.rs
use crate::core::table::FrequencyTable;
use crate::core::types::Count;
use crate::error::RegressionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What to do when a later snapshot reports a lower count than an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegressionPolicy {
    /// Reject the whole merge.
    #[default]
    Abort,
    /// Keep the earlier count for regressed characters and report them.
    KeepExisting,
}

/// A character whose incoming count was lower than the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regression {
    pub character: char,
    pub existing: Count,
    pub incoming: Count,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeReport {
    pub table: FrequencyTable,
    /// Code-point order. Always empty under [`RegressionPolicy::Abort`].
    pub regressions: Vec<Regression>,
}

/// Folds `incoming` over `existing`: last write wins as long as no count
/// goes down. Any regression rejects the whole merge.
pub fn merge(
    existing: &FrequencyTable,
    incoming: &FrequencyTable,
) -> Result<FrequencyTable, RegressionError> {
    merge_with(existing, incoming, RegressionPolicy::Abort).map(|report| report.table)
}

pub fn merge_with(
    existing: &FrequencyTable,
    incoming: &FrequencyTable,
    policy: RegressionPolicy,
) -> Result<MergeReport, RegressionError> {
    let mut counts: BTreeMap<char, Count> = existing.counts().clone();
    let mut regressions = Vec::new();

    for (&character, &count) in incoming.counts() {
        match counts.get_mut(&character) {
            Some(stored) if count < *stored => regressions.push(Regression {
                character,
                existing: *stored,
                incoming: count,
            }),
            Some(stored) => *stored = count,
            None => {
                counts.insert(character, count);
            }
        }
    }

    if let Some(first) = regressions.first() {
        match policy {
            RegressionPolicy::Abort => {
                return Err(RegressionError {
                    character: first.character,
                    existing: first.existing,
                    incoming: first.incoming,
                    total: regressions.len(),
                });
            }
            RegressionPolicy::KeepExisting => {
                for r in &regressions {
                    log::warn!(
                        "keeping count {} for '{}', incoming snapshot has {}",
                        r.existing,
                        r.character,
                        r.incoming
                    );
                }
            }
        }
    }

    Ok(MergeReport {
        table: counts.into(),
        regressions,
    })
}
