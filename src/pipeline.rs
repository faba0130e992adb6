// File: src/pipeline.rs
use crate::core::counter::CharCounter;
use crate::core::merge::{merge_with, Regression, RegressionPolicy};
use crate::core::parser;
use crate::core::table::FrequencyTable;
use crate::error::{FreqError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads one snapshot file.
pub fn load_file(path: &Path) -> Result<FrequencyTable> {
    let text = read(path)?;
    let table = parser::load(&text).map_err(|source| FreqError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "{}: {} characters, total {}",
        path.display(),
        table.len(),
        table.total_count()
    );
    Ok(table)
}

/// Counts the characters of text files into one table.
pub fn count_files(paths: &[PathBuf], extra_skip: &str) -> Result<FrequencyTable> {
    let mut counter = CharCounter::new().with_extra_skip(extra_skip);
    for path in paths {
        counter
            .add_text(&read(path)?)
            .map_err(|source| FreqError::Count {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("counted {}", path.display());
    }
    Ok(counter.finish())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| FreqError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads snapshots oldest first and merges each into the running table.
///
/// Not meant to be driven from several threads; build the table once and
/// share the result.
#[derive(Debug, Clone, Default)]
pub struct SnapshotPipeline {
    paths: Vec<PathBuf>,
    policy: RegressionPolicy,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: FrequencyTable,
    /// Regressions skipped under [`RegressionPolicy::KeepExisting`], with the
    /// snapshot that reported them.
    pub skipped: Vec<(PathBuf, Regression)>,
}

impl SnapshotPipeline {
    pub fn new(policy: RegressionPolicy) -> Self {
        Self {
            paths: Vec::new(),
            policy,
        }
    }

    pub fn snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn snapshots<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn run(&self) -> Result<PipelineOutput> {
        let (first, rest) = self.paths.split_first().ok_or(FreqError::NoSnapshots)?;
        let mut table = load_file(first)?;
        let mut skipped = Vec::new();

        for path in rest {
            let incoming = load_file(path)?;
            let report = merge_with(&table, &incoming, self.policy).map_err(|err| {
                log::error!("{}: {}", path.display(), err);
                err
            })?;
            skipped.extend(report.regressions.into_iter().map(|r| (path.clone(), r)));
            table = report.table;
        }

        log::info!(
            "loaded {} snapshot(s): {} characters, total {}",
            self.paths.len(),
            table.len(),
            table.total_count()
        );
        Ok(PipelineOutput { table, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CountError;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn no_snapshots_is_an_error() {
        let err = SnapshotPipeline::default().run().unwrap_err();
        assert!(matches!(err, FreqError::NoSnapshots));
    }

    #[test]
    fn merges_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.js", "{\"a\": 1, \"b\": 5}");
        let b = write(dir.path(), "b.js", "{\"a\": 2}");
        let out = SnapshotPipeline::new(RegressionPolicy::Abort)
            .snapshots([&a, &b])
            .run()
            .unwrap();
        assert_eq!(out.table.get('a'), Some(2));
        assert_eq!(out.table.get('b'), Some(5));
        assert!(out.skipped.is_empty());

        // Reversed order regresses 'a'.
        let err = SnapshotPipeline::new(RegressionPolicy::Abort)
            .snapshot(&b)
            .snapshot(&a)
            .run()
            .unwrap_err();
        assert!(matches!(err, FreqError::Regression(r) if r.character == 'a'));
    }

    #[test]
    fn keep_existing_records_the_offending_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.js", "{\"a\": 3}");
        let b = write(dir.path(), "b.js", "{\"a\": 1}");
        let out = SnapshotPipeline::new(RegressionPolicy::KeepExisting)
            .snapshots([&a, &b])
            .run()
            .unwrap();
        assert_eq!(out.table.get('a'), Some(3));
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].0, b);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(dir.path(), "bad.js", "{\"a\": -1}");
        match load_file(&bad) {
            Err(FreqError::Parse { path, source }) => {
                assert_eq!(path, bad);
                assert_eq!(source.line(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.js");
        assert!(matches!(load_file(&missing), Err(FreqError::Read { .. })));
    }

    #[test]
    fn counts_text_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.txt", "我言。");
        let b = write(dir.path(), "b.txt", "我、汝");
        let table = count_files(&[a, b], "、").unwrap();
        assert_eq!(table.get('我'), Some(2));
        assert_eq!(table.total_count(), 4);
    }

    #[test]
    fn count_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.txt", "我言");
        let bad = write(dir.path(), "bad.txt", "我\n«言");
        match count_files(&[good, bad.clone()], "") {
            Err(FreqError::Count { path, source }) => {
                assert_eq!(path, bad);
                assert_eq!(source, CountError::UnmatchedGuillemet { line: 2, found: '«' });
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
