// File: src/persistence.rs
use crate::core::table::FrequencyTable;
use crate::core::writer::to_snapshot_string;
use crate::error::{FreqError, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes into a temp file beside `path`, then renames over it, so readers
/// never see a half-written file.
fn write_atomically<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>,
{
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        fill(&mut writer)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| FreqError::Io(e.error))?;
    Ok(())
}

/// Binary cache of a table, for callers that reload the same data often.
pub fn save_table(table: &FrequencyTable, path: &Path) -> Result<()> {
    write_atomically(path, |writer| {
        bincode::serialize_into(writer, table)?;
        Ok(())
    })?;
    log::debug!("saved {} characters to {}", table.len(), path.display());
    Ok(())
}

pub fn load_table(path: &Path) -> Result<FrequencyTable> {
    let file = File::open(path).map_err(|source| FreqError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    Ok(bincode::deserialize_from(reader)?)
}

/// Writes the table in the snapshot text format.
pub fn save_snapshot(table: &FrequencyTable, name: &str, path: &Path) -> Result<()> {
    let text = to_snapshot_string(table, name);
    write_atomically(path, |writer| {
        writer.write_all(text.as_bytes())?;
        Ok(())
    })?;
    log::info!("wrote {} characters to {}", table.len(), path.display());
    Ok(())
}
