// File: src/core/writer.rs
use crate::core::table::FrequencyTable;

/// Declaration name used when none is configured.
pub const DEFAULT_SNAPSHOT_NAME: &str = "CHAR_COUNT";

/// Renders a table in the snapshot format, most frequent character first.
/// The output loads back into an equal table.
pub fn to_snapshot_string(table: &FrequencyTable, name: &str) -> String {
    let mut out = String::with_capacity(32 + table.len() * 16);
    out.push_str("const ");
    out.push_str(name);
    out.push_str(" = {\n");
    for entry in table.ranked() {
        // `Value`'s Display is the escaped JSON literal.
        let key = serde_json::Value::from(entry.character.to_string());
        out.push_str(&format!("    {key}: {},\n", entry.count));
    }
    out.push_str("}\n");
    out
}
