//! SQLite export
//!
//! Records go into a single `jobs` table with one TEXT column per field.
//! List fields are stored as JSON arrays.

use crate::output::traits::ExportResult;
use crate::record::{field_names, FieldValue, JobRecord};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;

/// Name of the table records are written to
pub const TABLE: &str = "jobs";

pub(crate) fn write_sqlite(path: &Path, records: &[JobRecord]) -> ExportResult<()> {
    let Some(first) = records.first() else {
        return Ok(());
    };

    let names = field_names(first.level());
    let quoted: Vec<String> = names.iter().map(|name| format!("\"{}\"", name)).collect();

    let mut conn = Connection::open(path)?;
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY AUTOINCREMENT, {});",
        TABLE,
        quoted
            .iter()
            .map(|column| format!("{} TEXT NOT NULL", column))
            .collect::<Vec<_>>()
            .join(", ")
    ))?;

    let insert = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        TABLE,
        quoted.join(", "),
        (1..=names.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&insert)?;
        for record in records {
            let values = record
                .fields()
                .iter()
                .map(|(_, value)| match value {
                    FieldValue::Text(text) => Ok(text.to_string()),
                    FieldValue::List(items) => serde_json::to_string(items),
                })
                .collect::<Result<Vec<String>, _>>()?;
            stmt.execute(params_from_iter(values.iter()))?;
        }
    }
    tx.commit()?;

    Ok(())
}
