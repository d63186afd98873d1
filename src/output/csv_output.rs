//! CSV export
//!
//! One header row with the level's field names, then one row per record.
//! List fields are flattened to a single comma-joined cell.

use crate::output::traits::ExportResult;
use crate::record::{field_names, JobRecord};
use std::path::Path;

pub(crate) fn write_csv(path: &Path, records: &[JobRecord]) -> ExportResult<()> {
    let Some(first) = records.first() else {
        return Ok(());
    };

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(field_names(first.level()))?;

    for record in records {
        let row: Vec<String> = record
            .fields()
            .iter()
            .map(|(_, value)| value.joined().into_owned())
            .collect();
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}
