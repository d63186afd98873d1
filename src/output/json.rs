//! JSON export: a pretty-printed array of record objects

use crate::output::traits::ExportResult;
use crate::record::JobRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub(crate) fn write_json(path: &Path, records: &[JobRecord]) -> ExportResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
