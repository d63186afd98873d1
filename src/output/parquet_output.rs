//! Columnar export (Apache Parquet)
//!
//! One column per record field. Text fields become `Utf8` columns, list
//! fields become `List<Utf8>` so tags stay nested. Snappy-compressed.

use crate::output::traits::ExportResult;
use crate::record::{field_names, FieldValue, JobRecord};
use arrow::array::{ArrayRef, ListBuilder, StringArray, StringBuilder};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

pub(crate) fn write_parquet(path: &Path, records: &[JobRecord]) -> ExportResult<()> {
    let Some(first) = records.first() else {
        return Ok(());
    };

    let names = field_names(first.level());
    let list_columns: Vec<bool> = first.fields().iter().map(|(_, v)| v.is_list()).collect();
    let rows: Vec<Vec<(&'static str, FieldValue<'_>)>> =
        records.iter().map(JobRecord::fields).collect();

    let columns: Vec<(&str, ArrayRef)> = names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let array = if list_columns[index] {
                list_column(&rows, index)
            } else {
                text_column(&rows, index)
            };
            (*name, array)
        })
        .collect();

    let batch = RecordBatch::try_from_iter(columns)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn text_column(rows: &[Vec<(&'static str, FieldValue<'_>)>], index: usize) -> ArrayRef {
    let values: Vec<String> = rows
        .iter()
        .map(|row| row[index].1.joined().into_owned())
        .collect();
    Arc::new(StringArray::from(values))
}

fn list_column(rows: &[Vec<(&'static str, FieldValue<'_>)>], index: usize) -> ArrayRef {
    let mut builder = ListBuilder::new(StringBuilder::new());
    for row in rows {
        if let FieldValue::List(items) = &row[index].1 {
            for item in items.iter() {
                builder.values().append_value(item);
            }
        }
        builder.append(true);
    }
    Arc::new(builder.finish())
}
