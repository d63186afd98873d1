//! Integration tests for the exporters
//!
//! Every format is written through the public exporter and read back with
//! the same library a downstream consumer would use.

use arrow::array::{Array, ListArray, StringArray};
use chrono::{TimeZone, Utc};
use job_harvest::output::{ExportError, ExportFormat, Exporter, FileExporter, SQLITE_TABLE};
use job_harvest::record::{
    field_names, DetailLevel, DetailRecord, FullRecord, JobRecord, SummaryRecord,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rusqlite::Connection;
use std::fs::{self, File};
use std::path::PathBuf;
use tempfile::TempDir;

fn detail(title: &str, skills: &[&str]) -> DetailRecord {
    DetailRecord {
        title: title.to_string(),
        salary: "IDR 8.000.000 - 12.000.000".to_string(),
        job_type: "Full-time".to_string(),
        education: "Bachelor's Degree".to_string(),
        experience: "1 - 3 years".to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        extra_requirements: vec!["Age 22 - 30".to_string()],
        province: "DKI Jakarta".to_string(),
        city: "Jakarta Selatan".to_string(),
        district: "Kebayoran Baru".to_string(),
        company_name: "Acme".to_string(),
        company_industry: "Software".to_string(),
        company_size: "51-200 employees".to_string(),
        freshness: "Posted 2 days ago".to_string(),
        url: format!("https://glints.com/id/opportunities/jobs/{}", title.to_lowercase()),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
    }
}

fn structured() -> Vec<JobRecord> {
    vec![
        JobRecord::Detail(detail("Data Engineer", &["Python", "SQL"])),
        JobRecord::Detail(detail("Backend Engineer", &[])),
    ]
}

fn exporter(dir: &TempDir, format: ExportFormat) -> FileExporter {
    FileExporter::new(dir.path().join("results"), dir.path().join("fallback"), format)
}

fn export(dir: &TempDir, format: ExportFormat, records: &[JobRecord]) -> PathBuf {
    exporter(dir, format)
        .write(records, "data engineer")
        .expect("Failed to export")
}

#[test]
fn test_json_keeps_lists_nested() {
    let dir = TempDir::new().unwrap();
    let path = export(&dir, ExportFormat::Json, &structured());

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["skills"], serde_json::json!(["Python", "SQL"]));
    assert_eq!(rows[1]["skills"], serde_json::json!([]));
    assert_eq!(rows[0]["timestamp"], "2024-05-01T08:30:00Z");

    let keys: Vec<&String> = rows[0].as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), field_names(DetailLevel::Structured).len());
}

#[test]
fn test_csv_joins_lists_with_commas() {
    let dir = TempDir::new().unwrap();
    let path = export(&dir, ExportFormat::Csv, &structured());
    assert_eq!(path.extension().unwrap(), "csv");

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        field_names(DetailLevel::Structured)
    );

    let skills = headers.iter().position(|h| h == "skills").unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(&rows[0][skills], "Python,SQL");
    assert_eq!(&rows[1][skills], "");
}

#[test]
fn test_full_level_adds_description_column() {
    let dir = TempDir::new().unwrap();
    let records = vec![JobRecord::Full(FullRecord {
        detail: detail("Data Engineer", &["Python"]),
        description: "Build pipelines.\nOwn the warehouse.".to_string(),
    })];
    let path = export(&dir, ExportFormat::Csv, &records);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().last(), Some("description"));

    let row = reader.records().next().unwrap().unwrap();
    assert_eq!(row.iter().last(), Some("Build pipelines.\nOwn the warehouse."));
}

#[test]
fn test_parquet_round_trips_list_columns() {
    let dir = TempDir::new().unwrap();
    let path = export(&dir, ExportFormat::Parquet, &structured());
    assert_eq!(path.extension().unwrap(), "parquet");

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.map(Result::unwrap).collect();
    assert_eq!(batches.len(), 1);
    let batch = &batches[0];
    assert_eq!(batch.num_rows(), 2);

    let titles = batch
        .column_by_name("title")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(titles.value(0), "Data Engineer");
    assert_eq!(titles.value(1), "Backend Engineer");

    let skills = batch
        .column_by_name("skills")
        .unwrap()
        .as_any()
        .downcast_ref::<ListArray>()
        .unwrap();
    let first = skills.value(0);
    let first = first.as_any().downcast_ref::<StringArray>().unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first.value(0), "Python");
    assert_eq!(first.value(1), "SQL");
    assert_eq!(skills.value(1).len(), 0);
}

#[test]
fn test_sqlite_stores_lists_as_json() {
    let dir = TempDir::new().unwrap();
    let path = export(&dir, ExportFormat::Sqlite, &structured());
    assert_eq!(path.extension().unwrap(), "db");

    let conn = Connection::open(&path).unwrap();
    let mut stmt = conn
        .prepare(&format!(
            "SELECT title, skills, city FROM {} ORDER BY id",
            SQLITE_TABLE
        ))
        .unwrap();
    let rows: Vec<(String, String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .map(Result::unwrap)
        .collect();

    assert_eq!(
        rows,
        vec![
            (
                "Data Engineer".to_string(),
                r#"["Python","SQL"]"#.to_string(),
                "Jakarta Selatan".to_string()
            ),
            (
                "Backend Engineer".to_string(),
                "[]".to_string(),
                "Jakarta Selatan".to_string()
            ),
        ]
    );
}

#[test]
fn test_summary_records_use_listing_fields() {
    let dir = TempDir::new().unwrap();
    let records = vec![JobRecord::Summary(SummaryRecord {
        title: "Data Engineer".to_string(),
        company: "Acme".to_string(),
        salary: "Undisclosed".to_string(),
        location: "Jakarta".to_string(),
        freshness: "No Data".to_string(),
        url: "https://glints.com/id/opportunities/jobs/1".to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
    })];
    let path = export(&dir, ExportFormat::Json, &records);

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let keys: Vec<&str> = value[0]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    let mut expected = field_names(DetailLevel::Summary);
    expected.sort_unstable();
    let mut keys = keys;
    keys.sort_unstable();
    assert_eq!(keys, expected);
}

#[test]
fn test_mixed_levels_are_rejected() {
    let dir = TempDir::new().unwrap();
    let mut records = structured();
    records.push(JobRecord::Full(FullRecord {
        detail: detail("ML Engineer", &[]),
        description: "No Data".to_string(),
    }));

    let result = exporter(&dir, ExportFormat::Json).write(&records, "mixed");
    assert!(matches!(result, Err(ExportError::MixedLevels(_, _))));
}

#[test]
fn test_export_falls_back_when_results_dir_is_unusable() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("results"), "occupied").unwrap();

    let path = export(&dir, ExportFormat::Json, &structured());
    assert_eq!(path.parent().unwrap(), dir.path().join("fallback"));
    assert!(path
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("data engineer_"));
}
