use printdir_core::{EntryRecord, FieldValue, MetadataField, ScanRequest};
use printdir_export::{ExportFormat, ExportOptions, export, export_to_path, write_csv, write_json};
use printdir_scan::{CancellationToken, DirectoryScanner};
use std::fs;
use tempfile::TempDir;

fn sample_records() -> Vec<EntryRecord> {
    vec![
        EntryRecord::new()
            .with(MetadataField::FileName, "src")
            .with(MetadataField::Size, FieldValue::empty())
            .with(MetadataField::Type, "Directory"),
        EntryRecord::new()
            .with(MetadataField::FileName, "lib.rs")
            .with(MetadataField::Size, 1234u64)
            .with(MetadataField::Type, "RS File"),
    ]
}

#[test]
fn test_json_round_trip() {
    let records = sample_records();
    let mut out = Vec::new();
    write_json(&mut out, &records).unwrap();

    let parsed: Vec<EntryRecord> = serde_json::from_slice(&out).unwrap();
    assert_eq!(parsed, records);
}

#[test]
fn test_json_round_trip_restricted_to_requested_fields() {
    let fields = [MetadataField::FileName, MetadataField::Type];
    let records: Vec<_> = sample_records()
        .iter()
        .map(|r| r.restricted_to(&fields))
        .collect();

    let mut out = Vec::new();
    write_json(&mut out, &records).unwrap();
    let parsed: Vec<serde_json::Map<String, serde_json::Value>> =
        serde_json::from_slice(&out).unwrap();

    for object in &parsed {
        let keys: Vec<_> = object.keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"File Name"));
        assert!(keys.contains(&"Type"));
    }
}

#[test]
fn test_csv_rows_readable() {
    let fields = [MetadataField::FileName, MetadataField::Size, MetadataField::Type];
    let mut out = Vec::new();
    write_csv(&mut out, &fields, &sample_records()).unwrap();

    let mut reader = csv::Reader::from_reader(out.as_slice());
    let headers: Vec<_> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers, vec!["File Name", "Size", "Type"]);

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][1], "");
    assert_eq!(&rows[1][1], "1234");
}

#[test]
fn test_scan_then_export_csv() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("tree");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a.bin"), [1u8; 10]).unwrap();
    fs::write(root.join("b.bin"), [2u8; 20]).unwrap();
    fs::create_dir(root.join("sub")).unwrap();

    let fields = vec![MetadataField::FileName, MetadataField::Size, MetadataField::Type];
    let request = ScanRequest::builder()
        .root(&root)
        .fields(fields.clone())
        .build()
        .unwrap();
    let result = DirectoryScanner::new()
        .scan(&request, &CancellationToken::new(), &mut ())
        .unwrap()
        .unwrap();
    assert_eq!(result.len(), 3);

    let out_path = temp.path().join(ExportFormat::Csv.default_file_name(&root));
    export_to_path(
        &out_path,
        ExportFormat::Csv,
        &request.fields,
        &result.records,
        &ExportOptions::default(),
    )
    .unwrap();

    assert!(out_path.ends_with("tree_listing.csv"));
    let text = fs::read_to_string(&out_path).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "File Name,Size,Type");
    assert_eq!(lines[1], "sub,,Directory");
    assert_eq!(lines[2], "a.bin,10,BIN File");
    assert_eq!(lines[3], "b.bin,20,BIN File");
}

#[test]
fn test_scan_then_export_json_round_trip() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("nested")).unwrap();
    fs::write(temp.path().join("nested/ü.txt"), "u").unwrap();

    let request = ScanRequest::builder()
        .root(temp.path())
        .fields(vec![MetadataField::Path, MetadataField::Size])
        .build()
        .unwrap();
    let result = DirectoryScanner::new()
        .scan(&request, &CancellationToken::new(), &mut ())
        .unwrap()
        .unwrap();

    let mut out = Vec::new();
    export(
        &mut out,
        ExportFormat::Json,
        &request.fields,
        &result.records,
        &ExportOptions::default(),
    )
    .unwrap();
    assert!(String::from_utf8_lossy(&out).contains("ü.txt"));

    let parsed: Vec<EntryRecord> = serde_json::from_slice(&out).unwrap();
    assert_eq!(parsed, result.records);
}

#[test]
fn test_exporters_do_not_modify_input() {
    let records = sample_records();
    let before = records.clone();
    let fields = [MetadataField::Type, MetadataField::FileName];

    for format in [ExportFormat::Csv, ExportFormat::Html, ExportFormat::Json] {
        let mut out = Vec::new();
        export(&mut out, format, &fields, &records, &ExportOptions::default()).unwrap();
        assert!(!out.is_empty());
    }
    assert_eq!(records, before);
}
