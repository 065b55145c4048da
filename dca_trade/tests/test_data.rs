use chrono::{NaiveDate, NaiveDateTime};
use dca_trade::data::DataLoader;
use dca_trade::DcaError;
use std::io::Write;
use tempfile::NamedTempFile;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_load_text_timestamps_sorted() {
    let file = csv_file(&[
        "Timestamp,Open,High,Low,Close,Volume",
        "2024-01-01 02:00:00,102.0,103.0,101.0,102.5,10",
        "2024-01-01 00:00:00,100.0,101.0,99.0,100.5,12",
        "2024-01-01 01:00:00,101.0,102.0,100.0,101.5,11",
    ]);

    let series = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.first_timestamp(), Some(at(2024, 1, 1, 0)));
    assert_eq!(series.last_timestamp(), Some(at(2024, 1, 1, 2)));
    let opens: Vec<f64> = series.iter().map(|bar| bar.open).collect();
    assert_eq!(opens, vec![100.0, 101.0, 102.0]);
    assert_eq!(series.bars()[0].close, Some(100.5));
    assert_eq!(series.bars()[0].volume, Some(12.0));
}

#[test]
fn test_load_unix_timestamps() {
    let file = csv_file(&[
        "Timestamp,Open,High,Low,Close,Volume",
        "1704067200.0,42000.5,42100.0,41900.0,42050.0,3.5",
        "1704070800.0,42050.0,42200.0,42000.0,42150.0,4.1",
    ]);

    let series = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(series.first_timestamp(), Some(at(2024, 1, 1, 0)));
    assert_eq!(series.last_timestamp(), Some(at(2024, 1, 1, 1)));
}

#[test]
fn test_only_open_is_required() {
    let file = csv_file(&[
        "Timestamp,Open",
        "2024-01-01 00:00:00,10",
        "2024-01-01 01:00:00,20",
    ]);

    let series = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series.bars()[1].open, 20.0);
    assert!(series.bars()[1].high.is_none());
}

#[test]
fn test_rows_without_open_are_skipped() {
    let file = csv_file(&[
        "Timestamp,Open,Close",
        "2024-01-01 00:00:00,10.0,10.5",
        "2024-01-01 01:00:00,,11.0",
        "2024-01-01 02:00:00,12.0,12.5",
    ]);

    let series = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(series.len(), 2);
}

#[test]
fn test_missing_timestamp_column() {
    let file = csv_file(&["Date,Open", "2024-01-01,10.0"]);

    match DataLoader::from_csv(file.path()) {
        Err(DcaError::DataError(msg)) => assert!(msg.contains("Timestamp")),
        other => panic!("Expected DataError, got {:?}", other),
    }
}

#[test]
fn test_unparsable_timestamp() {
    let file = csv_file(&[
        "Timestamp,Open",
        "2024-01-01 00:00:00,10.0",
        "not a date,11.0",
    ]);

    match DataLoader::from_csv(file.path()) {
        Err(DcaError::DataError(msg)) => assert!(msg.contains("line 3")),
        other => panic!("Expected DataError, got {:?}", other),
    }
}

#[test]
fn test_missing_file() {
    assert!(DataLoader::from_csv("nonexistent_prices.csv").is_err());
}
