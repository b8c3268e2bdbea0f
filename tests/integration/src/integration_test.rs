//! End-to-end flow across crates: extract, persist the record file, load it
//! back and restore.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use svg_blocks::{
    Error, ExtractOptions, RecordFile, RestoreOptions, extract, restore, stats,
};
use svg_fs::{ConfigStore, io};
use tempfile::TempDir;

const PAGE: &str = r##"<!DOCTYPE html>
<html>
<body>
  <header><svg class="logo" viewBox="0 0 10 10"><path d="M0 0h10v10z"/></svg></header>
  <section>
    <h2>Features</h2>
    <ul>
      <li><svg class="check"><use href="#tick"/></svg> Fast</li>
      <li><svg class="check"><use href="#tick"/></svg> Small</li>
    </ul>
  </section>
</body>
</html>
"##;

#[rstest]
#[case("svgs.json")]
#[case("svgs.yaml")]
#[case("svgs.toml")]
fn test_record_file_survives_storage(#[case] file_name: &str) {
    let temp = TempDir::new().unwrap();
    let records_path = temp.path().join(file_name);
    let html_path = temp.path().join("page_with_placeholders.html");

    let extraction = extract(PAGE, &ExtractOptions::default()).unwrap();
    let date = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let file = RecordFile::new(extraction.records.clone(), 150, date);
    ConfigStore::new().save(&records_path, &file).unwrap();
    io::write_text(&html_path, &extraction.modified_html).unwrap();

    let loaded: RecordFile = ConfigStore::new().load(&records_path).unwrap();
    assert_eq!(loaded, file);

    let records = loaded.into_record_set().unwrap();
    let html = io::read_text(&html_path).unwrap();
    let restoration = restore(&html, &records, &RestoreOptions::default());

    assert_eq!(restoration.html, PAGE);
    assert_eq!(restoration.report.exact, 3);
}

#[test]
fn test_edited_document_restores_after_reload() {
    let temp = TempDir::new().unwrap();
    let records_path = temp.path().join("svgs.json");

    let extraction = extract(PAGE, &ExtractOptions::default()).unwrap();
    let file = RecordFile::new(extraction.records.clone(), 150, Utc::now());
    ConfigStore::new().save(&records_path, &file).unwrap();

    // Strip the id of the second of two identical icons.
    let id = &extraction.records[2].id;
    let edited = extraction.modified_html.replace(id.as_str(), "");

    let loaded: RecordFile = ConfigStore::new().load(&records_path).unwrap();
    let records = loaded.into_record_set().unwrap();
    let restoration = restore(&edited, &records, &RestoreOptions::default());

    assert_eq!(restoration.html, PAGE);
    assert_eq!(restoration.report.exact, 2);
    assert_eq!(restoration.report.context_matched, 1);
}

#[test]
fn test_duplicate_identifier_in_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let records_path = temp.path().join("svgs.json");

    let mut records = extract(PAGE, &ExtractOptions::default()).unwrap().records;
    records[1].id = records[0].id.clone();
    ConfigStore::new()
        .save(&records_path, &RecordFile::new(records, 150, Utc::now()))
        .unwrap();

    let loaded: RecordFile = ConfigStore::new().load(&records_path).unwrap();
    let result = loaded.into_record_set();
    assert!(matches!(result, Err(Error::DuplicateIdentifier { .. })));
}

#[test]
fn test_hand_edited_count_mismatch_is_rejected() {
    let temp = TempDir::new().unwrap();
    let records_path = temp.path().join("svgs.json");

    let extraction = extract(PAGE, &ExtractOptions::default()).unwrap();
    ConfigStore::new()
        .save(&records_path, &RecordFile::new(extraction.records, 150, Utc::now()))
        .unwrap();

    let text = fs::read_to_string(&records_path).unwrap();
    fs::write(&records_path, text.replace("\"total_svgs\": 3", "\"total_svgs\": 4")).unwrap();

    let loaded: RecordFile = ConfigStore::new().load(&records_path).unwrap();
    assert!(matches!(
        loaded.into_record_set(),
        Err(Error::InvalidRecord { .. })
    ));
}

#[test]
fn test_stats_over_loaded_records() {
    let extraction = extract(PAGE, &ExtractOptions::default()).unwrap();
    let summary = stats(&extraction.records);

    assert_eq!(summary.total, 3);
    assert_eq!(summary.min_size, r##"<svg class="check"><use href="#tick"/></svg>"##.len());
    assert_eq!(
        summary.total_size,
        extraction.records.iter().map(|r| r.svg_content.len()).sum::<usize>()
    );
}
