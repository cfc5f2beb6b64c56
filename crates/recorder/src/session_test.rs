//! Tests for CSV recording sessions

use std::fs;
use std::time::Duration;

use patchbay_protocol::ClientId;
use tempfile::tempdir;

use crate::RecordingSession;

fn outputs(values: [&str; 5]) -> [String; 5] {
    values.map(String::from)
}

#[test]
fn test_header_names_frozen_columns() {
    let dir = tempdir().unwrap();
    let session =
        RecordingSession::start(dir.path(), &[ClientId::new(1), ClientId::new(3)]).unwrap();

    let contents = fs::read_to_string(session.path()).unwrap();
    assert_eq!(
        contents.trim_end(),
        "timestamp,client1_ch0,client1_ch1,client1_ch2,client1_ch3,client1_ch4,\
         client3_ch0,client3_ch1,client3_ch2,client3_ch3,client3_ch4"
    );
}

#[test]
fn test_artifact_lands_in_logs_dir_with_monitor_prefix() {
    let dir = tempdir().unwrap();
    let logs = dir.path().join("logs");
    let session = RecordingSession::start(&logs, &[ClientId::new(1)]).unwrap();

    let name = session.path().file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("monitor_"));
    assert!(name.ends_with(".csv"));
    assert!(logs.is_dir());
}

#[test]
fn test_rows_carry_relative_timestamp_and_quoted_values() {
    let dir = tempdir().unwrap();
    let mut session = RecordingSession::start(dir.path(), &[ClientId::new(1)]).unwrap();

    session
        .append(
            Duration::new(3, 14_512_000),
            &[Some(outputs(["hello", "", "", "", "x"]))],
        )
        .unwrap();

    let contents = fs::read_to_string(session.path()).unwrap();
    let row = contents.lines().nth(1).unwrap();
    assert_eq!(row, "\"3.014512\",\"hello\",\"\",\"\",\"\",\"x\"");
}

#[test]
fn test_one_row_per_tick() {
    let dir = tempdir().unwrap();
    let mut session = RecordingSession::start(dir.path(), &[ClientId::new(1)]).unwrap();

    for tick in 0..4 {
        session
            .append(
                Duration::from_millis(500 * tick),
                &[Some(outputs(["v", "", "", "", ""]))],
            )
            .unwrap();
    }

    let contents = fs::read_to_string(session.path()).unwrap();
    assert_eq!(contents.lines().count(), 5); // header + 4 rows
}

#[test]
fn test_disconnected_client_holds_last_known_value() {
    let dir = tempdir().unwrap();
    let mut session = RecordingSession::start(dir.path(), &[ClientId::new(2)]).unwrap();

    session
        .append(
            Duration::from_secs(1),
            &[Some(outputs(["last words", "", "", "", ""]))],
        )
        .unwrap();
    // Client gone: snapshot is None, columns repeat the cached value
    session.append(Duration::from_secs(2), &[None]).unwrap();
    session.append(Duration::from_secs(3), &[None]).unwrap();

    let contents = fs::read_to_string(session.path()).unwrap();
    let rows: Vec<&str> = contents.lines().skip(1).collect();
    assert_eq!(rows.len(), 3);
    for row in rows {
        assert!(row.contains("\"last words\""), "row was: {row}");
    }
}

#[test]
fn test_line_breaks_flattened_and_quotes_doubled() {
    let dir = tempdir().unwrap();
    let mut session = RecordingSession::start(dir.path(), &[ClientId::new(1)]).unwrap();

    session
        .append(
            Duration::ZERO,
            &[Some(outputs(["two\nlines", "say \"hi\"", "", "", ""]))],
        )
        .unwrap();

    let contents = fs::read_to_string(session.path()).unwrap();
    let row = contents.lines().nth(1).unwrap();
    assert!(row.contains("\"two lines\""));
    assert!(row.contains("\"say \"\"hi\"\"\""));
}

#[test]
fn test_empty_frozen_set_records_timestamps_only() {
    let dir = tempdir().unwrap();
    let mut session = RecordingSession::start(dir.path(), &[]).unwrap();
    session.append(Duration::from_secs(1), &[]).unwrap();

    let contents = fs::read_to_string(session.path()).unwrap();
    assert_eq!(contents.lines().next().unwrap(), "timestamp");
    assert_eq!(contents.lines().nth(1).unwrap(), "\"1.000000\"");
}

#[test]
fn test_start_fails_when_logs_dir_is_a_file() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("logs");
    fs::write(&blocker, "not a directory").unwrap();

    let result = RecordingSession::start(&blocker, &[ClientId::new(1)]);
    assert!(result.is_err());
}
