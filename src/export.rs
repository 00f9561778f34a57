//! CSV mirrors of the SQLite store
//!
//! Two layouts exist. The full export rewrites one file from the entire
//! `charging_log` table after every insert. The daily export appends one line
//! per reading to a file named after the current date and writes the header
//! only when that file is created.

use crate::error::{ChargelogError, Result};
use crate::storage::ChargingSession;
use chrono::NaiveDateTime;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Header of the full session export
pub const FULL_HEADER: [&str; 5] = ["ID", "Timestamp", "KM Stand", "kWh Used", "Date"];

/// Header of the per-day export
pub const DAILY_HEADER: [&str; 3] = ["Date", "KM Status", "kWh Usage"];

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            ChargelogError::export(format!(
                "Failed to create export directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

/// Rewrite `path` with a header row followed by every session
pub fn write_full_export<P: AsRef<Path>>(path: P, sessions: &[ChargingSession]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(FULL_HEADER)?;
    for s in sessions {
        writer.write_record([
            s.id.to_string(),
            s.timestamp.clone(),
            s.km_stand.to_string(),
            s.kwh_used.to_string(),
            s.date.clone(),
        ])?;
    }
    writer
        .flush()
        .map_err(|e| ChargelogError::export(format!("Failed to flush {}: {}", path.display(), e)))?;
    Ok(())
}

/// File that receives readings taken on the given day
pub fn daily_export_path<P: AsRef<Path>>(dir: P, at: NaiveDateTime) -> PathBuf {
    dir.as_ref()
        .join(format!("charging_data_{}.csv", at.format("%Y-%m-%d")))
}

/// Append one reading to the day's file, creating it with a header if needed.
/// Returns the file written.
pub fn append_daily_row<P: AsRef<Path>>(
    dir: P,
    at: NaiveDateTime,
    km_status: f64,
    kwh_usage: f64,
) -> Result<PathBuf> {
    let path = daily_export_path(dir, at);
    ensure_parent(&path)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| ChargelogError::export(format!("Failed to open {}: {}", path.display(), e)))?;
    let needs_header = file
        .metadata()
        .map_err(|e| ChargelogError::export(format!("Failed to stat {}: {}", path.display(), e)))?
        .len()
        == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if needs_header {
        writer.write_record(DAILY_HEADER)?;
    }
    writer.write_record([
        at.format(crate::storage::TIMESTAMP_FORMAT).to_string(),
        km_status.to_string(),
        kwh_usage.to_string(),
    ])?;
    writer
        .flush()
        .map_err(|e| ChargelogError::export(format!("Failed to flush {}: {}", path.display(), e)))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(h, 30, 0)
            .unwrap()
    }

    #[test]
    fn full_export_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charging_log.csv");
        std::fs::write(&path, "stale\nstale\nstale\n").unwrap();

        let sessions = vec![ChargingSession {
            id: 1,
            timestamp: "2024-05-01 20:15:00".to_string(),
            km_stand: 12345.0,
            kwh_used: 7.5,
            date: "2024-05-01".to_string(),
        }];
        write_full_export(&path, &sessions).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "ID,Timestamp,KM Stand,kWh Used,Date\n1,2024-05-01 20:15:00,12345,7.5,2024-05-01\n"
        );
    }

    #[test]
    fn full_export_of_empty_table_has_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("log.csv");
        write_full_export(&path, &[]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "ID,Timestamp,KM Stand,kWh Used,Date\n");
    }

    #[test]
    fn daily_export_writes_header_once_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = append_daily_row(dir.path(), at(1, 8), 1000.0, 50.5).unwrap();
        let second = append_daily_row(dir.path(), at(1, 9), 1010.0, 52.0).unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with("charging_data_2024-05-01.csv"));

        let content = std::fs::read_to_string(&first).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Date,KM Status,kWh Usage",
                "2024-05-01 08:30:00,1000,50.5",
                "2024-05-01 09:30:00,1010,52",
            ]
        );
    }

    #[test]
    fn daily_export_rolls_over_by_date() {
        let dir = tempfile::tempdir().unwrap();
        let a = append_daily_row(dir.path(), at(1, 23), 1.0, 2.0).unwrap();
        let b = append_daily_row(dir.path(), at(2, 0), 3.0, 4.0).unwrap();
        assert_ne!(a, b);
        let content = std::fs::read_to_string(&b).unwrap();
        assert!(content.starts_with("Date,KM Status,kWh Usage\n"));
    }
}
