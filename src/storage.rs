//! SQLite persistence for charging sessions and meter readings
//!
//! Connections are short-lived: callers open a [`Store`], perform one
//! operation and drop it. No connection outlives a recording operation.

use crate::error::{ChargelogError, Result};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Timestamp format used in the `timestamp` column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date format used in the `date` columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One completed charging session as stored in `charging_log`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingSession {
    pub id: i64,
    pub timestamp: String,
    /// Odometer at session start (km)
    pub km_stand: f64,
    /// Energy delivered during the session (kWh)
    pub kwh_used: f64,
    pub date: String,
}

/// One odometer/energy pair as stored in `data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    pub id: i64,
    pub date: String,
    pub km_status: f64,
    pub kwh_usage: f64,
}

/// SQLite-backed store
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path, creating the schema if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChargelogError::persistence(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA synchronous = FULL;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Append one completed session
    pub fn insert_session(
        &self,
        timestamp: &str,
        km_stand: f64,
        kwh_used: f64,
        date: &str,
    ) -> Result<ChargingSession> {
        self.conn.execute(
            "INSERT INTO charging_log (timestamp, km_stand, kwh_used, date) VALUES (?1, ?2, ?3, ?4)",
            params![timestamp, km_stand, kwh_used, date],
        )?;

        Ok(ChargingSession {
            id: self.conn.last_insert_rowid(),
            timestamp: timestamp.to_string(),
            km_stand,
            kwh_used,
            date: date.to_string(),
        })
    }

    /// All sessions in insertion order
    pub fn sessions(&self) -> Result<Vec<ChargingSession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, km_stand, kwh_used, date FROM charging_log ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ChargingSession {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                km_stand: row.get(2)?,
                kwh_used: row.get(3)?,
                date: row.get(4)?,
            })
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }

    /// Number of stored sessions
    pub fn session_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM charging_log", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Append one odometer/energy pair
    pub fn insert_reading(
        &self,
        date: &str,
        km_status: f64,
        kwh_usage: f64,
    ) -> Result<MeterReading> {
        self.conn.execute(
            "INSERT INTO data (date, km_status, kwh_usage) VALUES (?1, ?2, ?3)",
            params![date, km_status, kwh_usage],
        )?;

        Ok(MeterReading {
            id: self.conn.last_insert_rowid(),
            date: date.to_string(),
            km_status,
            kwh_usage,
        })
    }

    /// All meter readings in insertion order
    pub fn readings(&self) -> Result<Vec<MeterReading>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, date, km_status, kwh_usage FROM data ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(MeterReading {
                id: row.get(0)?,
                date: row.get(1)?,
                km_status: row.get(2)?,
                kwh_usage: row.get(3)?,
            })
        })?;

        let mut readings = Vec::new();
        for row in rows {
            readings.push(row?);
        }
        Ok(readings)
    }
}

/// Create both tables if they do not exist yet
fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS charging_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT,
            km_stand INTEGER,
            kwh_used REAL,
            date TEXT
        );

        CREATE TABLE IF NOT EXISTS data (
            id INTEGER PRIMARY KEY,
            date TEXT,
            km_status REAL,
            kwh_usage REAL
        );
        "#,
    )?;
    Ok(())
}
