//! Session and reading recorders
//!
//! A recorder owns the durable side of a completed cycle: one SQLite insert
//! followed by the CSV mirror. Every call opens the database, writes, and
//! closes it again before returning.

use crate::config::{ExportMode, StorageConfig};
use crate::error::Result;
use crate::export::{append_daily_row, write_full_export};
use crate::logging::{StructuredLogger, get_logger};
use crate::storage::{ChargingSession, DATE_FORMAT, MeterReading, Store, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// A session the detector closed with all values present
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedSession {
    /// Odometer captured when the session started (km)
    pub odometer_at_start: f64,
    /// Counter value at session start (kWh)
    pub energy_at_start: f64,
    /// Counter value fetched after the closing zero (kWh)
    pub final_energy: f64,
    /// `final_energy - energy_at_start`
    pub energy_consumed: f64,
    /// Local time the session was closed
    pub ended_at: NaiveDateTime,
}

/// Durable sink for completed sessions
pub trait SessionRecorder: Send {
    /// Persist one session and refresh its export. Any error is a lost write.
    fn record_session(&self, session: &CompletedSession) -> Result<ChargingSession>;
}

/// Durable sink for one-shot odometer/energy readings
pub trait ReadingRecorder: Send {
    fn record_reading(
        &self,
        odometer: f64,
        energy: f64,
        taken_at: NaiveDateTime,
    ) -> Result<MeterReading>;
}

/// Where the CSV mirror goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// Regenerate this file from the whole table
    Full(PathBuf),
    /// Append to `charging_data_<date>.csv` in this directory
    Daily(PathBuf),
}

/// SQLite + CSV recorder
pub struct SqliteRecorder {
    database_path: PathBuf,
    export: ExportTarget,
    daily_dir: PathBuf,
    logger: StructuredLogger,
}

impl SqliteRecorder {
    pub fn new(database_path: PathBuf, export: ExportTarget, daily_dir: PathBuf) -> Self {
        Self {
            database_path,
            export,
            daily_dir,
            logger: get_logger("recorder"),
        }
    }

    /// Build from the storage section of the configuration
    pub fn from_config(storage: &StorageConfig) -> Self {
        let export = match storage.export_mode {
            ExportMode::Full => ExportTarget::Full(PathBuf::from(&storage.export_path)),
            ExportMode::Daily => ExportTarget::Daily(PathBuf::from(&storage.export_dir)),
        };
        Self::new(
            PathBuf::from(&storage.database_path),
            export,
            PathBuf::from(&storage.export_dir),
        )
    }

    /// Create the schema up front so a broken store fails at startup
    pub fn initialize(&self) -> Result<()> {
        Store::open(&self.database_path)?;
        self.logger.info(&format!(
            "Store ready at {}",
            self.database_path.display()
        ));
        Ok(())
    }

    pub fn database_path(&self) -> &std::path::Path {
        &self.database_path
    }

    pub fn export_target(&self) -> &ExportTarget {
        &self.export
    }
}

impl SessionRecorder for SqliteRecorder {
    fn record_session(&self, session: &CompletedSession) -> Result<ChargingSession> {
        let timestamp = session.ended_at.format(TIMESTAMP_FORMAT).to_string();
        let date = session.ended_at.format(DATE_FORMAT).to_string();

        let store = Store::open(&self.database_path)?;
        let row = store.insert_session(
            &timestamp,
            session.odometer_at_start,
            session.energy_consumed,
            &date,
        )?;

        match &self.export {
            ExportTarget::Full(path) => {
                let all = store.sessions()?;
                drop(store);
                write_full_export(path, &all)?;
            }
            ExportTarget::Daily(dir) => {
                drop(store);
                append_daily_row(
                    dir,
                    session.ended_at,
                    session.odometer_at_start,
                    session.energy_consumed,
                )?;
            }
        }

        self.logger.info(&format!(
            "Recorded session #{}: {} km, {:.3} kWh",
            row.id, row.km_stand, row.kwh_used
        ));
        Ok(row)
    }
}

impl ReadingRecorder for SqliteRecorder {
    fn record_reading(
        &self,
        odometer: f64,
        energy: f64,
        taken_at: NaiveDateTime,
    ) -> Result<MeterReading> {
        let date = taken_at.format(DATE_FORMAT).to_string();
        let reading = {
            let store = Store::open(&self.database_path)?;
            store.insert_reading(&date, odometer, energy)?
        };
        let path = append_daily_row(&self.daily_dir, taken_at, odometer, energy)?;

        self.logger.info(&format!(
            "Recorded reading #{}: {} km, {} kWh -> {}",
            reading.id,
            odometer,
            energy,
            path.display()
        ));
        Ok(reading)
    }
}
