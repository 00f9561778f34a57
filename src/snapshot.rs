//! One-shot reading: odometer and energy counter taken once and stored as a
//! [`MeterReading`] without any session tracking.

use crate::error::Result;
use crate::logging::get_logger;
use crate::recorder::ReadingRecorder;
use crate::sources::{EnergySource, MileageSource};
use crate::storage::MeterReading;

/// Result of a snapshot run
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotOutcome {
    /// Both values were read and stored
    Recorded(MeterReading),
    /// At least one read failed; nothing was stored
    Incomplete {
        odometer: Option<f64>,
        energy: Option<f64>,
    },
}

impl SnapshotOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }
}

/// Read the odometer, then the energy counter, and store the pair.
/// A failed read yields [`SnapshotOutcome::Incomplete`]; only a storage fault
/// is returned as an error.
pub async fn run_snapshot<E, M, R>(
    energy: &E,
    mileage: &M,
    recorder: &R,
) -> Result<SnapshotOutcome>
where
    E: EnergySource + ?Sized,
    M: MileageSource + ?Sized,
    R: ReadingRecorder + ?Sized,
{
    let logger = get_logger("snapshot");

    let odometer = match mileage.read_odometer().await {
        Ok(v) => Some(v),
        Err(e) => {
            logger.error(&format!("Odometer read failed: {}", e));
            None
        }
    };
    let total = match energy.read_total_energy().await {
        Ok(v) => Some(v),
        Err(e) => {
            logger.error(&format!("Energy read failed: {}", e));
            None
        }
    };

    let (Some(km), Some(kwh)) = (odometer, total) else {
        logger.warn("Snapshot incomplete; nothing stored");
        return Ok(SnapshotOutcome::Incomplete {
            odometer,
            energy: total,
        });
    };

    let taken_at = chrono::Local::now().naive_local();
    let reading = recorder.record_reading(km, kwh, taken_at)?;
    logger.info(&format!("Snapshot stored: {} km, {} kWh", km, kwh));
    Ok(SnapshotOutcome::Recorded(reading))
}
