//! Charging session monitor
//!
//! The monitor owns the session detector and drives it with one energy read
//! per tick. Within a tick the order is fixed: read energy, evaluate the
//! detector, read the odometer (session start) or the final energy (session
//! end), persist, and only then wait for the next tick. A completed session is
//! therefore on disk before the next read starts.

use crate::detector::{DiscardReason, SessionDetector, SessionOutcome, SessionState, Transition};
use crate::error::Result;
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use crate::recorder::{CompletedSession, SessionRecorder};
use crate::sources::{EnergySource, MileageSource};
use crate::storage::ChargingSession;
use std::time::Duration;
use tokio_util::sync::CancellationToken;


/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// The energy read failed; nothing changed
    ReadFailed,
    /// Steady state, idle or charging
    NoChange { energy: f64 },
    /// A session opened; `odometer` is `None` if the vehicle read failed
    SessionStarted {
        energy_at_start: f64,
        odometer: Option<f64>,
    },
    /// A session was already running when the monitor started
    SessionAdopted { energy: f64 },
    /// A session closed and was written to the store
    SessionRecorded(ChargingSession),
    /// A session closed without a record
    SessionDiscarded(DiscardReason),
}

/// Running counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub total_ticks: u64,
    pub failed_reads: u64,
    pub sessions_recorded: u64,
    pub sessions_discarded: u64,
}

/// Poll loop tying the reading sources, detector and recorder together
pub struct ChargeMonitor<E, M, R> {
    energy: E,
    mileage: M,
    recorder: R,
    detector: SessionDetector,
    odometer_at_start: Option<f64>,
    poll_interval: Duration,
    stats: MonitorStats,
    logger: StructuredLogger,
}

impl<E, M, R> ChargeMonitor<E, M, R>
where
    E: EnergySource,
    M: MileageSource,
    R: SessionRecorder,
{
    pub fn new(energy: E, mileage: M, recorder: R, poll_interval: Duration) -> Self {
        let logger = get_logger_with_context(
            LogContext::new("monitor")
                .with_field("interval_s", poll_interval.as_secs().to_string()),
        );
        Self {
            energy,
            mileage,
            recorder,
            detector: SessionDetector::new(),
            odometer_at_start: None,
            poll_interval,
            stats: MonitorStats::default(),
            logger,
        }
    }

    /// Detector state
    pub fn session_state(&self) -> SessionState {
        self.detector.state()
    }

    /// Odometer captured for the open session, if any
    pub fn odometer_at_start(&self) -> Option<f64> {
        self.odometer_at_start
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    async fn read_energy(&self) -> Option<f64> {
        match self.energy.read_total_energy().await {
            Ok(v) => Some(v),
            Err(e) => {
                self.logger.warn(&format!("Energy read failed: {}", e));
                None
            }
        }
    }

    async fn read_odometer(&self) -> Option<f64> {
        match self.mileage.read_odometer().await {
            Ok(v) => Some(v),
            Err(e) => {
                self.logger.warn(&format!("Odometer read failed: {}", e));
                None
            }
        }
    }

    /// Execute one tick. Only a persistence failure is returned as an error.
    pub async fn tick(&mut self) -> Result<TickEvent> {
        self.stats.total_ticks = self.stats.total_ticks.saturating_add(1);

        let sample = self.read_energy().await;
        if sample.is_none() {
            self.stats.failed_reads = self.stats.failed_reads.saturating_add(1);
        }

        let event = match (self.detector.observe(sample), sample) {
            (_, None) => TickEvent::ReadFailed,
            (None, Some(energy)) => {
                self.logger.debug(&format!("Energy counter at {} kWh", energy));
                TickEvent::NoChange { energy }
            }
            (Some(Transition::Started { energy_at_start }), _) => {
                let odometer = self.read_odometer().await;
                self.odometer_at_start = odometer;
                match odometer {
                    Some(km) => self.logger.info(&format!(
                        "Charging session started at {} kWh, odometer {} km",
                        energy_at_start, km
                    )),
                    None => self.logger.warn(&format!(
                        "Charging session started at {} kWh without odometer; it will not be recorded",
                        energy_at_start
                    )),
                }
                TickEvent::SessionStarted {
                    energy_at_start,
                    odometer,
                }
            }
            (Some(Transition::Adopted { energy }), _) => {
                self.odometer_at_start = None;
                self.logger.warn(&format!(
                    "Charging already in progress at startup ({} kWh); this session will not be recorded",
                    energy
                ));
                TickEvent::SessionAdopted { energy }
            }
            (Some(Transition::Ending), _) => self.finish_session().await?,
        };

        Ok(event)
    }

    async fn finish_session(&mut self) -> Result<TickEvent> {
        let final_sample = self.read_energy().await;
        let odometer = self.odometer_at_start.take();

        let outcome = self.detector.close(final_sample);
        let (energy_at_start, final_energy, energy_consumed) = match outcome {
            SessionOutcome::Discarded(reason) => return Ok(self.discard(reason)),
            SessionOutcome::Ended {
                energy_at_start,
                final_energy,
                energy_consumed,
            } => (energy_at_start, final_energy, energy_consumed),
        };
        let Some(odometer_at_start) = odometer else {
            return Ok(self.discard(DiscardReason::MissingOdometer));
        };

        if energy_consumed < 0.0 {
            self.logger.warn(&format!(
                "Final counter {} kWh is below the session start {} kWh",
                final_energy, energy_at_start
            ));
        }

        let completed = CompletedSession {
            odometer_at_start,
            energy_at_start,
            final_energy,
            energy_consumed,
            ended_at: chrono::Local::now().naive_local(),
        };
        let row = self.recorder.record_session(&completed).map_err(|e| {
            self.logger
                .error(&format!("Failed to persist charging session: {}", e));
            e
        })?;

        self.stats.sessions_recorded = self.stats.sessions_recorded.saturating_add(1);
        self.logger.info(&format!(
            "Charging session ended: {:.3} kWh at {} km",
            energy_consumed, odometer_at_start
        ));
        Ok(TickEvent::SessionRecorded(row))
    }

    fn discard(&mut self, reason: DiscardReason) -> TickEvent {
        self.stats.sessions_discarded = self.stats.sessions_discarded.saturating_add(1);
        self.logger
            .warn(&format!("Charging session ended but discarded: {}", reason.as_str()));
        TickEvent::SessionDiscarded(reason)
    }

    /// Poll until `cancel` fires. The delay follows every tick, including
    /// ticks whose read failed. Returns an error only when a session could
    /// not be persisted.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<()> {
        self.logger.info("Starting charging session monitor");

        loop {
            if cancel.is_cancelled() {
                break;
            }

            self.tick().await?;

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        self.logger.info(&format!(
            "Monitor stopped after {} ticks ({} recorded, {} discarded, {} failed reads)",
            self.stats.total_ticks,
            self.stats.sessions_recorded,
            self.stats.sessions_discarded,
            self.stats.failed_reads
        ));
        Ok(())
    }
}
