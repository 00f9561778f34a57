//! Charging session detection
//!
//! The wallbox only reports a cumulative energy counter. A session is inferred
//! from that counter alone: a positive reading while idle opens a session, a
//! zero reading while active closes it. The closing zero is not trusted as the
//! final total; the caller fetches one more sample and hands it to
//! [`SessionDetector::close`].
//!
//! A single zero sample is enough to close a session. There is no debounce
//! window, so a transient zero from the charger ends the session early and
//! the next positive sample opens a new one.

use serde::{Deserialize, Serialize};

/// Charging state carried between poll ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No session open
    Idle,
    /// A session is open
    Active,
}

/// Boundary observed on a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Idle to active; the odometer must be captured now
    Started { energy_at_start: f64 },
    /// The first reading after startup was already positive. The session is
    /// tracked but its start values are unknown, so it can never be recorded.
    Adopted { energy: f64 },
    /// Active session observed a zero; fetch the final total and call `close`
    Ending,
}

/// Why a closed session produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The terminal energy read failed
    FinalReadFailed,
    /// The session was in progress before the monitor started
    MissingStart,
    /// The odometer could not be read when the session started
    MissingOdometer,
}

impl DiscardReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinalReadFailed => "final energy read failed",
            Self::MissingStart => "session start was not observed",
            Self::MissingOdometer => "odometer was not captured at session start",
        }
    }
}

/// Result of closing a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionOutcome {
    /// Complete cycle; ready to be recorded
    Ended {
        energy_at_start: f64,
        final_energy: f64,
        energy_consumed: f64,
    },
    /// The cycle is dropped without a record
    Discarded(DiscardReason),
}

/// Edge-triggered session detector over cumulative energy samples
#[derive(Debug, Clone)]
pub struct SessionDetector {
    state: SessionState,
    energy_at_session_start: Option<f64>,
    baseline_seen: bool,
}

impl SessionDetector {
    /// Create an idle detector that has not seen any sample yet
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            energy_at_session_start: None,
            baseline_seen: false,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Counter value captured when the open session started
    pub fn energy_at_session_start(&self) -> Option<f64> {
        self.energy_at_session_start
    }

    /// Evaluate one poll tick. `None` means the energy read failed; the tick
    /// is then ignored entirely.
    pub fn observe(&mut self, sample: Option<f64>) -> Option<Transition> {
        let sample = sample?;
        let positive = sample > 0.0;

        if !self.baseline_seen {
            self.baseline_seen = true;
            if positive {
                self.state = SessionState::Active;
                self.energy_at_session_start = None;
                return Some(Transition::Adopted { energy: sample });
            }
        }

        match (self.state, positive) {
            (SessionState::Idle, true) => {
                self.state = SessionState::Active;
                self.energy_at_session_start = Some(sample);
                Some(Transition::Started {
                    energy_at_start: sample,
                })
            }
            (SessionState::Active, false) => Some(Transition::Ending),
            (SessionState::Active, true) | (SessionState::Idle, false) => None,
        }
    }

    /// Close the open session with a freshly fetched terminal sample. The
    /// detector is idle afterwards regardless of the outcome.
    pub fn close(&mut self, final_sample: Option<f64>) -> SessionOutcome {
        self.state = SessionState::Idle;
        let start = self.energy_at_session_start.take();

        let Some(final_energy) = final_sample else {
            return SessionOutcome::Discarded(DiscardReason::FinalReadFailed);
        };
        let Some(energy_at_start) = start else {
            return SessionOutcome::Discarded(DiscardReason::MissingStart);
        };

        SessionOutcome::Ended {
            energy_at_start,
            final_energy,
            energy_consumed: final_energy - energy_at_start,
        }
    }
}

impl Default for SessionDetector {
    fn default() -> Self {
        Self::new()
    }
}
