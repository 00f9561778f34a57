//! # Chargelog - EV Charging Session Logger
//!
//! Polls a wallbox energy API and a vehicle odometer API, infers charging
//! sessions from the cumulative energy counter, and keeps a durable log of
//! every completed session in SQLite with a CSV mirror next to it.
//!
//! ## Features
//!
//! - **Session detection**: Edge-triggered state machine over energy samples
//! - **Vendor APIs**: Viessmann and Easee chargers, BMW and Mercedes vehicles,
//!   or any JSON endpoint addressed by a JSON pointer
//! - **Durable log**: One SQLite row per session, written before the next poll
//! - **CSV export**: Full regeneration or per-day append files
//! - **Snapshot mode**: One-shot odometer/energy reading
//! - **Configuration**: YAML-based configuration with validation
//!
//! ## Architecture
//!
//! - `config`: Configuration management and validation
//! - `logging`: Structured logging and tracing
//! - `sources`: HTTP reading sources for energy and mileage
//! - `detector`: Charging session state machine
//! - `monitor`: Cancellable poll loop
//! - `storage`: SQLite tables
//! - `export`: CSV mirrors
//! - `recorder`: Persistence of completed sessions and readings
//! - `snapshot`: One-shot reading run

pub mod config;
pub mod detector;
pub mod error;
pub mod export;
pub mod logging;
pub mod monitor;
pub mod recorder;
pub mod snapshot;
pub mod sources;
pub mod storage;


// Re-export commonly used types
pub use config::Config;
pub use detector::{SessionDetector, SessionOutcome, SessionState, Transition};
pub use error::{ChargelogError, Result};
pub use monitor::{ChargeMonitor, TickEvent};
