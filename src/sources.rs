//! Vendor API reading sources
//!
//! Two collaborators feed the monitor: the wallbox energy counter and the
//! vehicle odometer. Both are plain `GET` requests returning JSON with a
//! single numeric value of interest.

pub mod energy;
pub mod http;
pub mod mileage;

pub use energy::{EnergySource, HttpEnergySource};
pub use http::{VendorEndpoint, extract_number, render_template};
pub use mileage::{HttpMileageSource, MileageSource};
