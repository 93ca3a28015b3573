//! Measurement pipeline for LED-based temperature sensing
//!
//! An LED's forward voltage drops roughly linearly as its junction warms.
//! This crate samples that voltage through an ADC, converts it to a
//! temperature with a linear calibration, optionally cross-checks against a
//! reference sensor, feeds live progress to a display and appends one
//! averaged record per cycle to a CSV log.
//!
//! Key constraints:
//! - Runs on a microcontroller with kilobytes of RAM (RP2040/RP2350 class)
//! - No per-sample history is retained, only running sums
//! - Hardware is reached only through the ports in [`traits`]
//!
//! ```no_run
//! use ledtherm_core::{
//!     config::MonitorConfig,
//!     cycle::MeasurementCycle,
//!     logger::CsvLogStore,
//!     time::{SystemClock, ThreadScheduler},
//!     traits::AnalogInput,
//!     CapabilityResult,
//! };
//!
//! struct LedPin;
//!
//! impl AnalogInput for LedPin {
//!     fn read_raw(&mut self) -> CapabilityResult<u16> {
//!         Ok(34_200) // read_u16() on the ADC channel the LED is wired to
//!     }
//! }
//!
//! # fn main() -> ledtherm_core::MonitorResult<()> {
//! let config = MonitorConfig::default();
//! let mut monitor = MeasurementCycle::builder(&config)
//!     .analog(LedPin)
//!     .scheduler(ThreadScheduler)
//!     .clock(SystemClock)
//!     .sink(CsvLogStore::default())
//!     .build()?;
//!
//! monitor.start()?;
//! monitor.run()?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod calibration;
pub mod config;
pub mod constants;
pub mod cycle;
pub mod errors;
pub mod logger;
pub mod record;
pub mod sampler;
pub mod time;
pub mod traits;

// Public API
pub use calibration::TemperatureConverter;
pub use config::{CalibrationProfile, MonitorConfig};
pub use cycle::{CycleState, MeasurementCycle};
pub use errors::{CapabilityError, CapabilityResult, MonitorError, MonitorResult};
pub use record::{CycleRecord, LocalTimestamp, SubMeasurement};
pub use sampler::{SampleProgress, VoltageSampler};
pub use traits::{AnalogInput, DisplayObserver, ProgressFrame, RecordSink, ReferenceSensor};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
