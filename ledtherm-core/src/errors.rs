//! Error types for configuration, capability and storage failures
//!
//! ## Error Categories
//!
//! ### Configuration errors
//! - `InvalidConfig`: calibration or ADC constants that cannot work
//!   (zero coefficient, non-finite values, zero full-scale)
//! - `UnsupportedDevice` / `MissingDevice`: device selection that cannot be
//!   satisfied at startup
//! - `EmptySampleWindow`: a sampler asked for zero samples
//!
//! These are raised before the measurement loop starts.
//!
//! ### Capability errors
//! Every port returns a [`CapabilityError`]. The pipeline wraps it in the
//! `MonitorError` variant naming the port that failed and propagates it.
//! There is no retry: the loop stops and the caller decides what to do.
//!
//! ### Storage errors
//! Store creation and append failures propagate the same way. A cycle either
//! persists a full record or none at all.

use thiserror_no_std::Error;

/// Result type for capability ports
pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Result type for pipeline operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Failure reported by a hardware capability (ADC, sensor, display, LED)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityError {
    /// Failed to read from the device
    #[error("read failed")]
    ReadFailed,
    /// Device not initialized
    #[error("device not initialized")]
    NotInitialized,
    /// Device did not answer in time
    #[error("timeout")]
    Timeout,
    /// Bus-level failure (I2C, one-wire)
    #[error("bus error")]
    Bus,
    /// Device answered with data that failed its checks
    #[error("invalid data")]
    InvalidData,
}

/// Errors raised by the measurement pipeline
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Configuration values that cannot produce a measurement
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration
        reason: &'static str,
    },

    /// Selected device family has no driver support
    #[error("Unsupported device: {device}")]
    UnsupportedDevice {
        /// Device family name
        device: &'static str,
    },

    /// Selected device family but no handle was supplied for it
    #[error("No handle supplied for selected device: {device}")]
    MissingDevice {
        /// Device family name
        device: &'static str,
    },

    /// Sampler asked for zero samples
    #[error("Sample count must be at least 1")]
    EmptySampleWindow,

    /// Analog input read failed
    #[error("Analog input failed: {0}")]
    Analog(CapabilityError),

    /// Reference sensor measurement failed
    #[error("Reference sensor failed: {0}")]
    Reference(CapabilityError),

    /// Display update failed
    #[error("Display failed: {0}")]
    Display(CapabilityError),

    /// Status indicator failed
    #[error("Status indicator failed: {0}")]
    Indicator(CapabilityError),

    /// Record store rejected a write
    #[error("Storage failed: {reason}")]
    Storage {
        /// What the store could not do
        reason: &'static str,
    },

    /// I/O error from a file-backed store
    #[cfg(feature = "std")]
    #[error("Log store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MonitorError {
    /// True for errors raised while checking configuration at startup
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::UnsupportedDevice { .. }
                | Self::MissingDevice { .. }
                | Self::EmptySampleWindow
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CapabilityError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ReadFailed => defmt::write!(fmt, "read failed"),
            Self::NotInitialized => defmt::write!(fmt, "not initialized"),
            Self::Timeout => defmt::write!(fmt, "timeout"),
            Self::Bus => defmt::write!(fmt, "bus error"),
            Self::InvalidData => defmt::write!(fmt, "invalid data"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MonitorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidConfig { reason } => defmt::write!(fmt, "Invalid config: {}", reason),
            Self::UnsupportedDevice { device } => defmt::write!(fmt, "Unsupported device: {}", device),
            Self::MissingDevice { device } => defmt::write!(fmt, "Missing device: {}", device),
            Self::EmptySampleWindow => defmt::write!(fmt, "Empty sample window"),
            Self::Analog(e) => defmt::write!(fmt, "Analog: {}", e),
            Self::Reference(e) => defmt::write!(fmt, "Reference: {}", e),
            Self::Display(e) => defmt::write!(fmt, "Display: {}", e),
            Self::Indicator(e) => defmt::write!(fmt, "Indicator: {}", e),
            Self::Storage { reason } => defmt::write!(fmt, "Storage: {}", reason),
            #[cfg(feature = "std")]
            Self::Io(_) => defmt::write!(fmt, "Log store I/O error"),
        }
    }
}
