//! Startup configuration
//!
//! Built once before the measurement loop and passed by reference to every
//! component that needs it. Nothing here changes while the loop runs.
//!
//! Deserialized configs skip the constructors, so [`MonitorConfig::validate`]
//! is the single gate: the orchestrator calls it and refuses to start on a
//! bad value.

use core::time::Duration;

use crate::constants::{
    ADC_FULL_SCALE, DEFAULT_CALIBRATION_TEMPERATURE_C, DEFAULT_CALIBRATION_VOLTAGE_V,
    DEFAULT_INTER_SAMPLE_DELAY_MS, DEFAULT_REFERENCE_SUPPLY_V, DEFAULT_STARTUP_PULSE_MS,
    DEFAULT_SUB_MEASUREMENT_DELAY_MS, DEFAULT_UPDATE_INTERVAL,
    DEFAULT_VOLTAGE_COEFFICIENT_V_PER_C,
};
use crate::errors::{MonitorError, MonitorResult};

/// Smallest voltage separation accepted by [`CalibrationProfile::from_two_points`] (V)
const MIN_CALIBRATION_SPAN_V: f32 = 1e-6;

/// Linear voltage-to-temperature calibration around one operating point
///
/// `temperature = reference_temperature_c
///     + (voltage - reference_voltage_v) / voltage_temperature_coefficient_v_per_c`
///
/// The line only approximates the diode curve near the calibration point;
/// error grows with distance from `reference_temperature_c`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationProfile {
    /// Temperature at which the LED was calibrated (°C)
    pub reference_temperature_c: f32,
    /// Forward voltage measured at the calibration temperature (V)
    pub reference_voltage_v: f32,
    /// Slope of forward voltage against temperature (V/°C), never zero
    pub voltage_temperature_coefficient_v_per_c: f32,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            reference_temperature_c: DEFAULT_CALIBRATION_TEMPERATURE_C,
            reference_voltage_v: DEFAULT_CALIBRATION_VOLTAGE_V,
            voltage_temperature_coefficient_v_per_c: DEFAULT_VOLTAGE_COEFFICIENT_V_PER_C,
        }
    }
}

impl CalibrationProfile {
    /// Create a checked calibration profile
    pub fn new(
        reference_temperature_c: f32,
        reference_voltage_v: f32,
        voltage_temperature_coefficient_v_per_c: f32,
    ) -> MonitorResult<Self> {
        let profile = Self {
            reference_temperature_c,
            reference_voltage_v,
            voltage_temperature_coefficient_v_per_c,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Fit a profile through two measured (voltage, temperature) points
    ///
    /// The first point becomes the calibration point.
    pub fn from_two_points(
        voltage1_v: f32,
        temperature1_c: f32,
        voltage2_v: f32,
        temperature2_c: f32,
    ) -> MonitorResult<Self> {
        if libm::fabsf(temperature2_c - temperature1_c) < f32::EPSILON {
            return Err(MonitorError::InvalidConfig {
                reason: "calibration points share a temperature",
            });
        }
        if libm::fabsf(voltage2_v - voltage1_v) < MIN_CALIBRATION_SPAN_V {
            return Err(MonitorError::InvalidConfig {
                reason: "calibration points share a voltage",
            });
        }

        let coefficient = (voltage2_v - voltage1_v) / (temperature2_c - temperature1_c);
        Self::new(temperature1_c, voltage1_v, coefficient)
    }

    /// Check the invariants the converter relies on
    pub fn validate(&self) -> MonitorResult<()> {
        if !self.reference_temperature_c.is_finite() || !self.reference_voltage_v.is_finite() {
            return Err(MonitorError::InvalidConfig {
                reason: "calibration point is not a finite number",
            });
        }
        if !self.voltage_temperature_coefficient_v_per_c.is_finite() {
            return Err(MonitorError::InvalidConfig {
                reason: "voltage coefficient is not a finite number",
            });
        }
        if self.voltage_temperature_coefficient_v_per_c == 0.0 {
            return Err(MonitorError::InvalidConfig {
                reason: "voltage coefficient is zero",
            });
        }
        Ok(())
    }
}

/// Analog-to-digital converter scaling
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdcConfig {
    /// Raw value corresponding to the supply voltage
    pub full_scale: u16,
    /// Voltage at full scale (V)
    pub reference_supply_voltage: f32,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            full_scale: ADC_FULL_SCALE,
            reference_supply_voltage: DEFAULT_REFERENCE_SUPPLY_V,
        }
    }
}

impl AdcConfig {
    /// Voltage of the mean of `count` accumulated raw samples
    ///
    /// `count` must be non-zero; the sampler checks it before accumulating.
    #[inline]
    pub fn mean_voltage(&self, raw_sum: u64, count: usize) -> f32 {
        let mean_raw = raw_sum as f32 / count as f32;
        mean_raw / f32::from(self.full_scale) * self.reference_supply_voltage
    }

    /// Clamp a raw reading into the converter's range
    #[inline]
    pub fn clamp_raw(&self, raw: u16) -> u16 {
        raw.min(self.full_scale)
    }

    /// Check scaling values
    pub fn validate(&self) -> MonitorResult<()> {
        if self.full_scale == 0 {
            return Err(MonitorError::InvalidConfig {
                reason: "ADC full scale is zero",
            });
        }
        if !self.reference_supply_voltage.is_finite() || self.reference_supply_voltage <= 0.0 {
            return Err(MonitorError::InvalidConfig {
                reason: "ADC supply voltage must be positive",
            });
        }
        Ok(())
    }
}

/// Timing of the measurement loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cadence {
    /// Idle time before each sub-measurement (ms)
    pub sub_measurement_delay_ms: u32,
    /// Delay between raw ADC reads (ms)
    pub inter_sample_delay_ms: u32,
    /// Report progress on every Nth sample
    pub update_interval: usize,
    /// Startup indicator pulse length (ms)
    pub startup_pulse_ms: u32,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            sub_measurement_delay_ms: DEFAULT_SUB_MEASUREMENT_DELAY_MS,
            inter_sample_delay_ms: DEFAULT_INTER_SAMPLE_DELAY_MS,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            startup_pulse_ms: DEFAULT_STARTUP_PULSE_MS,
        }
    }
}

impl Cadence {
    /// Idle time before each sub-measurement
    pub fn sub_measurement_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.sub_measurement_delay_ms))
    }

    /// Delay between raw ADC reads
    pub fn inter_sample_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.inter_sample_delay_ms))
    }

    /// Startup indicator pulse length
    pub fn startup_pulse(&self) -> Duration {
        Duration::from_millis(u64::from(self.startup_pulse_ms))
    }

    /// Check timing values
    pub fn validate(&self) -> MonitorResult<()> {
        if self.update_interval == 0 {
            return Err(MonitorError::InvalidConfig {
                reason: "update interval must be at least 1",
            });
        }
        Ok(())
    }
}

/// Display families with a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplayKind {
    /// SH1106 128x64 monochrome OLED
    #[default]
    Sh1106,
    /// HD44780-style character LCD behind an I2C backpack
    Lcd,
    /// No display attached
    None,
}

/// Reference temperature sensor families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferenceKind {
    /// DHT22 / AM2302 one-wire sensor
    #[default]
    Dht22,
    /// Sensirion SHT30 (selectable, but no driver support)
    Sht30,
    /// No reference sensor attached
    None,
}

impl ReferenceKind {
    /// True when a reference sensor is expected to be present
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Which optional peripherals are wired up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceSelection {
    /// Display family
    pub display: DisplayKind,
    /// Reference sensor family
    pub reference: ReferenceKind,
}

/// Complete configuration of one LED thermometer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorConfig {
    /// Voltage-to-temperature calibration
    pub calibration: CalibrationProfile,
    /// ADC scaling
    pub adc: AdcConfig,
    /// Loop timing
    pub cadence: Cadence,
    /// Attached peripherals
    pub devices: DeviceSelection,
}

impl MonitorConfig {
    /// Configuration with a custom calibration and default hardware
    pub fn with_calibration(calibration: CalibrationProfile) -> Self {
        Self {
            calibration,
            ..Self::default()
        }
    }

    /// Check every section
    pub fn validate(&self) -> MonitorResult<()> {
        self.calibration.validate()?;
        self.adc.validate()?;
        self.cadence.validate()?;
        Ok(())
    }
}
