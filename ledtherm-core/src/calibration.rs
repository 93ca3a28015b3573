//! Voltage to temperature conversion
//!
//! An LED's forward voltage falls by roughly 2 mV for every degree its
//! junction warms. Around a calibration point the curve is close enough to a
//! straight line:
//!
//! ```text
//! T = T_cal + (V - V_cal) / k
//!
//! T_cal  calibration temperature (°C)
//! V_cal  forward voltage at T_cal (V)
//! k      slope, negative for diodes (V/°C)
//! ```
//!
//! The line is a local approximation. Readings far from `T_cal` drift from
//! the true junction temperature, which is a limit of the model rather than
//! a measurement fault.

use crate::config::CalibrationProfile;
use crate::errors::MonitorResult;

/// Estimate temperature (°C) from a forward voltage (V)
///
/// Pure arithmetic. The profile must have a non-zero coefficient, which
/// [`CalibrationProfile::validate`] guarantees for any profile that reached
/// the pipeline.
#[inline]
pub fn estimate(voltage: f32, profile: &CalibrationProfile) -> f32 {
    profile.reference_temperature_c
        + (voltage - profile.reference_voltage_v) / profile.voltage_temperature_coefficient_v_per_c
}

/// Converter bound to one validated calibration profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureConverter {
    profile: CalibrationProfile,
}

impl TemperatureConverter {
    /// Bind a converter to a profile, rejecting unusable profiles
    pub fn new(profile: CalibrationProfile) -> MonitorResult<Self> {
        profile.validate()?;
        Ok(Self { profile })
    }

    /// Calibration this converter applies
    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    /// Temperature (°C) for a forward voltage (V)
    #[inline]
    pub fn estimate(&self, voltage: f32) -> f32 {
        estimate(voltage, &self.profile)
    }

    /// Forward voltage (V) the model expects at a temperature (°C)
    #[inline]
    pub fn voltage_at(&self, temperature_c: f32) -> f32 {
        self.profile.reference_voltage_v
            + (temperature_c - self.profile.reference_temperature_c)
                * self.profile.voltage_temperature_coefficient_v_per_c
    }
}

impl Default for TemperatureConverter {
    fn default() -> Self {
        Self {
            profile: CalibrationProfile::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn calibration_voltage_maps_to_calibration_temperature() {
        let converter = TemperatureConverter::default();
        let profile = *converter.profile();
        assert_eq!(converter.estimate(profile.reference_voltage_v), profile.reference_temperature_c);
    }

    #[test]
    fn lower_voltage_means_warmer() {
        let converter = TemperatureConverter::default();
        // 18.56 mV below the calibration voltage is about 10 °C warmer
        let temp = converter.estimate(1.7221454 - 0.0185618);
        assert!((temp - 34.60).abs() < 0.01);
    }

    #[test]
    fn inverse_mapping() {
        let converter = TemperatureConverter::default();
        let voltage = converter.voltage_at(30.0);
        assert!((converter.estimate(voltage) - 30.0).abs() < 0.01);
    }

    #[test]
    fn invalid_profile_rejected() {
        let profile = CalibrationProfile {
            voltage_temperature_coefficient_v_per_c: 0.0,
            ..CalibrationProfile::default()
        };
        assert!(TemperatureConverter::new(profile).is_err());
    }

    proptest! {
        #[test]
        fn estimate_is_affine(
            v1 in 0.0f32..3.3,
            v2 in 0.0f32..3.3,
            coefficient in prop_oneof![-0.005f32..-0.0005, 0.0005f32..0.005],
        ) {
            let profile = CalibrationProfile {
                reference_temperature_c: 25.0,
                reference_voltage_v: 1.7,
                voltage_temperature_coefficient_v_per_c: coefficient,
            };

            // Slope between any two points equals 1/k
            let t1 = estimate(v1, &profile) as f64;
            let t2 = estimate(v2, &profile) as f64;
            let expected = (v2 as f64 - v1 as f64) / coefficient as f64;
            let tolerance = 1e-3 * (1.0 + expected.abs());
            prop_assert!(((t2 - t1) - expected).abs() <= tolerance);

            // Deterministic
            prop_assert_eq!(estimate(v1, &profile), estimate(v1, &profile));
        }
    }
}
