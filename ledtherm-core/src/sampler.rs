//! Averaged voltage acquisition
//!
//! A single ADC conversion of an LED's forward voltage is noisy at the
//! millivolt level, and a millivolt is half a degree. The sampler takes many
//! evenly spaced conversions and reports the voltage of their mean.
//!
//! Only the running sum is kept. A `u64` sum cannot overflow for any sample
//! count that fits in memory-constrained loops (2^48 samples at full scale).
//!
//! ## Progress reporting
//!
//! While accumulating, the progress callback fires on every sample whose
//! index is a multiple of `update_interval` (index 0 included), carrying the
//! mean voltage so far. After the last sample it fires once more,
//! unconditionally, with `index = count - 1` and `is_final = true`. For
//! `count` samples that is `(count - 1) / update_interval + 1` intermediate
//! calls plus one final call.

use core::time::Duration;

use crate::config::AdcConfig;
use crate::errors::{MonitorError, MonitorResult};
use crate::time::Scheduler;
use crate::traits::AnalogInput;

/// Partial result reported during accumulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleProgress {
    /// Index of the sample just taken (0-based)
    pub index: usize,
    /// Mean voltage of samples `0..=index` (V)
    pub voltage: f32,
    /// True for the closing callback after the last sample
    pub is_final: bool,
}

/// Drives repeated ADC reads and averages them into a voltage
#[derive(Debug)]
pub struct VoltageSampler<A> {
    input: A,
    adc: AdcConfig,
    update_interval: usize,
}

impl<A: AnalogInput> VoltageSampler<A> {
    /// Wrap an analog input
    ///
    /// `update_interval` of zero is rejected: progress would never be
    /// reported on a modulus of zero.
    pub fn new(input: A, adc: AdcConfig, update_interval: usize) -> MonitorResult<Self> {
        adc.validate()?;
        if update_interval == 0 {
            return Err(MonitorError::InvalidConfig {
                reason: "update interval must be at least 1",
            });
        }
        Ok(Self {
            input,
            adc,
            update_interval,
        })
    }

    /// ADC scaling in use
    pub fn adc(&self) -> &AdcConfig {
        &self.adc
    }

    /// Progress reporting interval in samples
    pub fn update_interval(&self) -> usize {
        self.update_interval
    }

    /// Give back the analog input
    pub fn into_inner(self) -> A {
        self.input
    }

    /// Sample without progress reporting
    pub fn sample<S: Scheduler>(
        &mut self,
        scheduler: &mut S,
        count: usize,
        inter_sample_delay: Duration,
    ) -> MonitorResult<f32> {
        self.sample_with_progress(scheduler, count, inter_sample_delay, |_| Ok(()))
    }

    /// Take `count` samples `inter_sample_delay` apart and return the mean voltage
    ///
    /// Each read is preceded by the delay. Raw values above full scale are
    /// clamped. Errors from the input or from `on_progress` abort the window.
    pub fn sample_with_progress<S, F>(
        &mut self,
        scheduler: &mut S,
        count: usize,
        inter_sample_delay: Duration,
        mut on_progress: F,
    ) -> MonitorResult<f32>
    where
        S: Scheduler,
        F: FnMut(SampleProgress) -> MonitorResult<()>,
    {
        if count == 0 {
            return Err(MonitorError::EmptySampleWindow);
        }

        let mut raw_sum: u64 = 0;
        for index in 0..count {
            scheduler.sleep(inter_sample_delay);
            let raw = self.input.read_raw().map_err(MonitorError::Analog)?;
            raw_sum += u64::from(self.adc.clamp_raw(raw));

            if index % self.update_interval == 0 {
                on_progress(SampleProgress {
                    index,
                    voltage: self.adc.mean_voltage(raw_sum, index + 1),
                    is_final: false,
                })?;
            }
        }

        let voltage = self.adc.mean_voltage(raw_sum, count);
        log_trace!("Sampled {} conversions, mean {:.6} V", count, voltage);

        on_progress(SampleProgress {
            index: count - 1,
            voltage,
            is_final: true,
        })?;

        Ok(voltage)
    }
}
