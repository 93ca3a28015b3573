//! Measurement cycle orchestration
//!
//! One cycle is three timed sub-measurements averaged into a single record:
//!
//! ```text
//!            ┌──────────────────────────────────────────────────────────┐
//!            ▼                                                          │
//! AwaitingSubMeasurement(i) ── sleep 5 s, poll reference ──┐            │
//!                                                          ▼            │
//!                             Sampling(i, j) ── 200 reads, 10 ms apart  │
//!                                                          │            │
//!                             SubMeasurementComplete(i) ◄──┘            │
//!                                   │ i < 2: next i                     │
//!                                   ▼ i = 2                             │
//!                             CycleComplete ── finish display, append ──┘
//! ```
//!
//! The loop has no terminal state; it ends when the process is stopped or a
//! capability fails. All side effects are synchronous and blocking, in the
//! order above, so a record is either fully persisted or never written.
//!
//! ## Collaborators
//!
//! - Reference sensor: `Option<R>`. Absent means no polls and no reference
//!   column, never a zero folded into the averages.
//! - Display: any [`DisplayObserver`]; [`NoDisplay`] or `None` for no display.
//! - Indicator: pulsed once by [`MeasurementCycle::start`].

use core::convert::Infallible;

use crate::calibration::TemperatureConverter;
use crate::config::MonitorConfig;
use crate::constants::{SAMPLES_PER_SUB_MEASUREMENT, SUB_MEASUREMENTS_PER_CYCLE};
use crate::errors::{MonitorError, MonitorResult};
use crate::record::{CycleRecord, LocalTimestamp, SubMeasurement};
use crate::sampler::VoltageSampler;
use crate::time::{Clock, Scheduler};
use crate::traits::{
    AnalogInput, DisplayObserver, NoDisplay, NoIndicator, NoReference, ProgressFrame,
    RecordSink, ReferenceSensor, StatusIndicator,
};

/// Where the orchestrator is within the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Sleeping before sub-measurement `index`, then polling the reference
    AwaitingSubMeasurement {
        /// Sub-measurement index (0-based)
        index: usize,
    },
    /// Accumulating ADC samples
    Sampling {
        /// Sub-measurement index (0-based)
        sub_measurement: usize,
        /// Last sample index reported to the display
        sample: usize,
    },
    /// Sub-measurement folded into the cycle sums
    SubMeasurementComplete {
        /// Sub-measurement index (0-based)
        index: usize,
    },
    /// Record produced and handed to display and store
    CycleComplete,
}

impl Default for CycleState {
    fn default() -> Self {
        Self::AwaitingSubMeasurement { index: 0 }
    }
}

/// Running sums of one cycle; dropped when the record is produced
#[derive(Debug, Clone, Copy)]
struct CycleTotals {
    led_temperature_sum: f32,
    led_voltage_sum: f32,
    reference_sum: Option<f32>,
}

impl CycleTotals {
    fn new(has_reference: bool) -> Self {
        Self {
            led_temperature_sum: 0.0,
            led_voltage_sum: 0.0,
            reference_sum: has_reference.then_some(0.0),
        }
    }

    fn add_reference(&mut self, reading: Option<f32>) {
        if let (Some(sum), Some(reading)) = (self.reference_sum.as_mut(), reading) {
            *sum += reading;
        }
    }

    /// Mean of the reference polls taken so far this cycle
    fn reference_mean(&self, polls: usize) -> Option<f32> {
        self.reference_sum.map(|sum| sum / polls as f32)
    }

    fn fold(&mut self, sub: &SubMeasurement) {
        self.led_temperature_sum += sub.led_temperature;
        self.led_voltage_sum += sub.voltage;
    }

    fn finish(self, timestamp: LocalTimestamp) -> CycleRecord {
        let n = SUB_MEASUREMENTS_PER_CYCLE as f32;
        CycleRecord {
            timestamp,
            led_temperature_avg: self.led_temperature_sum / n,
            led_voltage_avg: self.led_voltage_sum / n,
            reference_temperature_avg: self.reference_sum.map(|sum| sum / n),
        }
    }
}

/// The repeating measurement protocol
///
/// Built with [`MeasurementCycle::builder`]. Owns every collaborator; the
/// configuration is borrowed for the lifetime of the loop.
pub struct MeasurementCycle<'c, A, S, C, K, R = NoReference, D = NoDisplay, I = NoIndicator> {
    config: &'c MonitorConfig,
    converter: TemperatureConverter,
    sampler: VoltageSampler<A>,
    scheduler: S,
    clock: C,
    sink: K,
    reference: Option<R>,
    display: D,
    indicator: I,
    state: CycleState,
    cycles_completed: u64,
}

impl<'c> MeasurementCycle<'c, (), (), (), ()> {
    /// Start assembling a monitor for `config`
    pub fn builder(
        config: &'c MonitorConfig,
    ) -> CycleBuilder<'c, (), (), (), (), NoReference, NoDisplay, NoIndicator> {
        CycleBuilder::new(config)
    }
}

impl<'c, A, S, C, K, R, D, I> MeasurementCycle<'c, A, S, C, K, R, D, I>
where
    A: AnalogInput,
    S: Scheduler,
    C: Clock,
    K: RecordSink,
    R: ReferenceSensor,
    D: DisplayObserver,
    I: StatusIndicator,
{
    /// Configuration the loop runs with
    pub fn config(&self) -> &MonitorConfig {
        self.config
    }

    /// Current position in the cycle
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Cycles persisted since construction
    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// True when a reference sensor was supplied
    pub fn has_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// Record store
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Display observer
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Delay provider
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Prepare the store, greet on the display and pulse the indicator
    ///
    /// Called once before [`run`](Self::run).
    pub fn start(&mut self) -> MonitorResult<()> {
        self.display.on_start().map_err(MonitorError::Display)?;
        self.sink.ensure_store(self.has_reference())?;

        log_info!("Starting measuring.");
        self.indicator.set(true).map_err(MonitorError::Indicator)?;
        self.scheduler.sleep(self.config.cadence.startup_pulse());
        self.indicator.set(false).map_err(MonitorError::Indicator)?;
        Ok(())
    }

    /// Run cycles until a capability or the store fails
    pub fn run(&mut self) -> MonitorResult<Infallible> {
        loop {
            self.run_cycle()?;
        }
    }

    /// Run one full cycle and persist its record
    pub fn run_cycle(&mut self) -> MonitorResult<CycleRecord> {
        let mut totals = CycleTotals::new(self.has_reference());

        for index in 0..SUB_MEASUREMENTS_PER_CYCLE {
            let sub = self.measure_sub_measurement(index, &mut totals)?;
            totals.fold(&sub);
            self.state = CycleState::SubMeasurementComplete { index };
            log_debug!(
                "Sub-measurement {}/{}: {:.6} V, {:.2} °C",
                index + 1,
                SUB_MEASUREMENTS_PER_CYCLE,
                sub.voltage,
                sub.led_temperature
            );

            self.display
                .on_sub_measurement_sleep()
                .map_err(MonitorError::Display)?;
        }

        let record = totals.finish(self.clock.now());
        self.state = CycleState::CycleComplete;

        log_info!("{}", record.timestamp);
        log_info!("LED Voltage: {:.6}", record.led_voltage_avg);
        log_info!("LED Temperature: {:.2}°C", record.led_temperature_avg);
        if let Some(reference) = record.reference_temperature_avg {
            log_info!("Reference Temperature: {:.2}°C", reference);
        }

        self.display
            .on_cycle_finish(&record)
            .map_err(MonitorError::Display)?;
        self.sink.append(&record)?;
        self.cycles_completed += 1;

        Ok(record)
    }

    fn measure_sub_measurement(
        &mut self,
        index: usize,
        totals: &mut CycleTotals,
    ) -> MonitorResult<SubMeasurement> {
        self.state = CycleState::AwaitingSubMeasurement { index };
        self.scheduler.sleep(self.config.cadence.sub_measurement_delay());

        let reference_temperature = match self.reference.as_mut() {
            Some(sensor) => Some(sensor.measure().map_err(MonitorError::Reference)?),
            None => None,
        };
        totals.add_reference(reference_temperature);
        let running_reference = totals.reference_mean(index + 1);

        self.state = CycleState::Sampling {
            sub_measurement: index,
            sample: 0,
        };

        let converter = self.converter;
        let inter_sample_delay = self.config.cadence.inter_sample_delay();
        let display = &mut self.display;
        let state = &mut self.state;

        let voltage = self.sampler.sample_with_progress(
            &mut self.scheduler,
            SAMPLES_PER_SUB_MEASUREMENT,
            inter_sample_delay,
            |progress| {
                *state = CycleState::Sampling {
                    sub_measurement: index,
                    sample: progress.index,
                };
                // Instantaneous estimate, display only
                let frame = ProgressFrame {
                    sample_index: progress.index,
                    sub_measurement_index: index,
                    voltage: progress.voltage,
                    led_temperature: converter.estimate(progress.voltage),
                    reference_temperature: running_reference,
                    is_final: progress.is_final,
                };
                display.on_progress(&frame).map_err(MonitorError::Display)
            },
        )?;

        Ok(SubMeasurement {
            voltage,
            led_temperature: self.converter.estimate(voltage),
            reference_temperature,
        })
    }
}

/// Typestate builder for [`MeasurementCycle`]
///
/// `()` marks a required collaborator that has not been supplied yet;
/// [`build`](CycleBuilder::build) only exists once all four are set.
pub struct CycleBuilder<'c, A, S, C, K, R, D, I> {
    config: &'c MonitorConfig,
    analog: A,
    scheduler: S,
    clock: C,
    sink: K,
    reference: Option<R>,
    display: D,
    indicator: I,
}

impl<'c> CycleBuilder<'c, (), (), (), (), NoReference, NoDisplay, NoIndicator> {
    /// Empty builder
    pub fn new(config: &'c MonitorConfig) -> Self {
        Self {
            config,
            analog: (),
            scheduler: (),
            clock: (),
            sink: (),
            reference: None,
            display: NoDisplay,
            indicator: NoIndicator,
        }
    }
}

impl<'c, A, S, C, K, R, D, I> CycleBuilder<'c, A, S, C, K, R, D, I> {
    /// ADC channel the LED is wired to
    pub fn analog<A2: AnalogInput>(self, analog: A2) -> CycleBuilder<'c, A2, S, C, K, R, D, I> {
        CycleBuilder {
            config: self.config,
            analog,
            scheduler: self.scheduler,
            clock: self.clock,
            sink: self.sink,
            reference: self.reference,
            display: self.display,
            indicator: self.indicator,
        }
    }

    /// Delay provider for the cadence
    pub fn scheduler<S2: Scheduler>(self, scheduler: S2) -> CycleBuilder<'c, A, S2, C, K, R, D, I> {
        CycleBuilder {
            config: self.config,
            analog: self.analog,
            scheduler,
            clock: self.clock,
            sink: self.sink,
            reference: self.reference,
            display: self.display,
            indicator: self.indicator,
        }
    }

    /// Wall clock for record timestamps
    pub fn clock<C2: Clock>(self, clock: C2) -> CycleBuilder<'c, A, S, C2, K, R, D, I> {
        CycleBuilder {
            config: self.config,
            analog: self.analog,
            scheduler: self.scheduler,
            clock,
            sink: self.sink,
            reference: self.reference,
            display: self.display,
            indicator: self.indicator,
        }
    }

    /// Store for finished records
    pub fn sink<K2: RecordSink>(self, sink: K2) -> CycleBuilder<'c, A, S, C, K2, R, D, I> {
        CycleBuilder {
            config: self.config,
            analog: self.analog,
            scheduler: self.scheduler,
            clock: self.clock,
            sink,
            reference: self.reference,
            display: self.display,
            indicator: self.indicator,
        }
    }

    /// Attach a reference sensor
    pub fn reference<R2: ReferenceSensor>(self, sensor: R2) -> CycleBuilder<'c, A, S, C, K, R2, D, I> {
        self.optional_reference(Some(sensor))
    }

    /// Attach a reference sensor chosen at startup, possibly none
    pub fn optional_reference<R2: ReferenceSensor>(
        self,
        sensor: Option<R2>,
    ) -> CycleBuilder<'c, A, S, C, K, R2, D, I> {
        CycleBuilder {
            config: self.config,
            analog: self.analog,
            scheduler: self.scheduler,
            clock: self.clock,
            sink: self.sink,
            reference: sensor,
            display: self.display,
            indicator: self.indicator,
        }
    }

    /// Attach a display (`Option<T>` works for a display chosen at startup)
    pub fn display<D2: DisplayObserver>(self, display: D2) -> CycleBuilder<'c, A, S, C, K, R, D2, I> {
        CycleBuilder {
            config: self.config,
            analog: self.analog,
            scheduler: self.scheduler,
            clock: self.clock,
            sink: self.sink,
            reference: self.reference,
            display,
            indicator: self.indicator,
        }
    }

    /// Attach the startup indicator
    pub fn indicator<I2: StatusIndicator>(self, indicator: I2) -> CycleBuilder<'c, A, S, C, K, R, D, I2> {
        CycleBuilder {
            config: self.config,
            analog: self.analog,
            scheduler: self.scheduler,
            clock: self.clock,
            sink: self.sink,
            reference: self.reference,
            display: self.display,
            indicator,
        }
    }
}

impl<'c, A, S, C, K, R, D, I> CycleBuilder<'c, A, S, C, K, R, D, I>
where
    A: AnalogInput,
    S: Scheduler,
    C: Clock,
    K: RecordSink,
    R: ReferenceSensor,
    D: DisplayObserver,
    I: StatusIndicator,
{
    /// Validate the configuration and assemble the monitor
    pub fn build(self) -> MonitorResult<MeasurementCycle<'c, A, S, C, K, R, D, I>> {
        self.config.validate()?;
        let converter = TemperatureConverter::new(self.config.calibration)?;
        let sampler = VoltageSampler::new(
            self.analog,
            self.config.adc,
            self.config.cadence.update_interval,
        )?;

        Ok(MeasurementCycle {
            config: self.config,
            converter,
            sampler,
            scheduler: self.scheduler,
            clock: self.clock,
            sink: self.sink,
            reference: self.reference,
            display: self.display,
            indicator: self.indicator,
            state: CycleState::default(),
            cycles_completed: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalibrationProfile;
    use crate::errors::{CapabilityError, CapabilityResult};
    use crate::logger::MemoryLogStore;
    use crate::time::{FixedClock, VirtualScheduler};
    use core::time::Duration;

    struct ConstantInput(u16);

    impl AnalogInput for ConstantInput {
        fn read_raw(&mut self) -> CapabilityResult<u16> {
            Ok(self.0)
        }
    }

    struct FlakyReference {
        polls: usize,
    }

    impl ReferenceSensor for FlakyReference {
        fn measure(&mut self) -> CapabilityResult<f32> {
            self.polls += 1;
            if self.polls > 2 {
                Err(CapabilityError::Timeout)
            } else {
                Ok(21.0)
            }
        }
    }

    fn clock() -> FixedClock {
        FixedClock::new(LocalTimestamp::new(2024, 3, 1, 12, 0, 15))
    }

    #[test]
    fn totals_average_three_sub_measurements() {
        let mut totals = CycleTotals::new(true);
        for (voltage, temp, reference) in [(1.70, 30.0, 20.0), (1.71, 27.0, 21.0), (1.72, 24.0, 22.0)] {
            totals.add_reference(Some(reference));
            totals.fold(&SubMeasurement {
                voltage,
                led_temperature: temp,
                reference_temperature: Some(reference),
            });
        }

        let record = totals.finish(LocalTimestamp::default());
        assert!((record.led_temperature_avg - 27.0).abs() < 1e-4);
        assert!((record.led_voltage_avg - 1.71).abs() < 1e-6);
        assert!((record.reference_temperature_avg.unwrap() - 21.0).abs() < 1e-4);
    }

    #[test]
    fn totals_without_reference_have_no_reference_mean() {
        let mut totals = CycleTotals::new(false);
        totals.add_reference(Some(99.0));
        assert_eq!(totals.reference_mean(1), None);
        assert_eq!(totals.finish(LocalTimestamp::default()).reference_temperature_avg, None);
    }

    #[test]
    fn build_rejects_invalid_calibration() {
        let config = MonitorConfig::with_calibration(CalibrationProfile {
            voltage_temperature_coefficient_v_per_c: 0.0,
            ..CalibrationProfile::default()
        });

        let result = MeasurementCycle::builder(&config)
            .analog(ConstantInput(34_200))
            .scheduler(VirtualScheduler::new())
            .clock(clock())
            .sink(MemoryLogStore::new())
            .build();
        assert!(matches!(result, Err(MonitorError::InvalidConfig { .. })));
    }

    #[test]
    fn one_cycle_takes_fifteen_seconds_of_delays_plus_sampling() {
        let config = MonitorConfig::default();
        let mut monitor = MeasurementCycle::builder(&config)
            .analog(ConstantInput(34_200))
            .scheduler(VirtualScheduler::new())
            .clock(clock())
            .sink(MemoryLogStore::new())
            .build()
            .unwrap();

        monitor.run_cycle().unwrap();

        // 3 × (5 s + 200 × 10 ms)
        assert_eq!(monitor.scheduler().elapsed(), Duration::from_secs(21));
        assert_eq!(monitor.scheduler().sleeps(), 3 * 201);
        assert_eq!(monitor.state(), CycleState::CycleComplete);
        assert_eq!(monitor.cycles_completed(), 1);
    }

    #[test]
    fn reference_failure_stops_cycle_without_record() {
        let config = MonitorConfig::default();
        let mut monitor = MeasurementCycle::builder(&config)
            .analog(ConstantInput(34_200))
            .scheduler(VirtualScheduler::new())
            .clock(clock())
            .sink(MemoryLogStore::new())
            .reference(FlakyReference { polls: 0 })
            .build()
            .unwrap();

        monitor.start().unwrap();
        let result = monitor.run_cycle();

        assert!(matches!(result, Err(MonitorError::Reference(CapabilityError::Timeout))));
        assert_eq!(monitor.state(), CycleState::AwaitingSubMeasurement { index: 2 });
        assert_eq!(monitor.sink().records_written(), 0);
        assert_eq!(monitor.cycles_completed(), 0);
    }

    #[test]
    fn run_returns_first_error() {
        let config = MonitorConfig::default();
        let mut monitor = MeasurementCycle::builder(&config)
            .analog(ConstantInput(34_200))
            .scheduler(VirtualScheduler::new())
            .clock(clock())
            .sink(MemoryLogStore::new())
            .reference(FlakyReference { polls: 0 })
            .build()
            .unwrap();

        let result = monitor.run();
        assert!(matches!(result, Err(MonitorError::Reference(_))));
    }
}
