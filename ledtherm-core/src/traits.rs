//! Ports to hardware and storage
//!
//! The pipeline never touches a register or a file directly. Each external
//! capability is a trait here, and adapters for concrete devices implement
//! it:
//!
//! - [`AnalogInput`]: the ADC channel the LED is wired to
//! - [`ReferenceSensor`]: optional second thermometer (DHT22, ...)
//! - [`DisplayObserver`]: optional live status display (OLED, LCD, ...)
//! - [`StatusIndicator`]: LED that pulses at startup
//! - [`RecordSink`]: where finished cycle records are persisted
//!
//! Device families are chosen once at startup and injected into the
//! orchestrator, which never branches on device type inside the loop.

use crate::errors::{CapabilityResult, MonitorResult};
use crate::record::CycleRecord;

/// Single-channel analog input
///
/// Returns a raw sample in `[0, full_scale]`, where full scale corresponds to
/// the ADC reference supply voltage.
pub trait AnalogInput {
    /// Perform one conversion
    fn read_raw(&mut self) -> CapabilityResult<u16>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read_raw(&mut self) -> CapabilityResult<u16> {
        (**self).read_raw()
    }
}

/// Secondary temperature source used to cross-check the LED estimate
///
/// Implementations may block for a long time (a DHT22 needs ~2 s between
/// conversions). The orchestrator calls `measure` at most once per
/// sub-measurement.
pub trait ReferenceSensor {
    /// Take one temperature reading in °C
    fn measure(&mut self) -> CapabilityResult<f32>;
}

impl<T: ReferenceSensor + ?Sized> ReferenceSensor for &mut T {
    fn measure(&mut self) -> CapabilityResult<f32> {
        (**self).measure()
    }
}

/// Placeholder type for a monitor built without a reference sensor
///
/// Uninhabited: a `None::<NoReference>` can never be replaced by a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoReference {}

impl ReferenceSensor for NoReference {
    fn measure(&mut self) -> CapabilityResult<f32> {
        match *self {}
    }
}

/// Live progress snapshot handed to the display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressFrame {
    /// Sample index within the sub-measurement (0-based)
    pub sample_index: usize,
    /// Sub-measurement index within the cycle (0-based)
    pub sub_measurement_index: usize,
    /// Mean voltage of the samples taken so far (V)
    pub voltage: f32,
    /// Temperature estimate for that voltage (°C)
    pub led_temperature: f32,
    /// Running mean of this cycle's reference polls, if a sensor is configured
    pub reference_temperature: Option<f32>,
    /// True for the last frame of a sub-measurement
    pub is_final: bool,
}

/// Sink for measurement progress
///
/// All methods default to doing nothing, so a renderer implements only what
/// it can show. `on_progress` is called every ~100 ms while sampling and
/// must return well within that interval.
pub trait DisplayObserver {
    /// Show a greeting; called once at process start
    fn on_start(&mut self) -> CapabilityResult<()> {
        Ok(())
    }

    /// Show intermediate values while sampling
    fn on_progress(&mut self, _frame: &ProgressFrame) -> CapabilityResult<()> {
        Ok(())
    }

    /// Signal the idle period before the next sub-measurement
    fn on_sub_measurement_sleep(&mut self) -> CapabilityResult<()> {
        Ok(())
    }

    /// Show the averages of a completed cycle
    fn on_cycle_finish(&mut self, _record: &CycleRecord) -> CapabilityResult<()> {
        Ok(())
    }
}

impl<T: DisplayObserver + ?Sized> DisplayObserver for &mut T {
    fn on_start(&mut self) -> CapabilityResult<()> {
        (**self).on_start()
    }

    fn on_progress(&mut self, frame: &ProgressFrame) -> CapabilityResult<()> {
        (**self).on_progress(frame)
    }

    fn on_sub_measurement_sleep(&mut self) -> CapabilityResult<()> {
        (**self).on_sub_measurement_sleep()
    }

    fn on_cycle_finish(&mut self, record: &CycleRecord) -> CapabilityResult<()> {
        (**self).on_cycle_finish(record)
    }
}

/// An absent display is a valid configuration: every call is a no-op.
impl<T: DisplayObserver> DisplayObserver for Option<T> {
    fn on_start(&mut self) -> CapabilityResult<()> {
        match self {
            Some(display) => display.on_start(),
            None => Ok(()),
        }
    }

    fn on_progress(&mut self, frame: &ProgressFrame) -> CapabilityResult<()> {
        match self {
            Some(display) => display.on_progress(frame),
            None => Ok(()),
        }
    }

    fn on_sub_measurement_sleep(&mut self) -> CapabilityResult<()> {
        match self {
            Some(display) => display.on_sub_measurement_sleep(),
            None => Ok(()),
        }
    }

    fn on_cycle_finish(&mut self, record: &CycleRecord) -> CapabilityResult<()> {
        match self {
            Some(display) => display.on_cycle_finish(record),
            None => Ok(()),
        }
    }
}

/// Monitor built without a display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDisplay;

impl DisplayObserver for NoDisplay {}

/// Binary indicator (onboard LED) used to signal the start of measuring
pub trait StatusIndicator {
    /// Switch the indicator on or off
    fn set(&mut self, on: bool) -> CapabilityResult<()>;
}

impl<T: StatusIndicator + ?Sized> StatusIndicator for &mut T {
    fn set(&mut self, on: bool) -> CapabilityResult<()> {
        (**self).set(on)
    }
}

/// Monitor built without a status indicator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoIndicator;

impl StatusIndicator for NoIndicator {
    fn set(&mut self, _on: bool) -> CapabilityResult<()> {
        Ok(())
    }
}

/// Persistent store for cycle records
///
/// The sink owns the store's lifecycle: whether it exists, its header row and
/// where the next record goes.
pub trait RecordSink {
    /// Create the store with a header row if it does not exist yet
    ///
    /// Idempotent. An existing store is left untouched even if its header
    /// was written for a different reference configuration.
    fn ensure_store(&mut self, has_reference: bool) -> MonitorResult<()>;

    /// Append one record line
    fn append(&mut self, record: &CycleRecord) -> MonitorResult<()>;
}

impl<T: RecordSink + ?Sized> RecordSink for &mut T {
    fn ensure_store(&mut self, has_reference: bool) -> MonitorResult<()> {
        (**self).ensure_store(has_reference)
    }

    fn append(&mut self, record: &CycleRecord) -> MonitorResult<()> {
        (**self).append(record)
    }
}
