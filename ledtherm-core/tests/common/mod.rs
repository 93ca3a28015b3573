//! Shared test doubles for integration tests
//!
//! - `PatternInput`: ADC that replays a fixed cycle of raw values
//! - `ConstantReference`: reference sensor that always reads the same
//! - `RecordingDisplay`: display that logs every call it receives
//! - `CountingIndicator`: indicator that remembers its switch history

#![allow(dead_code)]

use ledtherm_core::{
    record::LocalTimestamp,
    time::FixedClock,
    traits::{AnalogInput, DisplayObserver, ProgressFrame, ReferenceSensor, StatusIndicator},
    CapabilityResult, CycleRecord,
};

/// Raw value whose mean over 200 reads puts the voltage at the
/// 1.7221454 V calibration point (34200.24 counts): 48 reads of 34201,
/// then 152 of 34200.
pub const CALIBRATION_PATTERN: [(u16, usize); 2] = [(34_201, 48), (34_200, 152)];

/// ADC replaying `(raw, repeat)` runs in a loop
pub struct PatternInput {
    pattern: Vec<u16>,
    position: usize,
    reads: usize,
}

impl PatternInput {
    pub fn new(runs: &[(u16, usize)]) -> Self {
        let pattern = runs
            .iter()
            .flat_map(|&(raw, repeat)| std::iter::repeat(raw).take(repeat))
            .collect();
        Self {
            pattern,
            position: 0,
            reads: 0,
        }
    }

    pub fn constant(raw: u16) -> Self {
        Self::new(&[(raw, 1)])
    }

    pub fn calibration_point() -> Self {
        Self::new(&CALIBRATION_PATTERN)
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl AnalogInput for PatternInput {
    fn read_raw(&mut self) -> CapabilityResult<u16> {
        let raw = self.pattern[self.position];
        self.position = (self.position + 1) % self.pattern.len();
        self.reads += 1;
        Ok(raw)
    }
}

/// Reference sensor with a fixed reading
pub struct ConstantReference {
    pub temperature: f32,
    pub polls: usize,
}

impl ConstantReference {
    pub fn new(temperature: f32) -> Self {
        Self {
            temperature,
            polls: 0,
        }
    }
}

impl ReferenceSensor for ConstantReference {
    fn measure(&mut self) -> CapabilityResult<f32> {
        self.polls += 1;
        Ok(self.temperature)
    }
}

/// Everything a display was told, in order
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    Start,
    Progress(ProgressFrame),
    Sleep,
    Finish(CycleRecord),
}

#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub calls: Vec<DisplayCall>,
}

impl RecordingDisplay {
    pub fn progress_frames(&self) -> Vec<ProgressFrame> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DisplayCall::Progress(frame) => Some(*frame),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: fn(&DisplayCall) -> bool) -> usize {
        self.calls.iter().filter(|call| wanted(call)).count()
    }
}

impl DisplayObserver for RecordingDisplay {
    fn on_start(&mut self) -> CapabilityResult<()> {
        self.calls.push(DisplayCall::Start);
        Ok(())
    }

    fn on_progress(&mut self, frame: &ProgressFrame) -> CapabilityResult<()> {
        self.calls.push(DisplayCall::Progress(*frame));
        Ok(())
    }

    fn on_sub_measurement_sleep(&mut self) -> CapabilityResult<()> {
        self.calls.push(DisplayCall::Sleep);
        Ok(())
    }

    fn on_cycle_finish(&mut self, record: &CycleRecord) -> CapabilityResult<()> {
        self.calls.push(DisplayCall::Finish(*record));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CountingIndicator {
    pub history: Vec<bool>,
}

impl StatusIndicator for CountingIndicator {
    fn set(&mut self, on: bool) -> CapabilityResult<()> {
        self.history.push(on);
        Ok(())
    }
}

pub const CYCLE_TIME: LocalTimestamp = LocalTimestamp::new(2024, 3, 1, 12, 0, 15);

pub fn fixed_clock() -> FixedClock {
    FixedClock::new(CYCLE_TIME)
}
