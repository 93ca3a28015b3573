//! Measurement records
//!
//! A cycle produces three [`SubMeasurement`]s, folds them into running sums
//! and emits one [`CycleRecord`]. Records are persisted immediately and
//! dropped; nothing is kept across cycles.
//!
//! ## Log line format
//!
//! ```text
//! \n01.03.2024 12:00:15,24.60,1.722145,22.00
//!   └ timestamp        └ °C  └ V      └ reference °C (only with a reference sensor)
//! ```
//!
//! Each line starts with the newline, so the header row written at store
//! creation has no trailing newline and the file never ends with an empty
//! line.

use core::fmt::{self, Write};

/// Longest line `to_csv_line` has to hold
pub const MAX_CSV_LINE_LEN: usize = 96;

/// Local calendar time with one-second resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LocalTimestamp {
    /// Calendar year
    pub year: u16,
    /// Month, 1-12
    pub month: u8,
    /// Day of month, 1-31
    pub day: u8,
    /// Hour, 0-23
    pub hour: u8,
    /// Minute, 0-59
    pub minute: u8,
    /// Second, 0-59
    pub second: u8,
}

impl LocalTimestamp {
    /// Build a timestamp from its calendar fields
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

/// `DD.MM.YYYY HH:MM:SS`
impl fmt::Display for LocalTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}.{:02}.{:04} {:02}:{:02}:{:02}",
            self.day, self.month, self.year, self.hour, self.minute, self.second
        )
    }
}

#[cfg(feature = "chrono")]
impl From<chrono::NaiveDateTime> for LocalTimestamp {
    fn from(datetime: chrono::NaiveDateTime) -> Self {
        use chrono::{Datelike, Timelike};

        Self {
            year: u16::try_from(datetime.year()).unwrap_or(0),
            month: datetime.month() as u8,
            day: datetime.day() as u8,
            hour: datetime.hour() as u8,
            minute: datetime.minute() as u8,
            // Leap seconds report as 60
            second: datetime.second().min(59) as u8,
        }
    }
}

/// One averaged sampling window within a cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubMeasurement {
    /// Mean forward voltage over the window (V)
    pub voltage: f32,
    /// Temperature estimated from that voltage (°C)
    pub led_temperature: f32,
    /// Reference reading taken before the window, if a sensor is configured
    pub reference_temperature: Option<f32>,
}

/// Averages of one complete cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleRecord {
    /// Local time at cycle completion
    pub timestamp: LocalTimestamp,
    /// Mean LED temperature over the sub-measurements (°C)
    pub led_temperature_avg: f32,
    /// Mean forward voltage over the sub-measurements (V)
    pub led_voltage_avg: f32,
    /// Mean reference temperature, present only with a reference sensor (°C)
    pub reference_temperature_avg: Option<f32>,
}

impl CycleRecord {
    /// Write the newline-prefixed log line for this record
    pub fn write_csv_line<W: Write>(&self, out: &mut W) -> fmt::Result {
        write!(
            out,
            "\n{},{:.2},{:.6}",
            self.timestamp, self.led_temperature_avg, self.led_voltage_avg
        )?;
        if let Some(reference) = self.reference_temperature_avg {
            write!(out, ",{:.2}", reference)?;
        }
        Ok(())
    }

    /// Log line in a fixed-capacity buffer
    pub fn to_csv_line(&self) -> Result<heapless::String<MAX_CSV_LINE_LEN>, fmt::Error> {
        let mut line = heapless::String::new();
        self.write_csv_line(&mut line)?;
        Ok(line)
    }
}
