//! Fixed parameters of the measurement protocol and the reference deployment
//!
//! The protocol shape (sub-measurements per cycle, samples per
//! sub-measurement) is fixed at compile time. Everything describing the
//! hardware is only a default for [`MonitorConfig`](crate::config::MonitorConfig).

// ===== MEASUREMENT PROTOCOL =====

/// Sub-measurements averaged into one cycle record.
pub const SUB_MEASUREMENTS_PER_CYCLE: usize = 3;

/// Raw ADC samples averaged into one sub-measurement voltage.
pub const SAMPLES_PER_SUB_MEASUREMENT: usize = 200;

/// Progress is reported on every Nth sample (10 samples = 0.1 s at 10 ms).
pub const DEFAULT_UPDATE_INTERVAL: usize = 10;

// ===== CADENCE =====

/// Idle time before each sub-measurement (ms).
pub const DEFAULT_SUB_MEASUREMENT_DELAY_MS: u32 = 5_000;

/// Delay between consecutive raw ADC reads (ms).
pub const DEFAULT_INTER_SAMPLE_DELAY_MS: u32 = 10;

/// How long the status indicator stays lit at startup (ms).
pub const DEFAULT_STARTUP_PULSE_MS: u32 = 1_000;

// ===== ADC =====

/// Full-scale value of a 16-bit converter (`read_u16()` on RP2040/RP2350).
///
/// 0 maps to 0 V and 65535 to the reference supply voltage.
pub const ADC_FULL_SCALE: u16 = 65_535;

/// ADC reference supply voltage of a Pico board (V).
pub const DEFAULT_REFERENCE_SUPPLY_V: f32 = 3.3;

// ===== CALIBRATION =====

/// Ambient temperature at which the reference LED was calibrated (°C).
pub const DEFAULT_CALIBRATION_TEMPERATURE_C: f32 = 24.60;

/// Forward voltage read through the ADC at the calibration temperature (V).
pub const DEFAULT_CALIBRATION_VOLTAGE_V: f32 = 1.7221454;

/// Forward voltage change per degree (V/°C).
///
/// Silicon and LED junctions sit near -2 mV/°C between 25 °C and 40 °C;
/// this value was fitted for the reference LED.
pub const DEFAULT_VOLTAGE_COEFFICIENT_V_PER_C: f32 = -0.00185618;

// ===== LOG FORMAT =====

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "mittaukset.csv";

/// Header row when no reference sensor is configured.
pub const CSV_HEADER: &str = "Aika,LED lämpötila (°C),LED jännite (V)";

/// Header row when a reference sensor is configured.
pub const CSV_HEADER_WITH_REFERENCE: &str =
    "Aika,LED lämpötila (°C),LED jännite (V), Referenssi (°C)";

/// Header row for the given reference configuration.
pub const fn csv_header(has_reference: bool) -> &'static str {
    if has_reference {
        CSV_HEADER_WITH_REFERENCE
    } else {
        CSV_HEADER
    }
}
