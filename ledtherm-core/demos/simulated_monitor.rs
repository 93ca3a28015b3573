//! Simulated Monitor
//!
//! Runs the measurement loop against a simulated LED whose junction slowly
//! warms, with a virtual timeline so a few cycles finish instantly.
//!
//! Run with: `RUST_LOG=debug cargo run --example simulated_monitor`

use ledtherm_core::{
    config::MonitorConfig,
    logger::CsvLogStore,
    record::LocalTimestamp,
    time::{FixedClock, VirtualScheduler},
    traits::{AnalogInput, ReferenceSensor},
    CapabilityResult, MonitorResult, TemperatureConverter,
};

/// LED whose temperature rises by `drift` °C per conversion
struct SimulatedLed {
    converter: TemperatureConverter,
    full_scale: f32,
    supply: f32,
    temperature: f32,
    drift: f32,
}

impl AnalogInput for SimulatedLed {
    fn read_raw(&mut self) -> CapabilityResult<u16> {
        self.temperature += self.drift;
        let voltage = self.converter.voltage_at(self.temperature);
        let raw = (voltage / self.supply * self.full_scale).round();
        Ok(raw.clamp(0.0, self.full_scale) as u16)
    }
}

/// Room thermometer that always reads the same value
struct RoomThermometer(f32);

impl ReferenceSensor for RoomThermometer {
    fn measure(&mut self) -> CapabilityResult<f32> {
        Ok(self.0)
    }
}

fn main() -> MonitorResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== LED Thermometer Simulation ===\n");

    let config = MonitorConfig::default();
    let converter = TemperatureConverter::new(config.calibration)?;

    let led = SimulatedLed {
        converter,
        full_scale: f32::from(config.adc.full_scale),
        supply: config.adc.reference_supply_voltage,
        temperature: 24.0,
        drift: 0.001,
    };

    let path = std::env::temp_dir().join("ledtherm-simulated.csv");
    let _ = std::fs::remove_file(&path);

    let mut monitor = ledtherm_core::MeasurementCycle::builder(&config)
        .analog(led)
        .scheduler(VirtualScheduler::new())
        .clock(FixedClock::new(LocalTimestamp::new(2024, 3, 1, 12, 0, 0)))
        .sink(CsvLogStore::new(&path))
        .reference(RoomThermometer(23.5))
        .build()?;

    monitor.start()?;
    for _ in 0..3 {
        let record = monitor.run_cycle()?;
        println!(
            "  {:.6} V -> {:.2} °C (reference {:.2} °C)",
            record.led_voltage_avg,
            record.led_temperature_avg,
            record.reference_temperature_avg.unwrap_or(f32::NAN)
        );
    }

    println!(
        "\nSimulated {:?} of measuring, log written to {}",
        monitor.scheduler().elapsed(),
        path.display()
    );
    println!("\n{}", std::fs::read_to_string(&path)?);
    Ok(())
}
