//! 16×2 character LCD (HD44780 behind an I2C backpack)
//!
//! Two rows of text. With a reference sensor the second row carries the
//! reference temperature, otherwise the LED voltage:
//!
//! ```text
//! LED TEMP: 24.6C        LED TEMP: 24.6C
//! REF TEMP: 22.0C        VOLTAGE: 1.7221V
//! ```

use ledtherm_core::{
    traits::{DisplayObserver, ProgressFrame},
    CapabilityResult, CycleRecord,
};

use super::{format_text, GREETING};

/// Text output of a character LCD
pub trait CharacterLcd {
    /// Blank the screen and home the cursor
    fn clear(&mut self) -> CapabilityResult<()>;

    /// Write at the cursor; `\n` moves to the start of the next row
    fn put_str(&mut self, text: &str) -> CapabilityResult<()>;
}

impl<T: CharacterLcd + ?Sized> CharacterLcd for &mut T {
    fn clear(&mut self) -> CapabilityResult<()> {
        (**self).clear()
    }

    fn put_str(&mut self, text: &str) -> CapabilityResult<()> {
        (**self).put_str(text)
    }
}

/// Two-row text renderer
#[derive(Debug)]
pub struct LcdDisplay<L> {
    lcd: L,
}

impl<L: CharacterLcd> LcdDisplay<L> {
    /// Render onto `lcd`
    pub fn new(lcd: L) -> Self {
        Self { lcd }
    }

    /// Underlying LCD
    pub fn lcd(&self) -> &L {
        &self.lcd
    }

    /// Give back the LCD
    pub fn into_inner(self) -> L {
        self.lcd
    }

    fn write_screen(&mut self, text: &str) -> CapabilityResult<()> {
        self.lcd.clear()?;
        self.lcd.put_str(text)
    }

    fn write_readings(
        &mut self,
        led_temperature: f32,
        voltage: f32,
        reference: Option<f32>,
    ) -> CapabilityResult<()> {
        let text = match reference {
            Some(reference) => format_text(format_args!(
                "LED TEMP: {:.1}C\nREF TEMP: {:.1}C",
                led_temperature, reference
            ))?,
            None => format_text(format_args!(
                "LED TEMP: {:.1}C\nVOLTAGE: {:.4}V",
                led_temperature, voltage
            ))?,
        };
        self.write_screen(&text)
    }
}

impl<L: CharacterLcd> DisplayObserver for LcdDisplay<L> {
    fn on_start(&mut self) -> CapabilityResult<()> {
        self.write_screen(GREETING)
    }

    fn on_progress(&mut self, frame: &ProgressFrame) -> CapabilityResult<()> {
        self.write_readings(frame.led_temperature, frame.voltage, frame.reference_temperature)
    }

    fn on_sub_measurement_sleep(&mut self) -> CapabilityResult<()> {
        self.write_screen("Sleeping...")
    }

    fn on_cycle_finish(&mut self, record: &CycleRecord) -> CapabilityResult<()> {
        self.write_readings(
            record.led_temperature_avg,
            record.led_voltage_avg,
            record.reference_temperature_avg,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledtherm_core::{CapabilityError, LocalTimestamp};

    /// Keeps what a real panel would show after the last clear
    #[derive(Default)]
    struct ScreenLcd {
        screen: String,
        clears: usize,
        unplugged: bool,
    }

    impl CharacterLcd for ScreenLcd {
        fn clear(&mut self) -> CapabilityResult<()> {
            if self.unplugged {
                return Err(CapabilityError::NotInitialized);
            }
            self.screen.clear();
            self.clears += 1;
            Ok(())
        }

        fn put_str(&mut self, text: &str) -> CapabilityResult<()> {
            self.screen.push_str(text);
            Ok(())
        }
    }

    fn frame(reference: Option<f32>) -> ProgressFrame {
        ProgressFrame {
            sample_index: 10,
            sub_measurement_index: 0,
            voltage: 1.7221454,
            led_temperature: 24.6,
            reference_temperature: reference,
            is_final: false,
        }
    }

    #[test]
    fn progress_with_reference() {
        let mut display = LcdDisplay::new(ScreenLcd::default());
        display.on_progress(&frame(Some(22.0))).unwrap();
        assert_eq!(display.lcd().screen, "LED TEMP: 24.6C\nREF TEMP: 22.0C");
    }

    #[test]
    fn progress_without_reference_shows_voltage() {
        let mut display = LcdDisplay::new(ScreenLcd::default());
        display.on_progress(&frame(None)).unwrap();
        assert_eq!(display.lcd().screen, "LED TEMP: 24.6C\nVOLTAGE: 1.7221V");
    }

    #[test]
    fn every_update_starts_from_a_blank_screen() {
        let mut display = LcdDisplay::new(ScreenLcd::default());
        display.on_start().unwrap();
        assert_eq!(display.lcd().screen, "Hello World");

        display.on_progress(&frame(None)).unwrap();
        display.on_sub_measurement_sleep().unwrap();

        assert_eq!(display.lcd().screen, "Sleeping...");
        assert_eq!(display.lcd().clears, 3);
    }

    #[test]
    fn finish_shows_averages() {
        let mut display = LcdDisplay::new(ScreenLcd::default());
        let record = CycleRecord {
            timestamp: LocalTimestamp::default(),
            led_temperature_avg: 31.26,
            led_voltage_avg: 1.71,
            reference_temperature_avg: Some(21.04),
        };
        display.on_cycle_finish(&record).unwrap();
        assert_eq!(display.lcd().screen, "LED TEMP: 31.3C\nREF TEMP: 21.0C");
    }

    #[test]
    fn lcd_failure_propagates() {
        let mut display = LcdDisplay::new(ScreenLcd {
            unplugged: true,
            ..Default::default()
        });
        assert_eq!(display.on_start(), Err(CapabilityError::NotInitialized));
    }
}
