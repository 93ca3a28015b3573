//! Startup device selection
//!
//! The board brings up whatever drivers it has and passes them here together
//! with the configured [`DeviceSelection`]. The result plugs straight into
//! the cycle builder:
//!
//! ```rust,ignore
//! let display = select_display(config.devices.display, Some(sh1106), None::<NotFitted>)?;
//! let reference = select_reference(config.devices.reference, Some(dht))?;
//!
//! let mut monitor = MeasurementCycle::builder(&config)
//!     .display(display)                 // Option<DisplayDevice<..>>
//!     .optional_reference(reference)    // Option<ReferenceDevice<..>>
//!     // ...
//!     .build()?;
//! ```
//!
//! Device type is decided once, here. The measurement loop only sees the
//! port traits.
//!
//! [`DeviceSelection`]: ledtherm_core::config::DeviceSelection

use ledtherm_core::{
    config::{DisplayKind, ReferenceKind},
    traits::{DisplayObserver, ProgressFrame, ReferenceSensor},
    CapabilityResult, CycleRecord, MonitorError, MonitorResult,
};

use crate::display::{CharacterLcd, LcdDisplay, MonoCanvas, OledDisplay};
use crate::reference::{Dht22, Dht22Driver};

/// Driver slot with nothing fitted
///
/// Uninhabited; use it as the type of a `None` handle for a device family the
/// board does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFitted {}

impl MonoCanvas for NotFitted {
    fn fill(&mut self, _on: bool) -> CapabilityResult<()> {
        match *self {}
    }

    fn fill_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32, _on: bool) -> CapabilityResult<()> {
        match *self {}
    }

    fn rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32, _on: bool) -> CapabilityResult<()> {
        match *self {}
    }

    fn hline(&mut self, _x: i32, _y: i32, _w: u32, _on: bool) -> CapabilityResult<()> {
        match *self {}
    }

    fn ellipse(&mut self, _cx: i32, _cy: i32, _rx: u32, _ry: u32, _on: bool) -> CapabilityResult<()> {
        match *self {}
    }

    fn text(&mut self, _text: &str, _x: i32, _y: i32) -> CapabilityResult<()> {
        match *self {}
    }

    fn show(&mut self) -> CapabilityResult<()> {
        match *self {}
    }
}

impl CharacterLcd for NotFitted {
    fn clear(&mut self) -> CapabilityResult<()> {
        match *self {}
    }

    fn put_str(&mut self, _text: &str) -> CapabilityResult<()> {
        match *self {}
    }
}

impl Dht22Driver for NotFitted {
    fn measure(&mut self) -> CapabilityResult<()> {
        match *self {}
    }

    fn temperature(&self) -> f32 {
        match *self {}
    }
}

/// The display chosen at startup
#[derive(Debug)]
pub enum DisplayDevice<C, L> {
    /// SH1106 graphical OLED
    Oled(OledDisplay<C>),
    /// Character LCD
    Lcd(LcdDisplay<L>),
}

impl<C: MonoCanvas, L: CharacterLcd> DisplayObserver for DisplayDevice<C, L> {
    fn on_start(&mut self) -> CapabilityResult<()> {
        match self {
            Self::Oled(display) => display.on_start(),
            Self::Lcd(display) => display.on_start(),
        }
    }

    fn on_progress(&mut self, frame: &ProgressFrame) -> CapabilityResult<()> {
        match self {
            Self::Oled(display) => display.on_progress(frame),
            Self::Lcd(display) => display.on_progress(frame),
        }
    }

    fn on_sub_measurement_sleep(&mut self) -> CapabilityResult<()> {
        match self {
            Self::Oled(display) => display.on_sub_measurement_sleep(),
            Self::Lcd(display) => display.on_sub_measurement_sleep(),
        }
    }

    fn on_cycle_finish(&mut self, record: &CycleRecord) -> CapabilityResult<()> {
        match self {
            Self::Oled(display) => display.on_cycle_finish(record),
            Self::Lcd(display) => display.on_cycle_finish(record),
        }
    }
}

/// The reference sensor chosen at startup
#[derive(Debug)]
pub enum ReferenceDevice<D> {
    /// DHT22 on a single-wire GPIO
    Dht22(Dht22<D>),
}

impl<D: Dht22Driver> ReferenceSensor for ReferenceDevice<D> {
    fn measure(&mut self) -> CapabilityResult<f32> {
        match self {
            Self::Dht22(sensor) => sensor.measure(),
        }
    }
}

/// Pick the display renderer for `kind`
///
/// `DisplayKind::None` yields `Ok(None)` and ignores any handles. A selected
/// family without its handle is [`MonitorError::MissingDevice`].
pub fn select_display<C: MonoCanvas, L: CharacterLcd>(
    kind: DisplayKind,
    canvas: Option<C>,
    lcd: Option<L>,
) -> MonitorResult<Option<DisplayDevice<C, L>>> {
    let device = match kind {
        DisplayKind::Sh1106 => {
            let canvas = canvas.ok_or(MonitorError::MissingDevice { device: "SH1106" })?;
            DisplayDevice::Oled(OledDisplay::new(canvas))
        }
        DisplayKind::Lcd => {
            let lcd = lcd.ok_or(MonitorError::MissingDevice { device: "LCD" })?;
            DisplayDevice::Lcd(LcdDisplay::new(lcd))
        }
        DisplayKind::None => return Ok(None),
    };

    log_info!("Display: {:?}", kind);
    Ok(Some(device))
}

/// Pick the reference sensor for `kind`
///
/// SHT30 is rejected with [`MonitorError::UnsupportedDevice`].
pub fn select_reference<D: Dht22Driver>(
    kind: ReferenceKind,
    dht22: Option<D>,
) -> MonitorResult<Option<ReferenceDevice<D>>> {
    match kind {
        ReferenceKind::Dht22 => {
            let driver = dht22.ok_or(MonitorError::MissingDevice { device: "DHT22" })?;
            log_info!("Reference sensor: DHT22");
            Ok(Some(ReferenceDevice::Dht22(Dht22::new(driver))))
        }
        ReferenceKind::Sht30 => Err(MonitorError::UnsupportedDevice { device: "SHT30" }),
        ReferenceKind::None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Canvas;

    impl MonoCanvas for Canvas {
        fn fill(&mut self, _on: bool) -> CapabilityResult<()> {
            Ok(())
        }
        fn fill_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32, _on: bool) -> CapabilityResult<()> {
            Ok(())
        }
        fn rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32, _on: bool) -> CapabilityResult<()> {
            Ok(())
        }
        fn hline(&mut self, _x: i32, _y: i32, _w: u32, _on: bool) -> CapabilityResult<()> {
            Ok(())
        }
        fn ellipse(&mut self, _cx: i32, _cy: i32, _rx: u32, _ry: u32, _on: bool) -> CapabilityResult<()> {
            Ok(())
        }
        fn text(&mut self, _text: &str, _x: i32, _y: i32) -> CapabilityResult<()> {
            Ok(())
        }
        fn show(&mut self) -> CapabilityResult<()> {
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Dht(f32);

    impl Dht22Driver for Dht {
        fn measure(&mut self) -> CapabilityResult<()> {
            Ok(())
        }
        fn temperature(&self) -> f32 {
            self.0
        }
    }

    #[test]
    fn oled_selected_when_configured() {
        let display = select_display(DisplayKind::Sh1106, Some(Canvas), None::<NotFitted>).unwrap();
        assert!(matches!(display, Some(DisplayDevice::Oled(_))));
    }

    #[test]
    fn no_display_ignores_handles() {
        let display = select_display(DisplayKind::None, Some(Canvas), None::<NotFitted>).unwrap();
        assert!(display.is_none());
    }

    #[test]
    fn selected_display_without_handle_is_missing() {
        let result = select_display(DisplayKind::Lcd, Some(Canvas), None::<NotFitted>);
        assert!(matches!(result, Err(MonitorError::MissingDevice { device: "LCD" })));
    }

    #[test]
    fn dht22_selected_and_measures() {
        let mut reference = select_reference(ReferenceKind::Dht22, Some(Dht(21.5)))
            .unwrap()
            .unwrap();
        assert_eq!(reference.measure(), Ok(21.5));
    }

    #[test]
    fn sht30_is_unsupported() {
        let result = select_reference(ReferenceKind::Sht30, Some(Dht(21.5)));
        let err = result.unwrap_err();
        assert!(matches!(err, MonitorError::UnsupportedDevice { device: "SHT30" }));
        assert!(err.is_configuration());
    }

    #[test]
    fn no_reference_selected() {
        let reference = select_reference(ReferenceKind::None, None::<NotFitted>).unwrap();
        assert!(reference.is_none());
    }

    #[test]
    fn dht22_without_handle_is_missing() {
        let result = select_reference(ReferenceKind::Dht22, None::<NotFitted>);
        assert!(matches!(result, Err(MonitorError::MissingDevice { device: "DHT22" })));
    }
}
