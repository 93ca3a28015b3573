//! SH1106 128×64 monochrome OLED
//!
//! Screen layout while sampling (8 px text rows):
//!
//! ```text
//! y= 0  Measuring...2/3
//! y=16  1.722V                ╭──────╮
//! y=24  LED 24.6C             │ o  o │   face at (96, 36), eyes blink
//! y=32  DHT 22.0C             │ ──── │   every 25 samples
//!                             ╰──────╯
//! y=58    [██████████░░░░░░░░░░░░░░]     progress over 200 samples
//! ```
//!
//! The sleep banner and the final LED line overwrite only their own row so
//! the rest of the last frame stays visible between sub-measurements.

use ledtherm_core::{
    constants::{SAMPLES_PER_SUB_MEASUREMENT, SUB_MEASUREMENTS_PER_CYCLE},
    traits::{DisplayObserver, ProgressFrame},
    CapabilityResult, CycleRecord,
};

use super::{format_text, GREETING};

/// Drawing primitives of a 1-bit framebuffer
///
/// Coordinates are pixels from the top-left corner. Text uses an 8×8 font.
/// Nothing reaches the panel until [`show`](MonoCanvas::show).
pub trait MonoCanvas {
    /// Set every pixel on or off
    fn fill(&mut self, on: bool) -> CapabilityResult<()>;

    /// Filled rectangle
    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, on: bool) -> CapabilityResult<()>;

    /// Rectangle outline
    fn rect(&mut self, x: i32, y: i32, width: u32, height: u32, on: bool) -> CapabilityResult<()>;

    /// Horizontal line starting at `(x, y)`
    fn hline(&mut self, x: i32, y: i32, width: u32, on: bool) -> CapabilityResult<()>;

    /// Ellipse outline centred on `(cx, cy)`
    fn ellipse(&mut self, cx: i32, cy: i32, rx: u32, ry: u32, on: bool) -> CapabilityResult<()>;

    /// Text with its top-left corner at `(x, y)`, pixels on
    fn text(&mut self, text: &str, x: i32, y: i32) -> CapabilityResult<()>;

    /// Push the framebuffer to the panel
    fn show(&mut self) -> CapabilityResult<()>;
}

impl<T: MonoCanvas + ?Sized> MonoCanvas for &mut T {
    fn fill(&mut self, on: bool) -> CapabilityResult<()> {
        (**self).fill(on)
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, on: bool) -> CapabilityResult<()> {
        (**self).fill_rect(x, y, width, height, on)
    }

    fn rect(&mut self, x: i32, y: i32, width: u32, height: u32, on: bool) -> CapabilityResult<()> {
        (**self).rect(x, y, width, height, on)
    }

    fn hline(&mut self, x: i32, y: i32, width: u32, on: bool) -> CapabilityResult<()> {
        (**self).hline(x, y, width, on)
    }

    fn ellipse(&mut self, cx: i32, cy: i32, rx: u32, ry: u32, on: bool) -> CapabilityResult<()> {
        (**self).ellipse(cx, cy, rx, ry, on)
    }

    fn text(&mut self, text: &str, x: i32, y: i32) -> CapabilityResult<()> {
        (**self).text(text, x, y)
    }

    fn show(&mut self) -> CapabilityResult<()> {
        (**self).show()
    }
}

const ROW_HEIGHT: u32 = 8;
const SCREEN_WIDTH: u32 = 128;

const FACE: (i32, i32, u32, u32) = (96, 36, 25, 18);
const LEFT_EYE: (i32, i32) = (87, 32);
const RIGHT_EYE: (i32, i32) = (105, 32);
const EYE_RADII: (u32, u32) = (3, 5);
const CLOSED_EYE_WIDTH: u32 = 6;
const MOUTH: (i32, i32, u32) = (88, 46, 16);
const BLINK_PERIOD_SAMPLES: usize = 25;

const BAR: (i32, i32, u32, u32) = (10, 58, 108, 4);

const VOLTAGE_ROW: i32 = 16;
const LED_ROW: i32 = 24;
const REFERENCE_ROW: i32 = 32;
/// Width cleared behind the final LED line
const LED_FIELD_WIDTH: u32 = 68;

/// Graphical renderer for an SH1106 (or any 128×64 1-bit canvas)
#[derive(Debug)]
pub struct OledDisplay<C> {
    canvas: C,
}

impl<C: MonoCanvas> OledDisplay<C> {
    /// Render onto `canvas`
    pub fn new(canvas: C) -> Self {
        Self { canvas }
    }

    /// Underlying canvas
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Give back the canvas
    pub fn into_inner(self) -> C {
        self.canvas
    }

    fn draw_face(&mut self, sample_index: usize) -> CapabilityResult<()> {
        let (cx, cy, rx, ry) = FACE;
        self.canvas.ellipse(cx, cy, rx, ry, true)?;

        let eyes_open = (sample_index / BLINK_PERIOD_SAMPLES) % 2 == 0;
        for (x, y) in [LEFT_EYE, RIGHT_EYE] {
            if eyes_open {
                self.canvas.ellipse(x, y, EYE_RADII.0, EYE_RADII.1, true)?;
            } else {
                let half = (CLOSED_EYE_WIDTH / 2) as i32;
                self.canvas.hline(x - half, y, CLOSED_EYE_WIDTH, true)?;
            }
        }

        let (mx, my, mw) = MOUTH;
        self.canvas.hline(mx, my, mw, true)
    }

    fn draw_progress_bar(&mut self, sample_index: usize) -> CapabilityResult<()> {
        let (x, y, width, height) = BAR;
        self.canvas.rect(x, y, width, height, true)?;
        self.canvas.fill_rect(x, y, bar_fill(sample_index, width), height, true)
    }
}

/// Filled width of the progress bar after sample `sample_index`
fn bar_fill(sample_index: usize, width: u32) -> u32 {
    let done = (sample_index + 1).min(SAMPLES_PER_SUB_MEASUREMENT);
    (done as u64 * u64::from(width) / SAMPLES_PER_SUB_MEASUREMENT as u64) as u32
}

impl<C: MonoCanvas> DisplayObserver for OledDisplay<C> {
    fn on_start(&mut self) -> CapabilityResult<()> {
        self.canvas.fill(false)?;
        self.canvas.text(GREETING, 0, 0)?;
        self.canvas.show()
    }

    fn on_progress(&mut self, frame: &ProgressFrame) -> CapabilityResult<()> {
        self.canvas.fill(false)?;

        let header = format_text(format_args!(
            "Measuring...{}/{}",
            frame.sub_measurement_index + 1,
            SUB_MEASUREMENTS_PER_CYCLE
        ))?;
        self.canvas.text(&header, 0, 0)?;

        self.draw_face(frame.sample_index)?;
        self.draw_progress_bar(frame.sample_index)?;

        let voltage = format_text(format_args!("{:.3}V", frame.voltage))?;
        self.canvas.text(&voltage, 0, VOLTAGE_ROW)?;
        let led = format_text(format_args!("LED {:.1}C", frame.led_temperature))?;
        self.canvas.text(&led, 0, LED_ROW)?;
        if let Some(reference) = frame.reference_temperature {
            let reference = format_text(format_args!("DHT {:.1}C", reference))?;
            self.canvas.text(&reference, 0, REFERENCE_ROW)?;
        }

        self.canvas.show()
    }

    fn on_sub_measurement_sleep(&mut self) -> CapabilityResult<()> {
        self.canvas.fill_rect(0, 0, SCREEN_WIDTH, ROW_HEIGHT, false)?;
        self.canvas.text("Sleeping", 0, 0)?;
        self.canvas.show()
    }

    fn on_cycle_finish(&mut self, record: &CycleRecord) -> CapabilityResult<()> {
        self.canvas.fill_rect(0, LED_ROW, LED_FIELD_WIDTH, ROW_HEIGHT, false)?;
        let led = format_text(format_args!("LED {:.1}C", record.led_temperature_avg))?;
        self.canvas.text(&led, 0, LED_ROW)?;
        self.canvas.show()
    }
}
