//! Display renderers
//!
//! Both renderers implement `DisplayObserver` and differ only in what they
//! draw. Each call redraws what it owns and pushes it to the panel before
//! returning, so the loop never waits on a partially drawn frame.

use core::fmt::{self, Write};

use ledtherm_core::{CapabilityError, CapabilityResult};

mod lcd;
mod oled;

pub use lcd::{CharacterLcd, LcdDisplay};
pub use oled::{MonoCanvas, OledDisplay};

/// Greeting shown once at startup
pub const GREETING: &str = "Hello World";

/// Longest text a renderer formats in one piece (two LCD rows plus newline)
pub const MAX_TEXT_LEN: usize = 40;

pub(crate) type TextLine = heapless::String<MAX_TEXT_LEN>;

/// Format into a fixed buffer; text that does not fit is a data error
pub(crate) fn format_text(args: fmt::Arguments<'_>) -> CapabilityResult<TextLine> {
    let mut line = TextLine::new();
    line.write_fmt(args)
        .map_err(|_| CapabilityError::InvalidData)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_within_capacity() {
        let line = format_text(format_args!("LED {:.1}C", 24.56)).unwrap();
        assert_eq!(line.as_str(), "LED 24.6C");
    }

    #[test]
    fn overflow_is_invalid_data() {
        let long = "x".repeat(MAX_TEXT_LEN + 1);
        let result = format_text(format_args!("{}", long));
        assert_eq!(result, Err(CapabilityError::InvalidData));
    }
}
