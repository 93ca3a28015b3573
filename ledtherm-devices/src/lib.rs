//! Device adapters for the LED thermometer
//!
//! `ledtherm-core` only knows the ports in `ledtherm_core::traits`. This
//! crate renders those calls onto the device families the thermometer ships
//! with, on top of minimal driver traits so any HAL driver can be plugged in:
//!
//! | Family          | Driver trait                      | Adapter                      |
//! |-----------------|-----------------------------------|------------------------------|
//! | SH1106 128×64   | [`display::MonoCanvas`]           | [`display::OledDisplay`]     |
//! | HD44780 16×2    | [`display::CharacterLcd`]         | [`display::LcdDisplay`]      |
//! | DHT22           | [`reference::Dht22Driver`]        | [`reference::Dht22`]         |
//!
//! [`selection`] turns a `DeviceSelection` plus whatever handles the board
//! brought up into the collaborators the orchestrator is built with.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod display;
pub mod reference;
pub mod selection;

pub use display::{CharacterLcd, LcdDisplay, MonoCanvas, OledDisplay};
pub use reference::{Dht22, Dht22Driver};
pub use selection::{select_display, select_reference, DisplayDevice, NotFitted, ReferenceDevice};
