//! Reference thermometers
//!
//! Only the DHT22 is supported. The SHT30 was planned but its driver never
//! shipped; selecting it is rejected in [`crate::selection`].

mod dht22;

pub use dht22::{Dht22, Dht22Driver, DHT22_MAX_C, DHT22_MIN_C};
