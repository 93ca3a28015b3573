//! DHT22 (AM2302) single-wire temperature/humidity sensor

use ledtherm_core::{traits::ReferenceSensor, CapabilityError, CapabilityResult};

/// Lowest temperature in the DHT22 datasheet range (°C)
pub const DHT22_MIN_C: f32 = -40.0;

/// Highest temperature in the DHT22 datasheet range (°C)
pub const DHT22_MAX_C: f32 = 80.0;

/// Low-level DHT22 driver
///
/// Matches the usual two-step driver API: trigger a conversion, then read
/// the cached result. The sensor needs about 2 s between conversions, which
/// the 5 s sub-measurement delay covers.
pub trait Dht22Driver {
    /// Trigger a conversion and wait for the result
    fn measure(&mut self) -> CapabilityResult<()>;

    /// Temperature of the last conversion (°C)
    fn temperature(&self) -> f32;
}

/// DHT22 as a [`ReferenceSensor`]
#[derive(Debug)]
pub struct Dht22<D> {
    driver: D,
}

impl<D: Dht22Driver> Dht22<D> {
    /// Wrap a driver
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    /// Give back the driver
    pub fn into_inner(self) -> D {
        self.driver
    }
}

impl<D: Dht22Driver> ReferenceSensor for Dht22<D> {
    fn measure(&mut self) -> CapabilityResult<f32> {
        self.driver.measure()?;
        let temperature = self.driver.temperature();

        // A checksum-valid frame can still decode to garbage on a noisy line
        if !temperature.is_finite() || !(DHT22_MIN_C..=DHT22_MAX_C).contains(&temperature) {
            return Err(CapabilityError::InvalidData);
        }
        Ok(temperature)
    }
}
