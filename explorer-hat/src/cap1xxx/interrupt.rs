//! Ways of telling whether the touch controller has raised an interrupt.

use embedded_hal::digital::InputPin;
use embedded_hal_async::i2c::I2c;

use super::registers::{MAIN_CONTROL, MAIN_CONTROL_INT};
use crate::bus::RegisterDevice;
use crate::error::Error;

pub trait InterruptSource {
    /// Whether an interrupt is pending
    async fn is_pending<I2C: I2c>(&mut self, device: &mut RegisterDevice<I2C>) -> Result<bool, Error>;
}

/// Reads the interrupt bit of the main control register, for boards without an ALERT line
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlRegister;

impl InterruptSource for ControlRegister {
    async fn is_pending<I2C: I2c>(&mut self, device: &mut RegisterDevice<I2C>) -> Result<bool, Error> {
        let control = device.read_byte(MAIN_CONTROL).await?;
        Ok(control & (1 << MAIN_CONTROL_INT) != 0)
    }
}

/// The active-low ALERT line wired to a GPIO.
///
/// The pin should be configured with a pull-up.
pub struct AlertPin<P: InputPin> {
    pin: P,
}

impl<P: InputPin> AlertPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> InterruptSource for AlertPin<P> {
    async fn is_pending<I2C: I2c>(&mut self, _device: &mut RegisterDevice<I2C>) -> Result<bool, Error> {
        self.pin.is_low().map_err(Error::pin)
    }
}
