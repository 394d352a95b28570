use embedded_hal::digital::OutputPin;

use crate::error::Error;

/// A digital output: one of the onboard LEDs or the ULN2003A sinking outputs
pub struct Output<P: OutputPin> {
    pin: P,
    is_on: bool,
}

impl<P: OutputPin> Output<P> {
    /// Take the pin and drive it low
    pub fn new(mut pin: P) -> Result<Self, Error> {
        pin.set_low().map_err(Error::pin)?;
        Ok(Self { pin, is_on: false })
    }

    pub fn write(&mut self, on: bool) -> Result<(), Error> {
        if on {
            self.pin.set_high().map_err(Error::pin)?;
        } else {
            self.pin.set_low().map_err(Error::pin)?;
        }
        self.is_on = on;
        Ok(())
    }

    #[inline]
    pub fn on(&mut self) -> Result<(), Error> {
        self.write(true)
    }

    #[inline]
    pub fn off(&mut self) -> Result<(), Error> {
        self.write(false)
    }

    pub fn toggle(&mut self) -> Result<(), Error> {
        self.write(!self.is_on)
    }

    /// Last value written
    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn release(self) -> P {
        self.pin
    }
}
