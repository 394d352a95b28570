use embedded_hal::{digital, i2c, pwm};

/// Errors of the Explorer HAT drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The driver was used before `init` completed
    NotInitialized,
    /// I2C transaction failed
    Bus(i2c::ErrorKind),
    /// Rejected configuration value, the previous setting is kept
    InvalidConfiguration,
    /// Reading or driving a GPIO failed
    Pin(digital::ErrorKind),
    /// Setting a PWM duty cycle or frequency failed
    Pwm(pwm::ErrorKind),
    /// A bus operation did not complete in time
    Timeout,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::NotInitialized => write!(f, "driver not initialized"),
            Error::Bus(kind) => write!(f, "bus error: {kind:?}"),
            Error::InvalidConfiguration => write!(f, "invalid configuration value"),
            Error::Pin(kind) => write!(f, "pin error: {kind:?}"),
            Error::Pwm(kind) => write!(f, "pwm error: {kind:?}"),
            Error::Timeout => write!(f, "timed out"),
        }
    }
}

impl Error {
    pub(crate) fn bus<E: i2c::Error>(e: E) -> Self {
        Error::Bus(e.kind())
    }

    pub(crate) fn pin<E: digital::Error>(e: E) -> Self {
        Error::Pin(e.kind())
    }

    pub(crate) fn pwm<E: pwm::Error>(e: E) -> Self {
        Error::Pwm(e.kind())
    }
}
