//! Board level wrappers around the Explorer HAT peripherals.
//!
//! Pins are taken already configured, with pull resistors set, from the platform HAL.

pub mod analog;
pub mod input;
pub mod motor;
pub mod output;
pub mod pins;
pub mod pulse;
pub mod touch;

pub use analog::AnalogInput;
pub use input::DigitalInput;
pub use motor::Motor;
pub use output::Output;
pub use pins::{AnalogPin, Pad};
pub use pulse::{Pulse, PulseControl, PulseProfile, SetFrequency};
pub use touch::TouchPads;
