//! Explorer HAT wiring, BCM pin numbering.

use crate::cap1xxx::Channel;

// Onboard LEDs above the touch pads 1, 2, 3, 4
pub const LED1: u8 = 4;
pub const LED2: u8 = 17;
pub const LED3: u8 = 27;
pub const LED4: u8 = 5;

// Outputs via ULN2003A
pub const OUT1: u8 = 6;
pub const OUT2: u8 = 12;
pub const OUT3: u8 = 13;
pub const OUT4: u8 = 16;

// 5V tolerant inputs
pub const IN1: u8 = 23;
pub const IN2: u8 = 22;
pub const IN3: u8 = 24;
pub const IN4: u8 = 25;

// Motors via DRV8833PWP dual H-bridge
pub const M1B: u8 = 19;
pub const M1F: u8 = 20;
pub const M2B: u8 = 21;
pub const M2F: u8 = 26;

pub const LEDS: [u8; 4] = [LED1, LED2, LED3, LED4];
pub const OUTPUTS: [u8; 4] = [OUT1, OUT2, OUT3, OUT4];
pub const INPUTS: [u8; 4] = [IN1, IN2, IN3, IN4];

/// Touch pads as labelled on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pad {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

impl Pad {
    pub const ALL: [Pad; 8] = [
        Pad::One,
        Pad::Two,
        Pad::Three,
        Pad::Four,
        Pad::Five,
        Pad::Six,
        Pad::Seven,
        Pad::Eight,
    ];

    /// Pads one to four are wired to inputs 5-8 of the touch controller
    pub const fn channel(self) -> Channel {
        Channel::wrapping(self as u8 + 4)
    }

    pub const fn from_channel(channel: Channel) -> Pad {
        Self::ALL[((channel.index() + 4) % 8) as usize]
    }
}

/// Analog inputs as labelled on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogPin {
    One,
    Two,
    Three,
    Four,
}

impl AnalogPin {
    pub const ALL: [AnalogPin; 4] = [AnalogPin::One, AnalogPin::Two, AnalogPin::Three, AnalogPin::Four];

    /// ADC channel, the labels run in reverse
    pub const fn adc_channel(self) -> u8 {
        3 - self as u8
    }
}
