//! Decoding of one poll snapshot into per-channel raw readings.

use super::registers::NUM_INPUTS;

/// Registers read from the device in one poll cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPollSnapshot {
    /// Input status register, bit `i` set when channel `i` is touched
    pub touched: u8,
    /// Per-channel touch thresholds
    pub threshold: [u8; NUM_INPUTS],
    /// Per-channel delta counts as read, two's complement
    pub delta: [u8; NUM_INPUTS],
}

/// Raw reading of a single channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RawChannel {
    Untouched,
    Touched { delta: i8, threshold: u8 },
}

impl RawChannel {
    /// Whether the delta reaches the threshold
    pub fn is_contact(&self) -> bool {
        match *self {
            RawChannel::Untouched => false,
            RawChannel::Touched { delta, threshold } => i16::from(delta) >= i16::from(threshold),
        }
    }
}

impl RawPollSnapshot {
    /// Split the snapshot into per-channel readings
    pub fn decode(&self) -> [RawChannel; NUM_INPUTS] {
        core::array::from_fn(|i| {
            if self.touched & (1 << i) == 0 {
                RawChannel::Untouched
            } else {
                RawChannel::Touched {
                    delta: self.delta[i] as i8,
                    threshold: self.threshold[i],
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_touched_bits() {
        let snapshot = RawPollSnapshot {
            touched: 0b1000_0001,
            threshold: [40, 41, 42, 43, 44, 45, 46, 47],
            delta: [45, 1, 2, 3, 4, 5, 6, 0xF6],
        };
        let raw = snapshot.decode();
        assert_eq!(raw[0], RawChannel::Touched { delta: 45, threshold: 40 });
        for channel in &raw[1..7] {
            assert_eq!(*channel, RawChannel::Untouched);
        }
        assert_eq!(raw[7], RawChannel::Touched { delta: -10, threshold: 47 });
    }

    #[test]
    fn test_twos_complement_delta() {
        let snapshot = RawPollSnapshot {
            touched: 0xFF,
            threshold: [0; NUM_INPUTS],
            delta: [0x7F, 0x80, 0xFF, 0x00, 0x01, 0xFE, 0x81, 0x40],
        };
        let deltas: [i8; NUM_INPUTS] = snapshot.decode().map(|c| match c {
            RawChannel::Touched { delta, .. } => delta,
            RawChannel::Untouched => panic!("channel should be touched"),
        });
        assert_eq!(deltas, [127, -128, -1, 0, 1, -2, -127, 64]);
    }

    #[test]
    fn test_contact_uses_signed_delta() {
        assert!(RawChannel::Touched { delta: 40, threshold: 40 }.is_contact());
        assert!(!RawChannel::Touched { delta: 39, threshold: 40 }.is_contact());
        // A large raw byte is a negative delta, never a contact
        assert!(!RawChannel::Touched { delta: -56, threshold: 40 }.is_contact());
        assert!(!RawChannel::Untouched.is_contact());
    }
}
