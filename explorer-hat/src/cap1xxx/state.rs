//! Per-channel press/held/release tracking.
//!
//! The chip reports a raw delta level on every poll. Without a latch a finger resting on a pad
//! would look like a new press on every tick, so each channel remembers its last status and
//! whether a press is still latched.

use super::decoder::RawChannel;
use super::handler::EventKind;
use super::registers::NUM_INPUTS;

/// Status of a channel after the last poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchStatus {
    #[default]
    None,
    Press,
    Held,
    Release,
}

impl TouchStatus {
    /// The event fired when a channel enters this status
    pub fn event(self) -> Option<EventKind> {
        match self {
            TouchStatus::None => None,
            TouchStatus::Press => Some(EventKind::Press),
            TouchStatus::Held => Some(EventKind::Held),
            TouchStatus::Release => Some(EventKind::Release),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelState {
    pub status: TouchStatus,
    /// A press has fired and no untouched poll has cleared it yet
    pub last_pressed: bool,
    /// Delta of the last contact
    pub last_delta: i8,
}

impl ChannelState {
    pub const fn new() -> Self {
        Self {
            status: TouchStatus::None,
            last_pressed: false,
            last_delta: 0,
        }
    }

    /// Advance one poll and return the new status.
    ///
    /// `repeat` enables `Held` on sustained contact, `release` enables `Release` when the delta
    /// drops under the threshold.
    pub fn step(&mut self, raw: RawChannel, repeat: bool, release: bool) -> TouchStatus {
        let status = match raw {
            RawChannel::Untouched => {
                self.status = TouchStatus::None;
                self.last_pressed = false;
                return TouchStatus::None;
            }
            RawChannel::Touched { delta, .. } if raw.is_contact() => {
                self.last_delta = delta;
                match self.status {
                    TouchStatus::Press | TouchStatus::Held if repeat => TouchStatus::Held,
                    TouchStatus::Press | TouchStatus::Held => TouchStatus::None,
                    TouchStatus::None | TouchStatus::Release if self.last_pressed => TouchStatus::None,
                    TouchStatus::None | TouchStatus::Release => TouchStatus::Press,
                }
            }
            RawChannel::Touched { .. } => {
                if release && self.status != TouchStatus::Release {
                    TouchStatus::Release
                } else {
                    TouchStatus::None
                }
            }
        };

        self.status = status;
        // `None` keeps the latch so a resting finger never fires a second press
        self.last_pressed = matches!(status, TouchStatus::Press | TouchStatus::Held | TouchStatus::None);
        status
    }

    /// Whether the channel is logically pressed
    pub fn is_pressed(&self) -> bool {
        self.last_pressed
    }
}

/// Touch state of all channels, owned by one driver instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverState {
    channels: [ChannelState; NUM_INPUTS],
}

impl Default for DriverState {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverState {
    pub const fn new() -> Self {
        Self {
            channels: [ChannelState::new(); NUM_INPUTS],
        }
    }

    /// Run one poll over all channels, using the repeat and release enable masks
    pub fn update(&mut self, raw: &[RawChannel; NUM_INPUTS], repeat_mask: u8, release_mask: u8) -> [TouchStatus; NUM_INPUTS] {
        core::array::from_fn(|i| {
            let bit = 1u8 << i;
            self.channels[i].step(raw[i], repeat_mask & bit != 0, release_mask & bit != 0)
        })
    }

    pub fn channel(&self, index: usize) -> &ChannelState {
        &self.channels[index]
    }

    pub fn statuses(&self) -> [TouchStatus; NUM_INPUTS] {
        self.channels.map(|c| c.status)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: u8 = 40;

    fn touched(delta: i8) -> RawChannel {
        RawChannel::Touched {
            delta,
            threshold: THRESHOLD,
        }
    }

    fn run(channel: &mut ChannelState, seq: &[RawChannel], repeat: bool, release: bool) -> Vec<Option<EventKind>> {
        seq.iter().map(|raw| channel.step(*raw, repeat, release).event()).collect()
    }

    #[test]
    fn test_untouched_always_clears() {
        let previous = [
            TouchStatus::None,
            TouchStatus::Press,
            TouchStatus::Held,
            TouchStatus::Release,
        ];
        for status in previous {
            for last_pressed in [false, true] {
                let mut channel = ChannelState {
                    status,
                    last_pressed,
                    last_delta: 12,
                };
                assert_eq!(channel.step(RawChannel::Untouched, true, true), TouchStatus::None);
                assert!(!channel.is_pressed());
            }
        }
    }

    #[test]
    fn test_single_press_without_repeat() {
        let mut channel = ChannelState::new();
        let events = run(&mut channel, &[touched(45), touched(50), touched(60)], false, true);
        assert_eq!(events, vec![Some(EventKind::Press), None, None]);
        assert!(channel.is_pressed());
        assert_eq!(channel.last_delta, 60);
    }

    #[test]
    fn test_held_with_repeat() {
        let mut channel = ChannelState::new();
        let events = run(&mut channel, &[touched(45), touched(50), touched(55), touched(41)], true, true);
        assert_eq!(
            events,
            vec![
                Some(EventKind::Press),
                Some(EventKind::Held),
                Some(EventKind::Held),
                Some(EventKind::Held)
            ]
        );
    }

    #[test]
    fn test_single_release() {
        let mut channel = ChannelState::new();
        let events = run(&mut channel, &[touched(45), touched(10), touched(10)], false, true);
        assert_eq!(events, vec![Some(EventKind::Press), Some(EventKind::Release), None]);
    }

    #[test]
    fn test_release_disabled() {
        let mut channel = ChannelState::new();
        let events = run(&mut channel, &[touched(45), touched(10)], false, false);
        assert_eq!(events, vec![Some(EventKind::Press), None]);
    }

    #[test]
    fn test_press_suppressed_until_untouched_after_release() {
        let mut channel = ChannelState::new();
        let events = run(
            &mut channel,
            &[touched(45), touched(10), touched(10), touched(45), RawChannel::Untouched, touched(45)],
            false,
            true,
        );
        assert_eq!(
            events,
            vec![
                Some(EventKind::Press),
                Some(EventKind::Release),
                None,
                // The `None` after the release latches again, so this contact is swallowed
                None,
                None,
                Some(EventKind::Press),
            ]
        );
    }

    #[test]
    fn test_end_to_end_sequence() {
        let mut state = DriverState::new();
        let mut events = Vec::new();
        for raw0 in [RawChannel::Untouched, touched(45), touched(50), touched(10)] {
            let mut raw = [RawChannel::Untouched; NUM_INPUTS];
            raw[0] = raw0;
            let statuses = state.update(&raw, 0x00, 0xFF);
            events.push(statuses[0].event());
            assert!(statuses[1..].iter().all(|s| *s == TouchStatus::None));
        }
        assert_eq!(events, vec![None, Some(EventKind::Press), None, Some(EventKind::Release)]);
    }

    #[test]
    fn test_masks_are_per_channel() {
        let mut state = DriverState::new();
        let raw = [touched(45); NUM_INPUTS];
        state.update(&raw, 0b0000_0010, 0xFF);
        let statuses = state.update(&raw, 0b0000_0010, 0xFF);
        assert_eq!(statuses[0], TouchStatus::None);
        assert_eq!(statuses[1], TouchStatus::Held);
        assert!(state.channel(0).is_pressed());

        state.reset();
        assert_eq!(state.statuses(), [TouchStatus::None; NUM_INPUTS]);
    }
}
