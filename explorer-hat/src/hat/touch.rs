use core::cell::Cell;

use embedded_hal_async::i2c::I2c;

use super::pins::Pad;
use crate::cap1xxx::{Cap1xxx, EventKind, InterruptSource, TouchEvent, TouchHandler, WatchControl};
use crate::error::Error;

/// The eight touch pads by their board labels.
///
/// Tracks whether each pad is pressed or held and forwards every event to `callback`
/// as `(pad, kind)`.
pub struct TouchPads<F: Fn(Pad, EventKind)> {
    callback: F,
    pressed: [Cell<bool>; 8],
    held: [Cell<bool>; 8],
}

impl<F: Fn(Pad, EventKind)> TouchPads<F> {
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            pressed: Default::default(),
            held: Default::default(),
        }
    }

    pub fn is_pressed(&self, pad: Pad) -> bool {
        self.pressed[pad as usize].get()
    }

    pub fn is_held(&self, pad: Pad) -> bool {
        self.held[pad as usize].get()
    }

    /// Bind to every channel and event kind of the touch controller
    pub fn register<'h, I2C: I2c, S: InterruptSource>(&'h self, cap: &mut Cap1xxx<'h, I2C, S>) -> Result<(), Error> {
        for pad in Pad::ALL {
            for kind in EventKind::ALL {
                cap.on(pad.channel(), kind, self)?;
            }
        }
        Ok(())
    }
}

impl<F: Fn(Pad, EventKind)> TouchHandler for TouchPads<F> {
    fn on_touch(&self, event: &TouchEvent, _control: &WatchControl) {
        let pad = Pad::from_channel(event.channel);
        let i = pad as usize;
        match event.kind {
            EventKind::Press => self.pressed[i].set(true),
            EventKind::Held => self.held[i].set(true),
            EventKind::Release => {
                self.pressed[i].set(false);
                self.held[i].set(false);
            }
        }
        (self.callback)(pad, event.kind);
    }
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;

    use super::*;

    fn event(pad: Pad, kind: EventKind) -> TouchEvent {
        TouchEvent {
            channel: pad.channel(),
            kind,
            delta: 50,
        }
    }

    #[test]
    fn test_pad_state_tracking() {
        let seen = RefCell::new(Vec::new());
        let pads = TouchPads::new(|pad: Pad, kind: EventKind| seen.borrow_mut().push((pad, kind)));
        let control = WatchControl::new();

        pads.on_touch(&event(Pad::One, EventKind::Press), &control);
        pads.on_touch(&event(Pad::One, EventKind::Held), &control);
        assert!(pads.is_pressed(Pad::One));
        assert!(pads.is_held(Pad::One));
        assert!(!pads.is_pressed(Pad::Five));

        pads.on_touch(&event(Pad::One, EventKind::Release), &control);
        assert!(!pads.is_pressed(Pad::One));
        assert!(!pads.is_held(Pad::One));

        assert_eq!(
            seen.borrow().as_slice(),
            &[
                (Pad::One, EventKind::Press),
                (Pad::One, EventKind::Held),
                (Pad::One, EventKind::Release)
            ]
        );
    }

    #[test]
    fn test_channel_zero_is_pad_five() {
        let seen = RefCell::new(Vec::new());
        let pads = TouchPads::new(|pad: Pad, kind: EventKind| seen.borrow_mut().push((pad, kind)));
        let raw = TouchEvent {
            channel: crate::cap1xxx::Channel::new(0).unwrap(),
            kind: EventKind::Press,
            delta: 45,
        };

        pads.on_touch(&raw, &WatchControl::new());
        assert!(pads.is_pressed(Pad::Five));
        assert_eq!(seen.borrow().as_slice(), &[(Pad::Five, EventKind::Press)]);
    }
}
