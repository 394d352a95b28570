//! Touch events, handlers and the watch flag shared with them.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel as EventChannel;

use super::registers::NUM_INPUTS;

/// Kind of a touch event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    Press,
    Release,
    Held,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Press, EventKind::Release, EventKind::Held];

    const fn index(self) -> usize {
        match self {
            EventKind::Press => 0,
            EventKind::Release => 1,
            EventKind::Held => 2,
        }
    }
}

/// One of the 8 sense inputs, 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel(u8);

impl Channel {
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < NUM_INPUTS {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Index taken modulo the channel count
    pub(crate) const fn wrapping(index: u8) -> Self {
        Self(index % NUM_INPUTS as u8)
    }

    pub fn all() -> impl Iterator<Item = Channel> {
        (0..NUM_INPUTS as u8).map(Channel)
    }

    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Payload passed to touch handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchEvent {
    pub channel: Channel,
    pub kind: EventKind,
    /// Delta of the last contact on this channel
    pub delta: i8,
}

/// Start/stop flag of the dispatch loop.
///
/// Shared by reference between [`Cap1xxx`](super::Cap1xxx) and any other task, and handed to
/// every handler, so the loop can be stopped from anywhere. Stopping takes effect before the
/// next handler invocation. Events of the channels after the stopping handler in the same poll
/// are dropped, while their touch state has already advanced, so those presses are not
/// reported again.
#[derive(Debug, Default)]
pub struct WatchControl {
    watching: AtomicBool,
}

impl WatchControl {
    pub const fn new() -> Self {
        Self {
            watching: AtomicBool::new(false),
        }
    }

    /// Returns `false` if the loop was already watching
    pub fn start_watching(&self) -> bool {
        !self.watching.swap(true, Ordering::AcqRel)
    }

    /// Returns `false` if the loop was not watching
    pub fn stop_watching(&self) -> bool {
        self.watching.swap(false, Ordering::AcqRel)
    }

    pub fn is_watching(&self) -> bool {
        self.watching.load(Ordering::Acquire)
    }
}

/// Callback invoked synchronously from the dispatch loop.
///
/// A slow handler delays the next poll. Forward events into an embassy channel
/// (which implements this trait) to process them elsewhere.
pub trait TouchHandler {
    fn on_touch(&self, event: &TouchEvent, control: &WatchControl);
}

impl<F> TouchHandler for F
where
    F: Fn(&TouchEvent, &WatchControl),
{
    fn on_touch(&self, event: &TouchEvent, control: &WatchControl) {
        self(event, control)
    }
}

impl<M: RawMutex, const N: usize> TouchHandler for EventChannel<M, TouchEvent, N> {
    fn on_touch(&self, event: &TouchEvent, _control: &WatchControl) {
        if self.try_send(*event).is_err() {
            warn!("Touch event queue full, dropping {:?}", event.kind);
        }
    }
}

/// At most one handler per (channel, event kind)
pub struct HandlerTable<'h> {
    handlers: [[Option<&'h dyn TouchHandler>; 3]; NUM_INPUTS],
}

impl Default for HandlerTable<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'h> HandlerTable<'h> {
    pub const fn new() -> Self {
        Self {
            handlers: [[None; 3]; NUM_INPUTS],
        }
    }

    /// Register a handler, returning the one it replaces
    pub fn set(
        &mut self,
        channel: Channel,
        kind: EventKind,
        handler: &'h dyn TouchHandler,
    ) -> Option<&'h dyn TouchHandler> {
        self.handlers[channel.0 as usize][kind.index()].replace(handler)
    }

    pub fn remove(&mut self, channel: Channel, kind: EventKind) -> Option<&'h dyn TouchHandler> {
        self.handlers[channel.0 as usize][kind.index()].take()
    }

    pub fn get(&self, channel: Channel, kind: EventKind) -> Option<&'h dyn TouchHandler> {
        self.handlers[channel.0 as usize][kind.index()]
    }

    pub fn clear(&mut self) {
        self.handlers = [[None; 3]; NUM_INPUTS];
    }
}
