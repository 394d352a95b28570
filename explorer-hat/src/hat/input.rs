use embassy_time::{Duration, Instant, Ticker};
use embedded_hal::digital::InputPin;

use crate::error::Error;

/// Edges closer than this to the previous accepted edge are ignored
pub const DEBOUNCE_TIME: Duration = Duration::from_millis(20);
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One of the 5V tolerant inputs, with polled edge handlers.
///
/// Handlers get the new pin level. They run inside [`DigitalInput::poll`].
pub struct DigitalInput<'h, P: InputPin> {
    pin: P,
    last: bool,
    last_edge: Option<Instant>,
    debounce: Duration,
    on_high: Option<&'h dyn Fn(bool)>,
    on_low: Option<&'h dyn Fn(bool)>,
    on_changed: Option<&'h dyn Fn(bool)>,
}

impl<'h, P: InputPin> DigitalInput<'h, P> {
    pub fn new(mut pin: P) -> Result<Self, Error> {
        let last = pin.is_high().map_err(Error::pin)?;
        Ok(Self {
            pin,
            last,
            last_edge: None,
            debounce: DEBOUNCE_TIME,
            on_high: None,
            on_low: None,
            on_changed: None,
        })
    }

    pub fn read(&mut self) -> Result<bool, Error> {
        self.pin.is_high().map_err(Error::pin)
    }

    pub fn is_on(&mut self) -> Result<bool, Error> {
        self.read()
    }

    pub fn is_off(&mut self) -> Result<bool, Error> {
        self.read().map(|high| !high)
    }

    /// Whether the level differs from the last one seen, remembering the new level
    pub fn has_changed(&mut self) -> Result<bool, Error> {
        let level = self.read()?;
        let changed = level != self.last;
        self.last = level;
        Ok(changed)
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn on_high(&mut self, handler: &'h dyn Fn(bool)) {
        self.on_high = Some(handler);
    }

    pub fn on_low(&mut self, handler: &'h dyn Fn(bool)) {
        self.on_low = Some(handler);
    }

    pub fn on_changed(&mut self, handler: &'h dyn Fn(bool)) {
        self.on_changed = Some(handler);
    }

    pub fn clear_events(&mut self) {
        self.on_high = None;
        self.on_low = None;
        self.on_changed = None;
    }

    /// Sample the pin at `now` and fire the handlers on a debounced edge.
    ///
    /// Returns the new level if an edge was accepted.
    pub fn poll(&mut self, now: Instant) -> Result<Option<bool>, Error> {
        let level = self.read()?;
        if level == self.last {
            return Ok(None);
        }
        if let Some(edge) = self.last_edge {
            if now.saturating_duration_since(edge) < self.debounce {
                return Ok(None);
            }
        }
        self.last = level;
        self.last_edge = Some(now);

        let edge_handler = if level { self.on_high } else { self.on_low };
        if let Some(handler) = edge_handler {
            handler(level);
        }
        if let Some(handler) = self.on_changed {
            handler(level);
        }
        Ok(Some(level))
    }

    /// Poll every 10ms, forever
    pub async fn run(&mut self) -> ! {
        let mut ticker = Ticker::every(POLL_INTERVAL);
        loop {
            if let Err(e) = self.poll(Instant::now()) {
                warn!("Input poll failed: {:?}", e);
            }
            ticker.next().await;
        }
    }

    pub fn release(self) -> P {
        self.pin
    }
}
