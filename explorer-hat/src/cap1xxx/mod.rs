//! CAP1xxx capacitive touch controller driver.
//!
//! Supports the 8 input parts (CAP1208, CAP1188, CAP1166). Every poll reads the input status,
//! threshold and delta registers, runs them through [`DriverState`] and dispatches the resulting
//! press/held/release events to the handlers registered with [`Cap1xxx::on`].
//!
//! ```rust
//! static CONTROL: WatchControl = WatchControl::new();
//!
//! let mut cap = Cap1xxx::new(i2c, AlertPin::new(alert), TouchConfig::default(), &CONTROL);
//! cap.init().await?;
//! let on_press = |e: &TouchEvent, _: &WatchControl| info!("pressed {}", e.channel.index());
//! cap.on(Channel::new(0).unwrap(), EventKind::Press, &on_press)?;
//! cap.run().await;
//! ```

pub mod decoder;
pub mod handler;
pub mod interrupt;
pub mod registers;
pub mod state;

use embassy_time::{Duration, Instant, Ticker, Timer};
use embedded_hal_async::i2c::I2c;

pub use self::decoder::{RawChannel, RawPollSnapshot};
pub use self::handler::{Channel, EventKind, HandlerTable, TouchEvent, TouchHandler, WatchControl};
pub use self::interrupt::{AlertPin, ControlRegister, InterruptSource};
pub use self::state::{ChannelState, DriverState, TouchStatus};
use self::registers::*;
use crate::bus::RegisterDevice;
use crate::config::TouchConfig;
use crate::error::Error;

pub struct Cap1xxx<'h, I2C: I2c, S: InterruptSource> {
    device: RegisterDevice<I2C>,
    interrupt: S,
    config: TouchConfig,
    state: DriverState,
    handlers: HandlerTable<'h>,
    control: &'h WatchControl,
    initialized: bool,
}

impl<'h, I2C: I2c, S: InterruptSource> Cap1xxx<'h, I2C, S> {
    /// `control` starts and stops [`Cap1xxx::run`], other tasks may hold it too
    pub fn new(i2c: I2C, interrupt: S, config: TouchConfig, control: &'h WatchControl) -> Self {
        Self {
            device: RegisterDevice::new(i2c, ADDRESS),
            interrupt,
            config,
            state: DriverState::new(),
            handlers: HandlerTable::new(),
            control,
            initialized: false,
        }
    }

    /// Reset the touch state and program the chip with the configured defaults
    pub async fn init(&mut self) -> Result<(), Error> {
        let sensitivity = sensitivity_field(self.config.sensitivity).ok_or(Error::InvalidConfiguration)?;
        self.state.reset();
        self.initialized = true;

        if let Err(e) = self.write_defaults(sensitivity).await {
            error!("CAP1xxx: init failed: {:?}", e);
            self.initialized = false;
            return Err(e);
        }
        info!("CAP1xxx: initialized");
        Ok(())
    }

    /// Reset the touch state without touching the chip, for an already configured device
    pub fn init_without_defaults(&mut self) {
        self.state.reset();
        self.initialized = true;
    }

    async fn write_defaults(&mut self, sensitivity: u8) -> Result<(), Error> {
        // Enable all inputs with interrupt
        self.enable_inputs(0xFF).await?;
        self.enable_interrupts(0xFF).await?;

        self.enable_repeat(self.config.repeat_enabled).await?;
        self.enable_multitouch(self.config.multitouch).await?;
        self.set_hold_delay(self.config.hold_delay_ms).await?;
        self.set_repeat_rate(self.config.repeat_rate_ms).await?;

        self.device.write_byte(SAMPLING_CONFIG, SAMPLING_CONFIG_DEFAULT).await?;
        self.device.write_byte(SENSITIVITY, sensitivity << SENSITIVITY_OFFSET).await?;
        self.device.write_byte(GENERAL_CONFIG, GENERAL_CONFIG_DEFAULT).await?;
        self.device.write_byte(CONFIGURATION2, CONFIGURATION2_DEFAULT).await?;
        self.set_touch_delta(self.config.touch_delta)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn ensure_initialized(&self) -> Result<(), Error> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    pub fn config(&self) -> &TouchConfig {
        &self.config
    }

    pub fn control(&self) -> &'h WatchControl {
        self.control
    }

    pub fn channel_state(&self, channel: Channel) -> &ChannelState {
        self.state.channel(channel.index() as usize)
    }

    pub async fn product_id(&mut self) -> Result<u8, Error> {
        self.ensure_initialized()?;
        self.device.read_byte(PRODUCT_ID).await
    }

    async fn read_snapshot(&mut self) -> Result<RawPollSnapshot, Error> {
        let mut snapshot = RawPollSnapshot {
            touched: self.device.read_byte(INPUT_STATUS).await?,
            ..Default::default()
        };
        self.device.read_block(INPUT_1_THRESHOLD, &mut snapshot.threshold).await?;
        self.device.read_block(INPUT_1_DELTA, &mut snapshot.delta).await?;
        Ok(snapshot)
    }

    /// Read the inputs and advance the touch state of every channel by one poll
    pub async fn get_input_status(&mut self) -> Result<[TouchStatus; NUM_INPUTS], Error> {
        self.ensure_initialized()?;
        let snapshot = self.read_snapshot().await?;
        trace!(
            "CAP1xxx: touched {:#x}, delta {:?}",
            snapshot.touched,
            snapshot.delta
        );
        Ok(self.state.update(
            &snapshot.decode(),
            self.config.repeat_enabled,
            self.config.release_enabled,
        ))
    }

    /// Clear the interrupt latch, bit 0 of the main control register
    pub async fn clear_interrupt(&mut self) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.device.clear_bit(MAIN_CONTROL, MAIN_CONTROL_INT).await
    }

    pub async fn interrupt_pending(&mut self) -> Result<bool, Error> {
        self.ensure_initialized()?;
        self.interrupt.is_pending(&mut self.device).await
    }

    /// Wait until an interrupt is pending, `Ok(false)` if `timeout` elapses first
    pub async fn wait_for_interrupt(&mut self, timeout: Duration) -> Result<bool, Error> {
        self.ensure_initialized()?;
        let deadline = Instant::now() + timeout;
        loop {
            if self.interrupt.is_pending(&mut self.device).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            Timer::after(self.config.alert_poll_interval).await;
        }
    }

    // ========================================================================
    // Event dispatch
    // ========================================================================

    /// Register `handler` for `kind` events on `channel`, replacing any previous one.
    ///
    /// Registering also starts watching, the events are dispatched by [`Cap1xxx::run`].
    pub fn on(&mut self, channel: Channel, kind: EventKind, handler: &'h dyn TouchHandler) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.handlers.set(channel, kind, handler);
        self.control.start_watching();
        Ok(())
    }

    pub fn remove_handler(&mut self, channel: Channel, kind: EventKind) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.handlers.remove(channel, kind);
        Ok(())
    }

    /// Returns `false` if already watching
    pub fn start_watching(&self) -> Result<bool, Error> {
        self.ensure_initialized()?;
        Ok(self.control.start_watching())
    }

    /// Returns `false` if not watching
    pub fn stop_watching(&self) -> Result<bool, Error> {
        self.ensure_initialized()?;
        Ok(self.control.stop_watching())
    }

    /// Read the inputs, invoke the handlers of all fired events and clear the interrupt
    pub async fn handle_alert(&mut self) -> Result<(), Error> {
        self.service(false).await
    }

    /// One tick of the dispatch loop: service the device if an interrupt is pending.
    ///
    /// Returns whether the device was serviced.
    pub async fn poll(&mut self) -> Result<bool, Error> {
        if !self.interrupt_pending().await? {
            return Ok(false);
        }
        self.service(true).await?;
        Ok(true)
    }

    /// With `gated`, dispatching stops as soon as watching is stopped, e.g. by a handler
    async fn service(&mut self, gated: bool) -> Result<(), Error> {
        let statuses = self.get_input_status().await?;

        for (channel, status) in Channel::all().zip(statuses) {
            let Some(kind) = status.event() else {
                continue;
            };
            if gated && !self.control.is_watching() {
                debug!("CAP1xxx: watching stopped, skipping remaining events");
                break;
            }
            let event = TouchEvent {
                channel,
                kind,
                delta: self.state.channel(channel.index() as usize).last_delta,
            };
            debug!("CAP1xxx: channel {} {:?}", channel.index(), kind);
            if let Some(handler) = self.handlers.get(channel, kind) {
                handler.on_touch(&event, self.control);
            }
        }

        self.clear_interrupt().await
    }

    /// Run the dispatch loop until watching is stopped.
    ///
    /// Handlers run inline, a slow handler delays the following polls. Errors of a single poll
    /// are logged and the loop carries on with the next tick.
    ///
    /// Stopping through the [`WatchControl`] from another task ends the loop at the next tick.
    /// Stopping from a handler skips the rest of the current poll: events of the later channels
    /// are dropped, but their touch state has already advanced and the interrupt is cleared.
    pub async fn run(&mut self) {
        if !self.initialized {
            error!("CAP1xxx: run called before init");
            return;
        }

        let mut ticker = Ticker::every(self.config.poll_interval);
        while self.control.is_watching() {
            ticker.next().await;
            if !self.control.is_watching() {
                break;
            }
            if let Err(e) = self.poll().await {
                warn!("CAP1xxx: poll failed: {:?}", e);
            }
        }
        debug!("CAP1xxx: dispatch loop stopped");
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub async fn enable_inputs(&mut self, inputs: u8) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.device.write_byte(INPUT_ENABLE, inputs).await
    }

    pub async fn enable_interrupts(&mut self, inputs: u8) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.device.write_byte(INTERRUPT_ENABLE, inputs).await
    }

    /// Enable `Held` events on the channels in `inputs`
    pub async fn enable_repeat(&mut self, inputs: u8) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.device.write_byte(REPEAT_ENABLE, inputs).await?;
        self.config.repeat_enabled = inputs;
        Ok(())
    }

    /// Enable `Release` events on the channels in `inputs`
    pub fn enable_release(&mut self, inputs: u8) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.config.release_enabled = inputs;
        Ok(())
    }

    pub async fn enable_multitouch(&mut self, enable: bool) -> Result<(), Error> {
        self.ensure_initialized()?;
        // The bit blocks multitouch when set
        self.device
            .change_bit(MULTITOUCH_CONFIG, MULTITOUCH_BLOCK_BIT, !enable)
            .await?;
        self.config.multitouch = enable;
        Ok(())
    }

    /// Set the sensitivity multiplier, one of 1, 2, 4, 8, 16, 32, 64 and 128
    pub async fn set_sensitivity(&mut self, multiplier: u8) -> Result<(), Error> {
        self.ensure_initialized()?;
        let field = sensitivity_field(multiplier).ok_or(Error::InvalidConfiguration)?;
        self.device
            .change_bits(SENSITIVITY, SENSITIVITY_OFFSET, SENSITIVITY_SIZE, field)
            .await?;
        self.config.sensitivity = multiplier;
        Ok(())
    }

    /// Set the time before a press and hold is detected
    pub async fn set_hold_delay(&mut self, ms: u16) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.device
            .change_bits(INPUT_CONFIG2, 0, TOUCH_RATE_SIZE, touch_rate_field(ms))
            .await?;
        self.config.hold_delay_ms = ms;
        Ok(())
    }

    /// Set the rate at which held events repeat
    pub async fn set_repeat_rate(&mut self, ms: u16) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.device
            .change_bits(INPUT_CONFIG, 0, TOUCH_RATE_SIZE, touch_rate_field(ms))
            .await?;
        self.config.repeat_rate_ms = ms;
        Ok(())
    }

    /// Store the touch delta, it is kept in memory only
    pub fn set_touch_delta(&mut self, delta: u8) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.config.touch_delta = delta;
        Ok(())
    }

    /// Recalibrate inputs that are held longer than the max duration
    pub async fn auto_recalibrate(&mut self, enable: bool) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.device
            .change_bit(GENERAL_CONFIG, GENERAL_CONFIG_MAX_DUR_RECAL, enable)
            .await
    }

    pub async fn filter_analog_noise(&mut self, enable: bool) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.device
            .change_bit(GENERAL_CONFIG, GENERAL_CONFIG_DIS_ANA_NOISE, !enable)
            .await
    }

    pub async fn filter_digital_noise(&mut self, enable: bool) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.device
            .change_bit(GENERAL_CONFIG, GENERAL_CONFIG_DIS_DIG_NOISE, !enable)
            .await
    }

    /// Give back the bus and the interrupt source
    pub fn release(self) -> (I2C, S) {
        (self.device.release(), self.interrupt)
    }
}
