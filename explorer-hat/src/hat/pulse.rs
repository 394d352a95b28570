//! Software LED pulsing on a PWM channel.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_time::{Duration, Instant, Ticker};
use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use crate::error::Error;

/// Duty cycle updates per second
pub const PULSE_FPS: u64 = 50;
pub const PULSE_FREQUENCY_HZ: u32 = 1000;

/// The frequency half of a PWM channel, `SetDutyCycle` only covers the duty cycle
pub trait SetFrequency: ErrorType {
    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error>;
}

/// One pulse cycle: ramp up, stay on, ramp down, stay off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseProfile {
    pub transition_on_ms: u32,
    pub on_ms: u32,
    pub transition_off_ms: u32,
    pub off_ms: u32,
}

impl PulseProfile {
    pub const fn new(transition_on_ms: u32, on_ms: u32, transition_off_ms: u32, off_ms: u32) -> Self {
        Self {
            transition_on_ms,
            on_ms,
            transition_off_ms,
            off_ms,
        }
    }

    pub const fn period_ms(&self) -> u32 {
        self.transition_on_ms + self.on_ms + self.transition_off_ms + self.off_ms
    }

    /// Duty cycle in percent, `elapsed_ms` after the cycle started
    pub fn duty_at(&self, elapsed_ms: u64) -> u8 {
        let period = self.period_ms() as u64;
        if period == 0 {
            return 0;
        }
        let t = elapsed_ms % period;
        let rise = self.transition_on_ms as u64;
        let on_end = rise + self.on_ms as u64;
        let fall_end = on_end + self.transition_off_ms as u64;

        let duty = if t <= rise {
            if rise == 0 { 100 } else { (200 * t + rise) / (2 * rise) }
        } else if t <= on_end {
            100
        } else if t <= fall_end {
            let fall = self.transition_off_ms as u64;
            (200 * (fall_end - t) + fall) / (2 * fall)
        } else {
            0
        };
        duty as u8
    }
}

/// Pause/stop flags of a running [`Pulse`]
#[derive(Debug, Default)]
pub struct PulseControl {
    paused: AtomicBool,
    stopped: AtomicBool,
}

impl PulseControl {
    pub const fn new() -> Self {
        Self {
            paused: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        }
    }

    /// Freeze the output at its current duty cycle
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Continue from the start of the cycle
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    /// End [`Pulse::run`], which turns the output off
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

pub struct Pulse<P: SetDutyCycle + SetFrequency> {
    pin: P,
    profile: PulseProfile,
}

impl<P: SetDutyCycle + SetFrequency> Pulse<P> {
    pub fn new(pin: P, profile: PulseProfile) -> Self {
        Self { pin, profile }
    }

    pub fn profile(&self) -> &PulseProfile {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: PulseProfile) {
        self.profile = profile;
    }

    /// Drive the pulse until `control` is stopped
    pub async fn run(&mut self, control: &PulseControl) -> Result<(), Error> {
        self.pin.set_frequency(PULSE_FREQUENCY_HZ).map_err(Error::pwm)?;

        let mut ticker = Ticker::every(Duration::from_millis(1000 / PULSE_FPS));
        let mut start = Instant::now();
        let mut paused = false;
        while !control.is_stopped() {
            if control.is_paused() {
                paused = true;
            } else {
                if paused {
                    start = Instant::now();
                    paused = false;
                }
                let duty = self.profile.duty_at(start.elapsed().as_millis());
                self.pin.set_duty_cycle_percent(duty).map_err(Error::pwm)?;
            }
            ticker.next().await;
        }

        debug!("Pulse stopped");
        self.pin.set_duty_cycle_percent(0).map_err(Error::pwm)
    }

    pub fn release(self) -> P {
        self.pin
    }
}
