use embedded_hal::pwm::SetDutyCycle;

use crate::error::Error;

/// One DRV8833 H-bridge channel, driven by a forward and a backward PWM
pub struct Motor<F: SetDutyCycle, B: SetDutyCycle> {
    forward: F,
    backward: B,
    inverted: bool,
    speed: i8,
}

impl<F: SetDutyCycle, B: SetDutyCycle> Motor<F, B> {
    /// Take both channels and stop the motor
    pub fn new(forward: F, backward: B) -> Result<Self, Error> {
        let mut motor = Self {
            forward,
            backward,
            inverted: false,
            speed: 0,
        };
        motor.apply(0)?;
        Ok(motor)
    }

    fn apply(&mut self, speed: i8) -> Result<(), Error> {
        // Always drop the opposite side first so the bridge is never driven both ways
        if speed >= 0 {
            self.backward.set_duty_cycle_percent(0).map_err(Error::pwm)?;
            self.forward.set_duty_cycle_percent(speed as u8).map_err(Error::pwm)?;
        } else {
            self.forward.set_duty_cycle_percent(0).map_err(Error::pwm)?;
            self.backward.set_duty_cycle_percent(speed.unsigned_abs()).map_err(Error::pwm)?;
        }
        self.speed = speed;
        Ok(())
    }

    /// Set the speed, -100 (full backwards) ~ 100 (full forwards)
    pub fn speed(&mut self, speed: i8) -> Result<(), Error> {
        if !(-100..=100).contains(&speed) {
            return Err(Error::InvalidConfiguration);
        }
        self.apply(speed)
    }

    /// Current speed as last written to the bridge
    pub fn current_speed(&self) -> i8 {
        self.speed
    }

    pub fn forwards(&mut self, speed: u8) -> Result<(), Error> {
        if speed > 100 {
            return Err(Error::InvalidConfiguration);
        }
        let speed = speed as i8;
        self.speed(if self.inverted { -speed } else { speed })
    }

    pub fn backwards(&mut self, speed: u8) -> Result<(), Error> {
        if speed > 100 {
            return Err(Error::InvalidConfiguration);
        }
        let speed = speed as i8;
        self.speed(if self.inverted { speed } else { -speed })
    }

    /// Swap the meaning of forwards and backwards, reversing a running motor.
    ///
    /// Returns whether the motor is now inverted.
    pub fn invert(&mut self) -> Result<bool, Error> {
        self.apply(-self.speed)?;
        self.inverted = !self.inverted;
        Ok(self.inverted)
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn stop(&mut self) -> Result<(), Error> {
        self.apply(0)
    }

    pub fn release(self) -> (F, B) {
        (self.forward, self.backward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hat::fake::FakePwm;

    fn last(pwm: &FakePwm) -> u8 {
        pwm.duties.last().copied().unwrap_or_default()
    }

    #[test]
    fn test_speed_drives_one_side() {
        let mut motor = Motor::new(FakePwm::default(), FakePwm::default()).unwrap();

        motor.speed(60).unwrap();
        motor.speed(-30).unwrap();
        assert_eq!(motor.current_speed(), -30);

        let (forward, backward) = motor.release();
        assert_eq!(forward.duties, vec![0, 60, 0]);
        assert_eq!(backward.duties, vec![0, 0, 30]);
    }

    #[test]
    fn test_out_of_range_speed_is_rejected() {
        let mut motor = Motor::new(FakePwm::default(), FakePwm::default()).unwrap();
        motor.speed(40).unwrap();

        assert_eq!(motor.speed(101), Err(Error::InvalidConfiguration));
        assert_eq!(motor.speed(-128), Err(Error::InvalidConfiguration));
        assert_eq!(motor.forwards(150), Err(Error::InvalidConfiguration));
        assert_eq!(motor.current_speed(), 40);
    }

    #[test]
    fn test_invert() {
        let mut motor = Motor::new(FakePwm::default(), FakePwm::default()).unwrap();
        motor.forwards(80).unwrap();

        assert_eq!(motor.invert(), Ok(true));
        assert_eq!(motor.current_speed(), -80);

        motor.forwards(20).unwrap();
        assert_eq!(motor.current_speed(), -20);
        motor.backwards(20).unwrap();
        assert_eq!(motor.current_speed(), 20);

        motor.stop().unwrap();
        let (forward, backward) = motor.release();
        assert_eq!((last(&forward), last(&backward)), (0, 0));
    }
}
