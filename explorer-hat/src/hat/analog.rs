use embedded_hal_async::i2c::I2c;

use super::pins::AnalogPin;
use crate::ads1015::Ads1015;

/// Default change threshold in volts
pub const DEFAULT_SENSITIVITY: f32 = 0.1;

/// An analog input with change detection over the cached ADC readings
#[derive(Debug, Clone, Copy)]
pub struct AnalogInput {
    pin: AnalogPin,
    sensitivity: f32,
    last: Option<f32>,
}

impl AnalogInput {
    pub fn new(pin: AnalogPin) -> Self {
        Self {
            pin,
            sensitivity: DEFAULT_SENSITIVITY,
            last: None,
        }
    }

    pub fn pin(&self) -> AnalogPin {
        self.pin
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn set_sensitivity(&mut self, volts: f32) {
        self.sensitivity = volts;
    }

    /// Last voltage converted by the ADC on this input
    pub fn read<I2C: I2c>(&self, adc: &Ads1015<I2C>) -> Option<f32> {
        adc.read(self.pin.adc_channel())
    }

    /// Feed a new reading, returning it if it moved more than the sensitivity since the last one
    pub fn update(&mut self, value: f32) -> Option<f32> {
        let changed = self.last.is_some_and(|last| {
            let diff = value - last;
            diff > self.sensitivity || diff < -self.sensitivity
        });
        self.last = Some(value);
        changed.then_some(value)
    }

    /// [`AnalogInput::update`] with the cached ADC reading
    pub fn poll<I2C: I2c>(&mut self, adc: &Ads1015<I2C>) -> Option<f32> {
        self.read(adc).and_then(|value| self.update(value))
    }
}
