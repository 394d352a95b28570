//! ADS1015 4 channel, 12 bit analog to digital converter.
//!
//! Conversions run in single-shot mode: the config word starts one conversion on the selected
//! channel, the driver sleeps for one sample period and then reads the result. Each conversion
//! is bounded by [`AdcConfig::read_timeout`].

use embassy_time::{with_timeout, Duration, Ticker, Timer};
use embedded_hal_async::i2c::I2c;

use crate::bus::RegisterDevice;
use crate::config::AdcConfig;
use crate::error::Error;

pub const ADDRESS: u8 = 0x48;
pub const NUM_CHANNELS: usize = 4;

const REG_CONVERSION: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;

/// Disable comparator, single-shot mode, start a conversion
const CONFIG_COMPARATOR_OFF: u16 = 0x0003;
const CONFIG_MODE_SINGLE: u16 = 0x0100;
const CONFIG_OS_SINGLE: u16 = 0x8000;

/// Margin added to the sample period before reading a conversion
const CONVERSION_MARGIN_US: u64 = 100;

fn sample_rate_bits(sps: u16) -> Option<u16> {
    match sps {
        128 => Some(0x0000),
        250 => Some(0x0020),
        490 => Some(0x0040),
        920 => Some(0x0060),
        1600 => Some(0x0080),
        2400 => Some(0x00A0),
        3300 => Some(0x00C0),
        _ => None,
    }
}

/// Full scale range in mV
fn gain_bits(gain_mv: u16) -> Option<u16> {
    match gain_mv {
        6144 => Some(0x0000),
        4096 => Some(0x0200),
        2048 => Some(0x0400),
        1024 => Some(0x0600),
        512 => Some(0x0800),
        256 => Some(0x0A00),
        _ => None,
    }
}

/// Single-ended input multiplexer, AINx against GND
fn mux_bits(channel: u8) -> Option<u16> {
    match channel {
        0 => Some(0x4000),
        1 => Some(0x5000),
        2 => Some(0x6000),
        3 => Some(0x7000),
        _ => None,
    }
}

/// Convert the conversion register to volts
pub fn to_volts(raw: [u8; 2], gain_mv: u16) -> f32 {
    let raw12 = u16::from_be_bytes(raw) >> 4;
    raw12 as f32 * gain_mv as f32 / 2048.0 / 1000.0
}

pub struct Ads1015<I2C: I2c> {
    device: RegisterDevice<I2C>,
    config: AdcConfig,
    readings: [Option<f32>; NUM_CHANNELS],
}

impl<I2C: I2c> Ads1015<I2C> {
    /// Create the driver, rejecting a gain or sample rate the chip doesn't support
    pub fn new(i2c: I2C, config: AdcConfig) -> Result<Self, Error> {
        if gain_bits(config.gain_mv).is_none() || sample_rate_bits(config.samples_per_second).is_none() {
            return Err(Error::InvalidConfiguration);
        }
        Ok(Self {
            device: RegisterDevice::new(i2c, ADDRESS),
            config,
            readings: [None; NUM_CHANNELS],
        })
    }

    pub fn config(&self) -> &AdcConfig {
        &self.config
    }

    pub fn set_gain(&mut self, gain_mv: u16) -> Result<(), Error> {
        gain_bits(gain_mv).ok_or(Error::InvalidConfiguration)?;
        self.config.gain_mv = gain_mv;
        Ok(())
    }

    pub fn set_sample_rate(&mut self, sps: u16) -> Result<(), Error> {
        sample_rate_bits(sps).ok_or(Error::InvalidConfiguration)?;
        self.config.samples_per_second = sps;
        Ok(())
    }

    /// Config word starting a single-shot conversion of `channel`
    pub fn config_word(&self, channel: u8) -> Result<u16, Error> {
        let mux = mux_bits(channel).ok_or(Error::InvalidConfiguration)?;
        let gain = gain_bits(self.config.gain_mv).ok_or(Error::InvalidConfiguration)?;
        let sps = sample_rate_bits(self.config.samples_per_second).ok_or(Error::InvalidConfiguration)?;
        Ok(CONFIG_COMPARATOR_OFF | CONFIG_MODE_SINGLE | sps | mux | gain | CONFIG_OS_SINGLE)
    }

    /// Time from starting a conversion until the result is ready
    pub fn conversion_delay(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.config.samples_per_second as u64 + CONVERSION_MARGIN_US)
    }

    /// Convert `channel` and return the voltage, the result is also cached for [`Ads1015::read`]
    pub async fn read_single_ended(&mut self, channel: u8) -> Result<f32, Error> {
        let word = self.config_word(channel)?;
        let volts = match with_timeout(self.config.read_timeout, self.convert(word)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("ADS1015: channel {} conversion timed out", channel);
                return Err(Error::Timeout);
            }
        };
        trace!("ADS1015: channel {} -> {}V", channel, volts);

        self.readings[channel as usize] = Some(volts);
        Ok(volts)
    }

    async fn convert(&mut self, word: u16) -> Result<f32, Error> {
        self.device.write_block(REG_CONFIG, &word.to_be_bytes()).await?;
        Timer::after(self.conversion_delay()).await;

        let mut raw = [0u8; 2];
        self.device.read_block(REG_CONVERSION, &mut raw).await?;
        Ok(to_volts(raw, self.config.gain_mv))
    }

    /// Convert all channels in order 0, 1, 2, 3, stopping at the first failure
    pub async fn refresh(&mut self) -> Result<(), Error> {
        for channel in 0..NUM_CHANNELS as u8 {
            self.read_single_ended(channel).await?;
        }
        Ok(())
    }

    /// Last voltage converted on `channel`, `None` until the first conversion
    pub fn read(&self, channel: u8) -> Option<f32> {
        self.readings.get(channel as usize).copied().flatten()
    }

    /// Refresh all channels every `refresh_interval`, forever
    pub async fn run(&mut self) -> ! {
        let mut ticker = Ticker::every(self.config.refresh_interval);
        loop {
            if let Err(e) = self.refresh().await {
                warn!("ADS1015: refresh failed: {:?}", e);
            }
            ticker.next().await;
        }
    }

    pub fn release(self) -> I2C {
        self.device.release()
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_async::i2c::{ErrorType, Operation};
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    use super::*;

    /// Accepts writes, never completes a read
    struct StalledBus {
        writes: usize,
    }

    impl ErrorType for StalledBus {
        type Error = ErrorKind;
    }

    impl I2c for StalledBus {
        async fn transaction(&mut self, _address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            if operations.iter().any(|op| matches!(op, Operation::Read(_))) {
                core::future::pending::<()>().await;
            }
            self.writes += 1;
            Ok(())
        }
    }

    fn conversion(word: u16, result: [u8; 2]) -> [I2cTransaction; 2] {
        let [hi, lo] = word.to_be_bytes();
        [
            I2cTransaction::write(ADDRESS, vec![REG_CONFIG, hi, lo]),
            I2cTransaction::write_read(ADDRESS, vec![REG_CONVERSION], result.to_vec()),
        ]
    }

    #[test]
    fn test_full_scale_reading() {
        assert_eq!(to_volts([0x80, 0x00], 6144), 6.144);
        assert_eq!(to_volts([0x00, 0x0F], 6144), 0.0);
        assert_eq!(to_volts([0x40, 0x00], 4096), 2.048);
    }

    #[test]
    fn test_config_word() {
        let mut i2c = I2cMock::new(&[]);
        let adc = Ads1015::new(i2c.clone(), AdcConfig::default()).unwrap();

        // 6144mV, 1600sps
        assert_eq!(adc.config_word(0), Ok(0xC183));
        assert_eq!(adc.config_word(3), Ok(0xF183));
        assert_eq!(adc.config_word(4), Err(Error::InvalidConfiguration));
        assert_eq!(adc.conversion_delay(), Duration::from_micros(725));
        i2c.done();
    }

    #[test]
    fn test_invalid_settings_keep_previous_value() {
        let mut i2c = I2cMock::new(&[]);
        let mut adc = Ads1015::new(i2c.clone(), AdcConfig::default()).unwrap();

        assert_eq!(adc.set_gain(5000), Err(Error::InvalidConfiguration));
        assert_eq!(adc.set_sample_rate(1000), Err(Error::InvalidConfiguration));
        assert_eq!(adc.config(), &AdcConfig::default());

        adc.set_gain(2048).unwrap();
        adc.set_sample_rate(3300).unwrap();
        assert_eq!(adc.config_word(1), Ok(0xD5C3));

        let bad = AdcConfig {
            gain_mv: 100,
            ..Default::default()
        };
        assert!(Ads1015::new(i2c.clone(), bad).is_err());
        i2c.done();
    }

    #[test]
    fn test_refresh_reads_channels_in_order() {
        let expectations: Vec<I2cTransaction> = [
            conversion(0xC183, [0x80, 0x00]),
            conversion(0xD183, [0x40, 0x00]),
            conversion(0xE183, [0x00, 0x00]),
            conversion(0xF183, [0x10, 0x00]),
        ]
        .into_iter()
        .flatten()
        .collect();
        let mut i2c = I2cMock::new(&expectations);
        let mut adc = Ads1015::new(i2c.clone(), AdcConfig::default()).unwrap();

        assert_eq!(adc.read(0), None);
        block_on(adc.refresh()).unwrap();
        assert_eq!(adc.read(0), Some(6.144));
        assert_eq!(adc.read(1), Some(3.072));
        assert_eq!(adc.read(2), Some(0.0));
        assert_eq!(adc.read(3), Some(0.768));
        assert_eq!(adc.read(4), None);
        i2c.done();
    }

    #[test]
    fn test_failed_conversion_is_not_cached() {
        let mut expectations = conversion(0xC183, [0x00, 0x00]).to_vec();
        expectations[1] = expectations[1].clone().with_error(ErrorKind::Other);
        let mut i2c = I2cMock::new(&expectations);
        let mut adc = Ads1015::new(i2c.clone(), AdcConfig::default()).unwrap();

        assert_eq!(block_on(adc.read_single_ended(0)), Err(Error::Bus(ErrorKind::Other)));
        assert_eq!(adc.read(0), None);
        i2c.done();
    }

    #[test]
    fn test_stalled_read_times_out() {
        let mut adc = Ads1015::new(StalledBus { writes: 0 }, AdcConfig::default()).unwrap();

        assert_eq!(block_on(adc.read_single_ended(0)), Err(Error::Timeout));
        assert_eq!(adc.read(0), None);
        // Stops at channel 0 instead of hanging
        assert_eq!(block_on(adc.refresh()), Err(Error::Timeout));
        assert_eq!(adc.release().writes, 2);
    }
}
