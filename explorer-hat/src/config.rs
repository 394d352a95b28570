use embassy_time::Duration;

/// Config of the CAP1xxx touch controller.
///
/// The defaults are the values programmed by `Cap1xxx::init`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchConfig {
    /// Period of the dispatch loop
    pub poll_interval: Duration,
    /// Period of interrupt checks in `wait_for_interrupt`
    pub alert_poll_interval: Duration,
    /// Channels that fire `Held` on sustained contact
    pub repeat_enabled: u8,
    /// Channels that fire `Release`
    pub release_enabled: u8,
    pub multitouch: bool,
    /// Sensitivity multiplier, one of 1, 2, 4, ..., 128
    pub sensitivity: u8,
    /// Time before a press becomes a hold, 0~500ms in 35ms steps
    pub hold_delay_ms: u16,
    /// Held event repeat rate, 0~500ms in 35ms steps
    pub repeat_rate_ms: u16,
    pub touch_delta: u8,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            alert_poll_interval: Duration::from_millis(5),
            repeat_enabled: 0x00,
            release_enabled: 0xFF,
            multitouch: true,
            sensitivity: 2,
            hold_delay_ms: 210,
            repeat_rate_ms: 210,
            touch_delta: 10,
        }
    }
}

/// Config of the ADS1015 converter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcConfig {
    /// Full scale range in mV
    pub gain_mv: u16,
    pub samples_per_second: u16,
    /// Period of the background refresh of all channels, 40 times per second by default
    pub refresh_interval: Duration,
    /// Limit for one conversion, bus transfers included
    pub read_timeout: Duration,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            gain_mv: 6144,
            samples_per_second: 1600,
            refresh_interval: Duration::from_millis(25),
            read_timeout: Duration::from_millis(50),
        }
    }
}
