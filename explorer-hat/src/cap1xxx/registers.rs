//! CAP1xxx register map and field encodings.

// ============================================================================
// Device
// ============================================================================
pub const ADDRESS: u8 = 0x28;

pub const PID_CAP1208: u8 = 0x6B;
pub const PID_CAP1188: u8 = 0x50;
pub const PID_CAP1166: u8 = 0x51;

pub const NUM_INPUTS: usize = 8;

// ============================================================================
// Status and data registers
// ============================================================================
/// Bit 0 is the interrupt latch
pub const MAIN_CONTROL: u8 = 0x00;
pub const GENERAL_STATUS: u8 = 0x02;
pub const INPUT_STATUS: u8 = 0x03;
/// Delta counts of inputs 1-8, signed
pub const INPUT_1_DELTA: u8 = 0x10;

// ============================================================================
// Configuration registers
// ============================================================================
/// B6..B4 sensitivity, B3..B0 base shift
pub const SENSITIVITY: u8 = 0x1F;
/// B5 disable digital noise, B4 disable analog noise, B3 max duration recalibration
pub const GENERAL_CONFIG: u8 = 0x20;
pub const INPUT_ENABLE: u8 = 0x21;
/// B3..B0 repeat rate
pub const INPUT_CONFIG: u8 = 0x22;
/// B3..B0 press and hold delay
pub const INPUT_CONFIG2: u8 = 0x23;
pub const SAMPLING_CONFIG: u8 = 0x24;
pub const INTERRUPT_ENABLE: u8 = 0x27;
pub const REPEAT_ENABLE: u8 = 0x28;
/// B7 blocks multitouch when set
pub const MULTITOUCH_CONFIG: u8 = 0x2A;
/// Touch thresholds of inputs 1-8
pub const INPUT_1_THRESHOLD: u8 = 0x30;
pub const CONFIGURATION2: u8 = 0x44;
pub const PRODUCT_ID: u8 = 0xFD;

// ============================================================================
// Bits and defaults
// ============================================================================
pub const MAIN_CONTROL_INT: u8 = 0;
pub const MULTITOUCH_BLOCK_BIT: u8 = 7;
pub const GENERAL_CONFIG_MAX_DUR_RECAL: u8 = 3;
pub const GENERAL_CONFIG_DIS_ANA_NOISE: u8 = 4;
pub const GENERAL_CONFIG_DIS_DIG_NOISE: u8 = 5;

pub const SENSITIVITY_OFFSET: u8 = 4;
pub const SENSITIVITY_SIZE: u8 = 3;
pub const TOUCH_RATE_SIZE: u8 = 4;

/// 1 sample per measure, 1.28ms sample time, 35ms cycle
pub const SAMPLING_CONFIG_DEFAULT: u8 = 0x08;
pub const GENERAL_CONFIG_DEFAULT: u8 = 0x38;
pub const CONFIGURATION2_DEFAULT: u8 = 0x60;

/// Resolution of the hold delay and repeat rate fields
pub const TOUCH_RATE_STEP_MS: u16 = 35;
pub const TOUCH_RATE_MAX_MS: u16 = 500;

/// Encode a sensitivity multiplier into the 3-bit field, `None` if it's not a power of two up to 128
pub fn sensitivity_field(multiplier: u8) -> Option<u8> {
    match multiplier {
        128 => Some(0x00),
        64 => Some(0x01),
        32 => Some(0x02),
        16 => Some(0x03),
        8 => Some(0x04),
        4 => Some(0x05),
        2 => Some(0x06),
        1 => Some(0x07),
        _ => None,
    }
}

/// Quantize a hold delay or repeat rate to the 4-bit field.
///
/// The value is clamped to 0..=500ms and rounded half up to the nearest 35ms step.
pub fn touch_rate_field(ms: u16) -> u8 {
    let ms = ms.min(TOUCH_RATE_MAX_MS);
    ((ms + TOUCH_RATE_STEP_MS / 2) / TOUCH_RATE_STEP_MS) as u8 & 0x0F
}
