#![allow(dead_code)]

use embedded_hal_mock::eh1::i2c::Transaction;
use explorer_hat::cap1xxx::registers::*;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub const THRESHOLD: u8 = 40;

pub fn read(register: u8, value: u8) -> Transaction {
    Transaction::write_read(ADDRESS, vec![register], vec![value])
}

pub fn write(register: u8, value: u8) -> Transaction {
    Transaction::write(ADDRESS, vec![register, value])
}

/// Register traffic of `Cap1xxx::init` with the default config
pub fn init_transactions() -> Vec<Transaction> {
    vec![
        write(INPUT_ENABLE, 0xFF),
        write(INTERRUPT_ENABLE, 0xFF),
        write(REPEAT_ENABLE, 0x00),
        read(MULTITOUCH_CONFIG, 0x00),
        write(MULTITOUCH_CONFIG, 0x00),
        read(INPUT_CONFIG2, 0x00),
        write(INPUT_CONFIG2, 0x06),
        read(INPUT_CONFIG, 0x00),
        write(INPUT_CONFIG, 0x06),
        write(SAMPLING_CONFIG, 0x08),
        write(SENSITIVITY, 0x60),
        write(GENERAL_CONFIG, 0x38),
        write(CONFIGURATION2, 0x60),
    ]
}

/// Input status, thresholds and deltas of one poll
pub fn snapshot_transactions(touched: u8, delta: [u8; NUM_INPUTS]) -> Vec<Transaction> {
    vec![
        read(INPUT_STATUS, touched),
        Transaction::write_read(ADDRESS, vec![INPUT_1_THRESHOLD], vec![THRESHOLD; NUM_INPUTS]),
        Transaction::write_read(ADDRESS, vec![INPUT_1_DELTA], delta.to_vec()),
    ]
}

/// Read-modify-write clearing the interrupt latch
pub fn clear_interrupt_transactions() -> Vec<Transaction> {
    vec![read(MAIN_CONTROL, 0x01), write(MAIN_CONTROL, 0x00)]
}

/// A full dispatch tick with the interrupt read from the main control register
pub fn pending_poll_transactions(touched: u8, delta: [u8; NUM_INPUTS]) -> Vec<Transaction> {
    let mut transactions = vec![read(MAIN_CONTROL, 0x01)];
    transactions.extend(snapshot_transactions(touched, delta));
    transactions.extend(clear_interrupt_transactions());
    transactions
}

/// Deltas with `value` on channel 0 only
pub fn channel0(value: u8) -> [u8; NUM_INPUTS] {
    let mut delta = [0; NUM_INPUTS];
    delta[0] = value;
    delta
}
