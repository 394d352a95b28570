//! Register access over a shared I2C bus.
//!
//! Both chips on the HAT expose byte-wide registers behind a fixed 7-bit address.
//! Serializing transactions between devices on the same bus is left to the `I2c`
//! implementation passed in, e.g. a shared-bus device from `embassy-embedded-hal`.

use embedded_hal_async::i2c::{I2c, SevenBitAddress};
use heapless::Vec;

use crate::error::Error;

/// Longest payload accepted by [`RegisterDevice::write_block`]
pub const MAX_BLOCK_LEN: usize = 8;

/// An I2C device with 8-bit register addressing
pub struct RegisterDevice<I2C> {
    i2c: I2C,
    address: SevenBitAddress,
}

impl<I2C: I2c> RegisterDevice<I2C> {
    pub fn new(i2c: I2C, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub async fn read_byte(&mut self, register: u8) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        self.read_block(register, &mut buf).await?;
        Ok(buf[0])
    }

    /// Read `buf.len()` consecutive registers starting at `register`
    pub async fn read_block(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error> {
        self.i2c
            .write_read(self.address, &[register], buf)
            .await
            .map_err(Error::bus)
    }

    pub async fn write_byte(&mut self, register: u8, value: u8) -> Result<(), Error> {
        self.i2c
            .write(self.address, &[register, value])
            .await
            .map_err(Error::bus)
    }

    /// Write `data` to consecutive registers starting at `register`
    pub async fn write_block(&mut self, register: u8, data: &[u8]) -> Result<(), Error> {
        if data.len() > MAX_BLOCK_LEN {
            return Err(Error::InvalidConfiguration);
        }
        let mut frame: Vec<u8, { MAX_BLOCK_LEN + 1 }> = Vec::new();
        // Capacity is checked above, so neither push can fail
        let _ = frame.push(register);
        let _ = frame.extend_from_slice(data);
        self.i2c.write(self.address, &frame).await.map_err(Error::bus)
    }

    pub async fn set_bit(&mut self, register: u8, bit: u8) -> Result<(), Error> {
        let value = self.read_byte(register).await?;
        self.write_byte(register, value | (1 << bit)).await
    }

    pub async fn clear_bit(&mut self, register: u8, bit: u8) -> Result<(), Error> {
        let value = self.read_byte(register).await?;
        self.write_byte(register, value & !(1 << bit)).await
    }

    pub async fn change_bit(&mut self, register: u8, bit: u8, state: bool) -> Result<(), Error> {
        if state {
            self.set_bit(register, bit).await
        } else {
            self.clear_bit(register, bit).await
        }
    }

    /// Replace `size` bits starting at `offset` with `bits`
    pub async fn change_bits(&mut self, register: u8, offset: u8, size: u8, bits: u8) -> Result<(), Error> {
        let mask = (((1u16 << size) - 1) as u8) << offset;
        let value = self.read_byte(register).await?;
        self.write_byte(register, (value & !mask) | ((bits << offset) & mask)).await
    }
}
