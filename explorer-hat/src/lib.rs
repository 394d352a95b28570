#![doc = include_str!("../../README.md")]
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod ads1015;
pub mod bus;
pub mod cap1xxx;
pub mod config;
pub mod error;
pub mod hat;

pub use ads1015::Ads1015;
pub use cap1xxx::{AlertPin, Cap1xxx, Channel, ControlRegister, EventKind, TouchEvent, TouchHandler, WatchControl};
pub use config::{AdcConfig, TouchConfig};
pub use error::Error;
