#![no_std]

#[cfg(test)]
extern crate std;

#[macro_use]
mod log;

mod error;

pub mod config;
pub mod device;
pub mod interface;
pub mod params;
pub mod poll;
pub mod registers;
pub mod scaling;

pub use crate::device::Ltc2500;
pub use crate::error::{Error, Result};
