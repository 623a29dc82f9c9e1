//! POCSAG transmitter core: turns a stream of 32-bit protocol codewords
//! into either an I/Q sample file for SDR playback or real-time keying of
//! a transmitter through a serial port's control lines.

pub mod config;
pub mod error;
pub mod fsk;
pub mod pocsag;
pub mod serial;
pub mod tx;
pub mod ui;
pub mod utils;

pub use config::{ModulationParams, TxConfig};
pub use error::{TxError, TxResult};
