//! MPQ4210/MPQ4214 Rust Driver
//!
//! `no_std` register-level driver for the MPS MPQ421x buck-boost controllers over I2C.
//! Every control field is a typed read-modify-write; the reference update sequences
//! ENPWR, the reference DAC, GO_BIT and a settle delay supplied through `DelayNs`.
//! Optional `async` support mirrors the blocking API, and `defmt` adds logging.

#![no_std]

pub mod data_types;
pub mod driver;
pub mod error;
pub mod registers;

pub use data_types::{Config, CurrentLimit, FeedbackDivider, Interrupt, ReferenceTarget, Variant};
pub use driver::Mpq421x;
pub use error::Error;
pub use registers::DEFAULT_I2C_ADDRESS;
