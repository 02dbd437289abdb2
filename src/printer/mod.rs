//! # Printer Module
//!
//! Printer hardware profiles.
//!
//! ## Modules
//!
//! - [`config`]: Paper width, column counts and image fragment limits

pub mod config;

pub use config::PrinterProfile;
