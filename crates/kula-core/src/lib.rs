//! Core config, errors, and secret resolution for Kula.

pub mod config;
pub mod error;
