//! nuv runner library
//!
//! This module exports the internal components of the runner for testing purposes.

pub mod config;
pub mod script;
