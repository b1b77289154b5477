//! Domain utility modules

pub mod timezone;
