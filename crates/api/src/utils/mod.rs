//! Command-layer utilities

pub mod logging;
