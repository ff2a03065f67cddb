//! Usage event tracking

pub mod ports;
