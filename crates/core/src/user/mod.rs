//! User record management

pub mod ports;
pub mod service;

pub use service::{NewUser, UserService};
