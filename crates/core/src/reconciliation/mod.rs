//! Identity reconciliation batch job

pub mod ports;
pub mod service;

pub use ports::{OwnedRecordStore, OwnerRef};
pub use service::ReconciliationService;
