//! Account lifecycle: right-to-erasure and data portability

pub mod service;

pub use service::LifecycleService;
