//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the learning core and implemented by adapters:
//! snapshot storage and training observation.

pub mod observer;
pub mod repository;

pub use observer::Observer;
pub use repository::TableRepository;
