//! Adapters implementing domain ports.
//!
//! Storage implementations of the [`TableRepository`](crate::ports::TableRepository)
//! port: MessagePack files for real runs, an in-memory map for tests.

pub mod in_memory_repository;
pub mod msgpack_repository;

pub use in_memory_repository::InMemoryRepository;
pub use msgpack_repository::MsgPackRepository;
