//! Tasklist task server library.
//!
//! Exposes the REST task service for use in tests and embedding.
//! The server keeps tasks in an ordered in-memory store and speaks the
//! JSON contract consumed by the `tasklist` client.

pub mod config;
pub mod server;
pub mod store;
