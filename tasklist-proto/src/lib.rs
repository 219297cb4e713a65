//! Shared wire definitions for the tasklist REST contract.

pub mod response;
pub mod task;
