//! Data Transfer Objects for the remote APIs
//!
//! Lightweight request and response bodies that only exist on the wire.

pub mod job;
pub mod storage;
