//! Core domain types
//!
//! These types describe remote jobs and the workspace that scopes them. They are
//! owned by the remote service; the client only ever holds snapshots of them.

pub mod job;
pub mod workspace;
