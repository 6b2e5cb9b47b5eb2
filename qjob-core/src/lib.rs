//! qjob Core
//!
//! Core types shared by the qjob client and CLI.
//!
//! This crate contains:
//! - Domain types: jobs, job status, workspace identity
//! - DTOs: wire shapes exchanged with the remote job and storage APIs

pub mod domain;
pub mod dto;
