//! Shared infrastructure

pub mod error;
pub mod tsid;
