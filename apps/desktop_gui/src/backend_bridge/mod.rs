//! Backend worker: owns the HTTP client and runs network and export work off
//! the UI thread.

pub mod commands;
pub mod runtime;
