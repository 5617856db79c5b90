//! `bizscore` library crate.
//!
//! The binary (`bizscore`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the scoring pipeline can be embedded by a service front-end
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
