//! Find and terminate CI instances that outlived their welcome.
//!
//! A run asks the [`inventory::Inventory`] for every instance carrying the CI
//! workload tag, keeps those older than the threshold that are not already
//! terminated ([`classifier`]), and either logs them (dry run) or terminates
//! them ([`terminator`]). [`run::run`] wires the two together.

pub mod aws_config;
pub mod classifier;
pub mod cli;
pub mod ec2;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod run;
pub mod terminator;

pub use error::{CleanerError, Result};
