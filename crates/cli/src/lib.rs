//! Command-line front end for the enrollment sniper.

pub mod auth;
pub mod browser;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
