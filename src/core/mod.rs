//! Core library components.
//!
//! Configuration assembly, descriptor handling, secret resolution and the
//! deployment pipeline. Nothing in here prints to the terminal.

pub mod config;
pub mod constants;
pub mod deploy;
pub mod descriptor;
pub mod runner;
pub mod secrets;
