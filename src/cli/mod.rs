//! Command-line interface for feedbackkit
//!
//! - `args`: clap definitions
//! - `run`: entry point and dispatch
//! - `commands`: `submit` and `config`

pub mod args;
mod commands;
mod run;

pub use args::{Cli, Commands, SubmitArgs};
pub use run::run;
