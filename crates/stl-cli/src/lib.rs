//! Command-line front end over the mesh analysis, cost calculator and
//! session store crates. The `stl-tools` binary is a thin wrapper around
//! [`run`].

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Cli, Command};
pub use commands::run;
pub use error::CliError;
