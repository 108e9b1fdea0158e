//! CSA CLI library.
//!
//! Session controller for the Contract Summary Approval generator: upload a
//! contract, extract its fields, review them, and generate the filled form.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod generator;
pub mod output;
pub mod repl;
pub mod session;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use generator::{GeneratedForm, Generator};
pub use output::Formatter;
pub use session::{Session, Stage};
