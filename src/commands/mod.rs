//! Entry points behind the CLI subcommands.

mod check;
pub mod config;
mod generate;

pub use check::check;
pub use generate::{DEFAULT_VERSION, GenerateOptions, generate};
