//! Drake CLI Library
//!
//! Provides the Driver and supporting modules for the `drake` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod logger;

pub use cli::{Cli, Emit, Format};
pub use diagnostics::DiagnosticPrinter;
pub use driver::{Driver, SourceInput, EVAL_SOURCE_NAME};
pub use error::{CliError, CliResult};
