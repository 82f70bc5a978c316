//! Driver orchestration
//!
//! The Driver runs the front end over one source text and renders the
//! requested artefact:
//! - Lexer for `--emit tokens`
//! - Parser for `--emit ast`
//! - Debug or JSON formatting of the result

use crate::cli::{Cli, Emit, Format};
use crate::error::{CliError, CliResult};
use drake_parser::{tokenize, Parser, SpannedToken};
use log::debug;
use std::fmt::Write;

/// Name reported in diagnostics for `--eval` input
pub const EVAL_SOURCE_NAME: &str = "<eval>";

/// Source text together with the name diagnostics refer to it by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInput {
    /// File path, or [`EVAL_SOURCE_NAME`] for inline code
    pub name: String,
    /// The source text
    pub text: String,
}

impl SourceInput {
    /// Load the source selected by `--file` or `--eval`
    ///
    /// # Errors
    /// Returns `CliError::Io` if the file cannot be read
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        if let Some(code) = &cli.eval {
            return Ok(Self::inline(code.clone()));
        }
        let path = cli.file.as_deref().unwrap_or_default();
        Self::read(path)
    }

    /// Read a source file
    pub fn read(path: &str) -> CliResult<Self> {
        let text = std::fs::read_to_string(path)?;
        debug!("read {} bytes from {}", text.len(), path);
        Ok(Self {
            name: path.to_string(),
            text,
        })
    }

    /// Wrap inline code
    pub fn inline(text: impl Into<String>) -> Self {
        Self {
            name: EVAL_SOURCE_NAME.to_string(),
            text: text.into(),
        }
    }
}

/// Runs the front end and renders its output
#[derive(Debug, Clone, Copy)]
pub struct Driver {
    emit: Emit,
    format: Format,
}

impl Driver {
    /// Create a driver
    ///
    /// # Example
    /// ```
    /// use drake_cli::{Driver, Emit, Format};
    ///
    /// let driver = Driver::new(Emit::Ast, Format::Json);
    /// let json = driver.render("x = 1").unwrap();
    /// assert!(json.contains("Assignment"));
    /// ```
    pub fn new(emit: Emit, format: Format) -> Self {
        Self { emit, format }
    }

    /// Create a driver configured from the command line
    pub fn from_cli(cli: &Cli) -> Self {
        Self::new(cli.emit, cli.format)
    }

    /// What the driver produces
    pub fn emit(&self) -> Emit {
        self.emit
    }

    /// How the driver formats its output
    pub fn format(&self) -> Format {
        self.format
    }

    /// Lex or parse `source` and render the artefact
    ///
    /// # Errors
    /// Returns `CliError::Drake` if the source is malformed, or
    /// `CliError::Json` if serialization fails
    pub fn render(&self, source: &str) -> CliResult<String> {
        match self.emit {
            Emit::Tokens => {
                let tokens = tokenize(source).map_err(|e| CliError::Drake(e.into()))?;
                debug!("emitting {} tokens", tokens.len());
                match self.format {
                    Format::Debug => Ok(render_token_lines(&tokens)),
                    Format::Json => Ok(serde_json::to_string_pretty(&tokens)?),
                }
            }
            Emit::Ast => {
                let mut parser = Parser::new(source).map_err(|e| CliError::Drake(e.into()))?;
                let program = parser
                    .parse_program()
                    .map_err(|e| CliError::Drake(e.into()))?;
                debug!("emitting {} expressions", program.body.len());
                match self.format {
                    Format::Debug => Ok(format!("{:#?}", program)),
                    Format::Json => Ok(serde_json::to_string_pretty(&program)?),
                }
            }
        }
    }

    /// Write rendered output to `path`, or to stdout when there is none
    pub fn write_output(&self, rendered: &str, path: Option<&str>) -> CliResult<()> {
        match path {
            Some(path) => {
                std::fs::write(path, format!("{}\n", rendered))?;
                debug!("wrote output to {}", path);
            }
            None => println!("{}", rendered),
        }
        Ok(())
    }
}

/// One `line:column  description` line per token
fn render_token_lines(tokens: &[SpannedToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        let position = token.position.to_string();
        let _ = writeln!(out, "{:<8}{}", position, token.token.describe());
    }
    out.truncate(out.trim_end().len());
    out
}
