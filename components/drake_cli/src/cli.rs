//! Command line arguments

use clap::{ArgGroup, Parser, ValueEnum};

/// Artefact produced by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// The token stream
    Tokens,
    /// The parsed program
    Ast,
}

/// How the artefact is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Rust debug formatting
    Debug,
    /// Pretty-printed JSON
    Json,
}

/// Drake front end
#[derive(Parser, Debug)]
#[command(name = "drake", version, about = "Lex and parse Drake source code")]
#[command(group(ArgGroup::new("input").required(true).args(["file", "eval"])))]
pub struct Cli {
    /// Source file to parse
    #[arg(short, long)]
    pub file: Option<String>,

    /// Inline source code to parse
    #[arg(short, long)]
    pub eval: Option<String>,

    /// What to print
    #[arg(long, value_enum, default_value_t = Emit::Ast)]
    pub emit: Emit,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Debug)]
    pub format: Format,

    /// Write the output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Log parser milestones to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Arguments for parsing a file with default settings
    pub fn with_file(path: impl Into<String>) -> Self {
        Self {
            file: Some(path.into()),
            ..Self::defaults()
        }
    }

    /// Arguments for parsing inline code with default settings
    pub fn with_eval(code: impl Into<String>) -> Self {
        Self {
            eval: Some(code.into()),
            ..Self::defaults()
        }
    }

    fn defaults() -> Self {
        Self {
            file: None,
            eval: None,
            emit: Emit::Ast,
            format: Format::Debug,
            output: None,
            verbose: false,
        }
    }
}
