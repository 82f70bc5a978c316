//! Shared types for the Drake language front end.
//!
//! This crate provides the foundational types every other component uses:
//! source positions and the two front-end error kinds.
//!
//! # Overview
//!
//! - [`SourcePosition`] - Line, column and byte offset of a token
//! - [`LexError`] - Malformed character sequence
//! - [`ParseError`] - Token stream that matches no grammar alternative
//! - [`DrakeError`] - Either of the above
//!
//! # Examples
//!
//! ```
//! use core_types::{DrakeError, ErrorKind, ParseError, SourcePosition};
//!
//! let error: DrakeError = ParseError::expected(
//!     vec!["expression".to_string()],
//!     "')'",
//!     SourcePosition::new(1, 4, 3),
//! )
//! .into();
//!
//! assert_eq!(error.kind(), ErrorKind::ParseError);
//! assert_eq!(error.position().column, 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;

pub use error::{DrakeError, DrakeResult, ErrorKind, LexError, LexErrorKind, ParseError};
pub use source::SourcePosition;
