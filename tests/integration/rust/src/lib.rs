//! Integration test suite for the Drake front end
//!
//! This crate provides integration tests that verify components work
//! together correctly across component boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use core_types;
    pub use drake_cli;
    pub use drake_parser;
}
