//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Error types and result types
//! - Table diagnostics
//! - quick-xml attribute and text helpers
//! - Whitespace normalization

pub mod diagnostics;
pub mod error;
pub mod text;
pub mod xml;

// Re-export commonly used items
pub use diagnostics::{check_tables, format_diagnostics, CheckResult, Diagnostic, DiagnosticLevel};
pub use error::{
    ConversionError, ConversionOutput, ConversionResult, ConversionWarning, StructuralError,
};
