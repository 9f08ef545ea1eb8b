//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the compilation
//! process. It includes:
//!
//! - User diagnostics with source position information
//! - Internal errors for broken compiler invariants
//! - The diagnostics collector the analysis passes report into

pub mod diagnostics;
pub mod errors;
