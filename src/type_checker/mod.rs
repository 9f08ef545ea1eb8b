//! Type checking.
//!
//! Runs over a program whose identifiers are already linked to symbols.
//! Every expression gets a [`types::Type`]; rule violations are reported
//! to the context's diagnostics and the offending expression becomes
//! `Type::Error`, which silences every rule above it.

pub mod type_checker;
pub mod types;

#[cfg(test)]
mod tests;
