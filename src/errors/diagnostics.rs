use log::debug;

use crate::Position;

use super::errors::{Error, ErrorImpl};

/// Collects diagnostics in the order passes report them.
///
/// Passes only ever append here; whether analysis continues never depends
/// on what has been collected so far.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics { errors: vec![] }
    }

    pub fn report(&mut self, error: ErrorImpl, position: Position) {
        let error = Error::new(error, position);
        debug!("diagnostic: {}", error);
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Drains the collected diagnostics.
    pub fn take(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.errors)
    }

    /// `line:column message` for every diagnostic, in report order.
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|error| format!("{} {}", error.get_position(), error.get_message()))
            .collect()
    }
}
