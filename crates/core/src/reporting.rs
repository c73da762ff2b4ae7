//! Error tracker seam.
//!
//! Services report conditions that are swallowed or returned to callers but
//! still deserve operator attention (failed gateway lookups, mutations whose
//! preconditions did not hold).

use log::error;

use crate::errors::Error;

pub trait ErrorReporter: Send + Sync {
    fn capture_message(&self, message: &str);
    fn capture_error(&self, error: &Error);
}

/// Emits reports on the `error_tracker` log target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorReporter;

impl ErrorReporter for LogErrorReporter {
    fn capture_message(&self, message: &str) {
        error!(target: "error_tracker", "{}", message);
    }

    fn capture_error(&self, error: &Error) {
        error!(target: "error_tracker", "{}", error);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpErrorReporter;

impl ErrorReporter for NoOpErrorReporter {
    fn capture_message(&self, _message: &str) {}

    fn capture_error(&self, _error: &Error) {}
}
