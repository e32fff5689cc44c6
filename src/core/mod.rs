//! Core types shared across the handler.
//!
//! - [`error`] - the error taxonomy ([`HandlerError`]) and CLI error reporting

pub mod error;

pub use error::{ErrorContext, HandlerError, HandlerResult, user_friendly_error};
