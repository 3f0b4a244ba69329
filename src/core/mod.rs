//! Core error types shared by every module.
//!
//! - [`CollectionError`] enumerates the fatal configuration and compile errors
//! - [`ErrorContext`] and [`user_friendly_error`] turn any error into a message
//!   with details and a suggestion for display by the host

pub mod error;

pub use error::{CollectionError, ErrorContext, user_friendly_error};
