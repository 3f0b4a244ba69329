//! Error handling for frontmatter collections
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`CollectionError`]) for the failures callers
//!    branch on
//! 2. **User-friendly messages** ([`ErrorContext`]) with suggestions, for hosts
//!    that surface build errors to people
//!
//! # Fatal vs recoverable
//!
//! Every [`CollectionError`] is fatal for the operation that raised it: a
//! missing contract aborts the whole aggregate, a duplicate collection name
//! rejects the plugin options. Per-file problems are *not* represented here;
//! they are [`ParseFailure`](crate::collection::entry::ParseFailure)s recorded
//! in a compile report and never propagated.
//!
//! # Examples
//!
//! ```rust,no_run
//! use frontmatter_collection::core::{CollectionError, user_friendly_error};
//!
//! let error = CollectionError::MissingContract {
//!     collection: "posts".to_string(),
//! };
//! let context = user_friendly_error(anyhow::Error::from(error));
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Fatal errors raised while configuring or compiling collections.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// A collection declares neither a schema nor a parse function.
    ///
    /// Raised before any file is read; aborts the whole aggregate since the
    /// module body is all-or-nothing.
    #[error("Collection '{collection}' must declare a schema or a parse function")]
    MissingContract {
        /// Name of the offending collection
        collection: String,
    },

    /// Two collections share the same export name.
    #[error("Collection name '{name}' is declared more than once")]
    DuplicateCollection {
        /// The duplicated name
        name: String,
    },

    /// A collection name cannot be used as an exported binding.
    #[error("Collection name '{name}' is not a valid export identifier")]
    InvalidCollectionName {
        /// The rejected name
        name: String,
    },

    /// A declarative schema could not be built.
    #[error("Invalid schema for field '{field}': {reason}")]
    InvalidSchema {
        /// Dotted path of the field
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// The configuration file could not be parsed.
    #[error("Invalid configuration file syntax in {file}")]
    ConfigParse {
        /// Path to the configuration file
        file: String,
        /// Parser message
        reason: String,
    },

    /// Generic error for cases not covered above.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error context wrapper that carries a suggestion and details for display.
///
/// # Examples
///
/// ```rust,no_run
/// use frontmatter_collection::core::{CollectionError, ErrorContext};
///
/// let context = ErrorContext::new(CollectionError::DuplicateCollection {
///     name: "posts".to_string(),
/// })
/// .with_suggestion("Rename one of the collections");
///
/// let message = format!("{}", context);
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: CollectionError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: CollectionError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with an actionable suggestion.
///
/// Recognizes [`CollectionError`] anywhere in the chain, I/O errors and TOML
/// errors; everything else keeps its message and full cause chain as details.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(collection_error) = cause.downcast_ref::<CollectionError>() {
            return create_error_context(collection_error.clone());
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        let context = ErrorContext::new(CollectionError::Other {
            message: error.to_string(),
        });
        return match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => context
                .with_suggestion("Check the file permissions of the content directory")
                .with_details("A content or declaration file could not be accessed"),
            std::io::ErrorKind::NotFound => context
                .with_suggestion("Check that the path exists relative to the project root"),
            _ => context,
        };
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(CollectionError::ConfigParse {
            file: crate::constants::DEFAULT_CONFIG_FILE.to_string(),
            reason: toml_error.message().to_string(),
        })
        .with_suggestion("Check the TOML syntax of the collection configuration");
    }

    let details = error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>();
    let context = ErrorContext::new(CollectionError::Other {
        message: error.to_string(),
    });
    if details.is_empty() {
        context
    } else {
        context.with_details(details.join("\n"))
    }
}

fn create_error_context(error: CollectionError) -> ErrorContext {
    match &error {
        CollectionError::MissingContract { collection } => {
            let suggestion = format!(
                "Add a `schema` table to collection '{collection}' or register a parse function"
            );
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Entries cannot be validated without a schema or parse function")
        }
        CollectionError::DuplicateCollection { .. } => ErrorContext::new(error)
            .with_suggestion("Give every collection a unique name")
            .with_details("Each collection becomes one named export of the virtual module"),
        CollectionError::InvalidCollectionName { .. } => ErrorContext::new(error)
            .with_suggestion("Use letters, digits, `_` or `$`, not starting with a digit"),
        CollectionError::InvalidSchema { .. } => ErrorContext::new(error).with_suggestion(
            "Supported types: string, number, integer, boolean, date, any, object, arrays (`string[]`)",
        ),
        CollectionError::ConfigParse { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Check the TOML syntax of the collection configuration")
        }
        CollectionError::Other { .. } => ErrorContext::new(error),
    }
}
