//! Error handling for the documentation handler
//!
//! This module provides the error taxonomy shared by every stage of the handler
//! and the user-friendly reporting used by the command-line front end. The
//! error system follows two principles:
//! 1. **Strongly-typed errors** so hosts can tell configuration problems apart
//!    from collection problems and decide whether to abort one directive or the
//!    whole build
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Configuration**: [`HandlerError::Config`], [`HandlerError::ConfigFile`] -
//!   malformed or unrecognized option values, unreadable config files
//! - **Collection**: [`HandlerError::Collection`] - identifier not found, module
//!   import failure, alias resolution failure on the requested object
//! - **Aliases**: [`HandlerError::AliasResolution`], [`HandlerError::CyclicAlias`] -
//!   raised by the object tree, recovered locally by member filtering
//! - **Rendering**: [`HandlerError::Template`]
//! - **Inventories**: [`HandlerError::Inventory`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use pydocs_handler::core::{HandlerError, user_friendly_error};
//!
//! let error = HandlerError::Collection {
//!     identifier: "package.missing".to_string(),
//!     message: "package.missing could not be found".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for handler operations.
///
/// Configuration and collection errors are the two categories a host build
/// tool is expected to catch: both abort the rendering of a single
/// documentation entry. Alias errors are internal to the object tree and are
/// either swallowed (member filtering) or converted into
/// [`HandlerError::Collection`] when they affect the requested object.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandlerError {
    /// A known option received a value with an unparseable shape.
    ///
    /// Unknown options never produce this error: they are bucketed as extra
    /// options instead.
    #[error("Invalid options: option '{option}': {message}")]
    Config {
        /// Name of the offending option
        option: String,
        /// What was wrong with the value
        message: String,
    },

    /// A configuration file could not be read or parsed
    #[error("Invalid configuration file {file}: {reason}")]
    ConfigFile {
        /// Path of the configuration file
        file: String,
        /// Specific reason for the failure
        reason: String,
    },

    /// The requested object could not be collected
    #[error("Could not collect '{identifier}': {message}")]
    Collection {
        /// The identifier requested by the documentation directive
        identifier: String,
        /// Reason for the failure
        message: String,
    },

    /// An alias points to an object that is not present in the collection
    #[error("Could not resolve alias {path} pointing at {target}")]
    AliasResolution {
        /// Path of the alias
        path: String,
        /// Path the alias points to
        target: String,
    },

    /// Following an alias chain came back to an alias already visited
    #[error("Cyclic aliases detected: {}", chain.join(" -> "))]
    CyclicAlias {
        /// Path of the alias where resolution started
        path: String,
        /// Paths visited before the cycle closed
        chain: Vec<String>,
    },

    /// Template lookup or rendering failed
    #[error("Template error in '{template}': {message}")]
    Template {
        /// Template name
        template: String,
        /// Cleaned-up Tera message
        message: String,
    },

    /// An inventory could not be fetched or parsed
    #[error("Invalid inventory {url}: {reason}")]
    Inventory {
        /// URL (or file path) of the inventory
        url: String,
        /// Specific reason for the failure
        reason: String,
    },

    /// File system operation failed
    #[error("File system error during {operation}: {path}")]
    Io {
        /// The operation being performed
        operation: String,
        /// The path involved
        path: String,
        /// Error reported by the operating system
        message: String,
    },

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// The error message
        message: String,
    },
}

impl HandlerError {
    /// Build a configuration error for `option`.
    pub fn config(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Build a collection error for `identifier`.
    pub fn collection(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collection {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Whether this error is one of the alias-resolution failures.
    #[must_use]
    pub const fn is_alias_error(&self) -> bool {
        matches!(self, Self::AliasResolution { .. } | Self::CyclicAlias { .. })
    }
}

/// Result alias used by the library.
pub type HandlerResult<T> = std::result::Result<T, HandlerError>;

/// Error wrapper carrying a suggestion and extra details for display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying handler error
    pub error: HandlerError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: HandlerError) -> Self {
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

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
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

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`HandlerError`] variants, I/O errors and parse errors of the
/// supported configuration formats. Anything else is reported with its full
/// error chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(handler_error) = error.downcast_ref::<HandlerError>() {
        return create_error_context(handler_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        let context = ErrorContext::new(HandlerError::Io {
            operation: "file access".to_string(),
            path: "unknown".to_string(),
            message: io_error.to_string(),
        });
        return match io_error.kind() {
            std::io::ErrorKind::NotFound => context
                .with_suggestion("Check that the file or directory exists and the path is correct"),
            std::io::ErrorKind::PermissionDenied => {
                context.with_suggestion("Check the file permissions and ownership")
            }
            _ => context,
        };
    }

    if let Some(yaml_error) = error.downcast_ref::<serde_yaml::Error>() {
        return ErrorContext::new(HandlerError::ConfigFile {
            file: "configuration".to_string(),
            reason: yaml_error.to_string(),
        })
        .with_suggestion("Check the YAML syntax: indentation, colons and list markers");
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(HandlerError::ConfigFile {
            file: "configuration".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and table headers");
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(HandlerError::Other {
        message,
    })
}

fn create_error_context(error: HandlerError) -> ErrorContext {
    match &error {
        HandlerError::Config { option, .. } => {
            let suggestion = format!(
                "Check the value of '{option}' in the handler options (global `options` or the directive's local options)"
            );
            ErrorContext::new(error).with_suggestion(suggestion).with_details(
                "Known options are validated strictly; unknown options are passed through as extra options",
            )
        }
        HandlerError::ConfigFile { .. } => ErrorContext::new(error).with_suggestion(
            "Fix the syntax of the configuration file or point --config at another file",
        ),
        HandlerError::Collection { .. } => ErrorContext::new(error)
            .with_suggestion(
                "Check the identifier spelling and that the module dump is present in one of the configured `paths`",
            )
            .with_details(
                "Identifiers are dotted paths starting with a top-level module name, e.g. 'package.module.Class'",
            ),
        HandlerError::AliasResolution { .. } | HandlerError::CyclicAlias { .. } => {
            ErrorContext::new(error).with_suggestion(
                "Set `load_external_modules: true` or add the target module to `preload_modules`",
            )
        }
        HandlerError::Template { .. } => ErrorContext::new(error)
            .with_suggestion(
                "Check template syntax: variables use {{ var }}, comments use {# #}, control flow uses {% %}",
            )
            .with_details(
                "Templates under `<custom_templates>/python/` override the bundled ones by file name, e.g. 'class.html'",
            ),
        HandlerError::Inventory { .. } => ErrorContext::new(error).with_suggestion(
            "Check the inventory URL and that it points to a Sphinx `objects.inv` (version 2) file",
        ),
        HandlerError::Io { .. } | HandlerError::Other { .. } => ErrorContext::new(error),
    }
}
