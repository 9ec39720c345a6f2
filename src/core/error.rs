//! Error handling for tile-harness
//!
//! Library operations return [`HarnessError`], a small kind enum whose variants
//! carry the structured context needed to render the same diagnostics the
//! staging harness has always produced. The binary wraps these in
//! [`ErrorContext`] to add suggestions before printing.
//!
//! # Error Categories
//!
//! - **Configuration**: [`HarnessError::Configuration`] - missing environment
//!   variables or product config fields, raised at construction time
//! - **I/O**: [`HarnessError::Io`] - reading or parsing an on-disk document
//! - **External tool**: [`HarnessError::ExternalTool`] - `om` or `bosh` failed
//! - **Protocol**: [`HarnessError::Protocol`] - a malformed response or an
//!   error list reported by Ops Manager
//! - **Not found**: [`HarnessError::NotFound`] - the product is not staged,
//!   [`HarnessError::ManifestEntryNotFound`] - a manifest lacks a group or job
//!
//! # Examples
//!
//! ```rust,no_run
//! use tile_harness::core::{HarnessError, user_friendly_error};
//!
//! let err = HarnessError::configuration("Environment variable OM_URL must be set");
//! let ctx = user_friendly_error(anyhow::Error::from(err));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::runner::RunError;

/// Boxed source error used by the I/O variant.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for tile-harness operations.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A required environment variable or product config field is missing.
    #[error("{message}")]
    Configuration {
        /// Names the first missing requirement
        message: String,
    },

    /// Reading or parsing a file failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted, including the product name
        context: String,
        /// Underlying read or parse failure
        #[source]
        source: BoxError,
    },

    /// An external command exited unsuccessfully or could not be spawned.
    #[error("{context}: {reason}: {stderr}")]
    ExternalTool {
        /// What was being attempted
        context: String,
        /// Exit status or spawn failure
        reason: String,
        /// Captured error stream
        stderr: String,
    },

    /// A response could not be parsed, or carried an error message.
    #[error("{context}: {message}")]
    Protocol {
        /// What was being attempted
        context: String,
        /// Parser message or first reported error
        message: String,
    },

    /// The configured product is not among the staged products.
    #[error("Product {product:?} has not been staged. Staged products: {:?}", .staged.join(", "))]
    NotFound {
        /// Configured product name
        product: String,
        /// Product types that were staged
        staged: Vec<String>,
    },

    /// A manifest lacks the requested instance group or job.
    #[error("{entry} not found in manifest")]
    ManifestEntryNotFound {
        /// The missing entry, e.g. `Instance group "redis"`
        entry: String,
    },
}

impl HarnessError {
    /// Builds a [`HarnessError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Builds a [`HarnessError::Io`] from any error source.
    pub fn io(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Io {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Builds a [`HarnessError::ExternalTool`] from a failed invocation.
    pub fn external_tool(context: impl Into<String>, err: RunError) -> Self {
        Self::ExternalTool {
            context: context.into(),
            reason: err.reason,
            stderr: err.stderr,
        }
    }

    /// Builds a [`HarnessError::Protocol`].
    pub fn protocol(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Protocol {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

/// Error wrapper carrying a suggestion and details for terminal display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: anyhow::Error,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wraps an error without any suggestion or details.
    #[must_use]
    pub const fn new(error: anyhow::Error) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Adds a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Adds details about why the error occurred.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Renders the error chain once.
    ///
    /// [`HarnessError`] variants already embed their cause in `Display`, so
    /// only foreign errors get the full `{:#}` chain.
    fn message(&self) -> String {
        if self.error.downcast_ref::<HarnessError>().is_some() {
            self.error.to_string()
        } else {
            format!("{:#}", self.error)
        }
    }

    /// Prints the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message());

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
        write!(f, "{}", self.message())?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Converts any error into an [`ErrorContext`] with a suggestion where one applies.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let Some(harness_error) = error.downcast_ref::<HarnessError>() else {
        return ErrorContext::new(error);
    };

    let (suggestion, details) = match harness_error {
        HarnessError::Configuration { message } if message.starts_with("Environment variable") => (
            "Export OM_USERNAME, OM_PASSWORD and OM_URL for the target Ops Manager",
            Some("The om CLI reads credentials from these variables"),
        ),
        HarnessError::Configuration { .. } => (
            "Pass --name, --product-version, --properties-file and --network-config-file, or a --config file",
            None,
        ),
        HarnessError::Io { .. } => (
            "Check that the properties and network config files exist and contain valid JSON",
            None,
        ),
        HarnessError::ExternalTool { .. } => (
            "Run with --verbose to see the executed command, then retry it manually",
            Some("Staged changes are not rolled back when a later step fails"),
        ),
        HarnessError::Protocol { .. } => (
            "Check the Ops Manager API response; the target may be running an unsupported version",
            None,
        ),
        HarnessError::NotFound { .. } => (
            "Run the configure command first, or check the product name against the staged types",
            None,
        ),
        HarnessError::ManifestEntryNotFound { .. } => (
            "Check the instance group and job names against the rendered manifest",
            None,
        ),
    };

    let mut ctx = ErrorContext::new(error).with_suggestion(suggestion);
    if let Some(details) = details {
        ctx = ctx.with_details(details);
    }
    ctx
}
