//! Error model.
//!
//! Two families reach [`RequestEngine::format_output`](crate::RequestEngine::format_output):
//!
//! - [`RouterError`]: the plumbing failed. Nothing matched, the path
//!   parameters could not be extracted, or a middleware refused to wrap.
//! - handler errors: whatever a handler phase returned, untouched.
//!
//! The engine adds no context to handler errors. Downcast them back to your
//! own type with [`Error::handler_error`] and `downcast_ref`.

use thiserror::Error;

use crate::params::ParamsError;

/// A type-erased error returned by handlers and middlewares.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The outcome error handed to the formatting call.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Handler(BoxError),
}

impl Error {
    /// The router-level error, if the plumbing failed.
    pub fn router_error(&self) -> Option<&RouterError> {
        match self {
            Self::Router(e) => Some(e),
            Self::Handler(_) => None,
        }
    }

    /// The error exactly as a handler phase returned it.
    pub fn handler_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Router(_) => None,
            Self::Handler(e) => Some(e.as_ref()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Router(RouterError::NotFound))
    }
}

/// Routing or plumbing failure. Displays only its fixed message; the cause
/// is available through [`details`](RouterError::details) and `source()`.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("Not found")]
    NotFound,

    #[error("Error extracting path params")]
    PathParams(#[source] ParamsError),

    #[error("Middleware execution error")]
    Middleware(#[source] BoxError),
}

impl RouterError {
    /// The fixed, short message for this kind.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotFound => "Not found",
            Self::PathParams(_) => "Error extracting path params",
            Self::Middleware(_) => "Middleware execution error",
        }
    }

    /// Free-text detail describing the underlying cause.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::NotFound => None,
            Self::PathParams(e) => Some(e.to_string()),
            Self::Middleware(e) => Some(e.to_string()),
        }
    }

    /// Stable label for the kind, suitable for metrics or log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::PathParams(_) => "path_params",
            Self::Middleware(_) => "middleware",
        }
    }
}
