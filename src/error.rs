//! Error types for jsonshape
//!
//! Parse-time errors are fatal for the document being read and carry the
//! canonical path at which they were raised. Detector declines are not
//! errors.

use thiserror::Error;

use crate::path::encode_path;

/// The main error type for jsonshape
#[derive(Error, Debug)]
pub enum Error {
    /// The token stream ended in the middle of a value.
    #[error("unexpected end of input at {path}")]
    UnexpectedEnd { path: String },

    /// Mismatched delimiter, non-string object key, invalid literal.
    #[error("malformed JSON at {path}: {message}")]
    Malformed { path: String, message: String },

    /// The underlying byte source failed.
    #[error("i/o error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An ill-formed CLI path expression.
    #[error("invalid path expression {expr:?}: {message}")]
    PathParse { expr: String, message: String },
}

impl Error {
    /// Attach the canonical form of `path` to a stream-level error.
    pub(crate) fn from_stream(err: StreamError, path: &[String]) -> Self {
        let path = encode_path(path);
        match err {
            StreamError::UnexpectedEnd => Error::UnexpectedEnd { path },
            StreamError::Syntax(message) => Error::Malformed { path, message },
            StreamError::Io(source) => Error::Io { path, source },
        }
    }

    pub(crate) fn malformed(path: &[String], message: impl Into<String>) -> Self {
        Error::Malformed {
            path: encode_path(path),
            message: message.into(),
        }
    }

    pub(crate) fn path_parse(expr: impl Into<String>, message: impl Into<String>) -> Self {
        Error::PathParse {
            expr: expr.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by a [`TokenStream`](crate::stream::TokenStream) before the
/// parser can attach a path to them.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("{0}")]
    Syntax(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for jsonshape
pub type Result<T> = std::result::Result<T, Error>;
