//! Combo request failures and their HTTP classification

use hyper::StatusCode;
use std::io;
use thiserror::Error;

/// Every way a combo request can fail before a body is sent
#[derive(Debug, Error)]
pub enum ComboError {
    /// Method other than GET or HEAD
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Path does not match the configured URL path, or the query is empty
    #[error("not found")]
    NotFound,

    /// A requested name is missing from the store or is a directory
    #[error("file not found: {0:?}")]
    FileNotFound(String),

    /// A name could not be percent-decoded
    #[error("malformed file name")]
    BadRequest,

    /// The same decoded name was requested more than once
    #[error("repeated file name")]
    DuplicateName,

    /// More names than the configured maximum
    #[error("too many files: {0}")]
    TooManyFiles(usize),

    /// Unexpected store or I/O failure
    #[error("store error: {0}")]
    Internal(#[from] io::Error),
}

impl ComboError {
    /// HTTP status sent to the client
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed
            | Self::BadRequest
            | Self::DuplicateName
            | Self::TooManyFiles(_) => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::FileNotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text message sent to the client
    ///
    /// Never includes details of `Internal` errors.
    pub fn public_message(&self) -> String {
        match self {
            Self::MethodNotAllowed => "Bad request method".to_string(),
            Self::NotFound => "404 page not found".to_string(),
            Self::FileNotFound(name) => format!("File not found: {name:?}"),
            Self::BadRequest => "Bad request".to_string(),
            Self::DuplicateName => "Request contains repeated name(s)".to_string(),
            Self::TooManyFiles(count) => format!("Too many files: {count}"),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ComboError::MethodNotAllowed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ComboError::DuplicateName.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ComboError::TooManyFiles(3).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ComboError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ComboError::FileNotFound("a.css".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ComboError::Internal(io::Error::other("disk")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = ComboError::Internal(io::Error::other("/secret/path: EIO"));
        assert_eq!(err.public_message(), "Internal server error");
        assert!(err.to_string().contains("/secret/path"));
    }

    #[test]
    fn test_messages_name_the_input() {
        assert_eq!(ComboError::TooManyFiles(3).public_message(), "Too many files: 3");
        assert_eq!(
            ComboError::FileNotFound("missing.css".into()).public_message(),
            "File not found: \"missing.css\""
        );
    }
}
