//! Error types for entity API
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

use sea_orm::error::DbErr;

/// Errors while executing operations related to entities.
/// The intent is to categorize errors into two major types:
///  * Errors related to data. Ex DbErr::RecordNotFound
///  * Errors related to interactions with the database itself. Ex DbErr::Conn
#[derive(Debug, PartialEq)]
pub struct Error {
    // Underlying error emitted from seaORM internals
    pub source: Option<DbErr>,
    // Enum representing which category of error
    pub error_kind: EntityApiErrorKind,
}

#[derive(Debug, PartialEq, Serialize)]
pub enum EntityApiErrorKind {
    // Invalid search term
    InvalidQueryTerm,
    // Record not found
    RecordNotFound,
    // Record not updated
    RecordNotUpdated,
    // Record could not be authenticated
    RecordUnauthenticated,
    // Could not reach the database, pool exhausted, or operation timed out
    ConnectionError,
    // Row data could not be decoded into the entity model
    DecodeError,
    // Other errors
    Other,
}

impl Error {
    /// An operation exceeded its deadline. Surfaced as a connection-category
    /// error so callers treat it like any other database outage.
    pub(crate) fn timed_out() -> Self {
        Error {
            source: None,
            error_kind: EntityApiErrorKind::ConnectionError,
        }
    }

    pub(crate) fn record_not_found() -> Self {
        Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Entity API Error: {:?}", self)
    }
}

impl StdError for Error {}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(_) => Error {
                source: Some(err),
                error_kind: EntityApiErrorKind::RecordNotFound,
            },
            DbErr::RecordNotUpdated => Error {
                source: Some(err),
                error_kind: EntityApiErrorKind::RecordNotUpdated,
            },
            DbErr::ConnectionAcquire(_) => Error {
                source: Some(err),
                error_kind: EntityApiErrorKind::ConnectionError,
            },
            DbErr::Conn(_) => Error {
                source: Some(err),
                error_kind: EntityApiErrorKind::ConnectionError,
            },
            DbErr::TryIntoErr { .. } => Error {
                source: Some(err),
                error_kind: EntityApiErrorKind::DecodeError,
            },
            DbErr::Type(_) => Error {
                source: Some(err),
                error_kind: EntityApiErrorKind::DecodeError,
            },
            DbErr::Json(_) => Error {
                source: Some(err),
                error_kind: EntityApiErrorKind::DecodeError,
            },
            _ => Error {
                source: Some(err),
                error_kind: EntityApiErrorKind::Other,
            },
        }
    }
}
