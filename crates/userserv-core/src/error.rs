//! User service error types

use std::fmt;
use thiserror::Error;

/// Common result type for user service operations
pub type Result<T> = std::result::Result<T, Error>;

/// User service errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("user not found: {0}")]
    NotFound(String),

    #[error("invalid data field: {0}")]
    InvalidField(FieldErrors),

    #[error("invalid request: {0}")]
    BadRequest(String),
}

impl Error {
    /// Create a bad request error
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest(reason.into())
    }

    /// Get the error classification
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InvalidField(_) => ErrorKind::InvalidField,
            Error::BadRequest(_) => ErrorKind::BadRequest,
        }
    }

    /// Get the failing fields of an `InvalidField` error
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Error::InvalidField(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Error::InvalidField(errors)
    }
}

/// Error classification, stable across message changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidField,
    BadRequest,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidField => "invalid_field",
            ErrorKind::BadRequest => "bad_request",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User fields subject to validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Age,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Age => "age",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed field check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub reason: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

/// Every failed field check of one validation pass, in check order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Check whether a field failed
    pub fn contains(&self, field: Field) -> bool {
        self.iter().any(|e| e.field == field)
    }

    /// Names of the failing fields
    pub fn fields(&self) -> Vec<Field> {
        self.iter().map(|e| e.field).collect()
    }

    /// `Ok(())` when empty, otherwise an `InvalidField` error
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidField(self))
        }
    }
}

impl From<FieldError> for FieldErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_display_joins_all() {
        let mut errors = FieldErrors::new();
        errors.push(FieldError {
            field: Field::Name,
            reason: "must not be empty",
        });
        errors.push(FieldError {
            field: Field::Age,
            reason: "must be greater than 0",
        });

        let err = Error::from(errors);
        assert_eq!(
            err.to_string(),
            "invalid data field: name must not be empty; age must be greater than 0"
        );
        assert_eq!(err.kind(), ErrorKind::InvalidField);
    }

    #[test]
    fn test_empty_field_errors_is_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::NotFound("x".into()).kind().as_str(), "not_found");
        assert_eq!(Error::bad_request("bad").kind().as_str(), "bad_request");
        assert!(Error::bad_request("bad").field_errors().is_none());
    }
}
