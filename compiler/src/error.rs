use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Code generation error: {0}")]
    Generate(String),
}

/// The first syntax error in a schema. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at line {line}, column {column}: {msg}")]
pub struct ParseError {
    pub msg:    String,
    pub line:   usize,
    pub column: usize,
}

/// Stable, machine-readable validation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmptySchema,
    EmptyStruct,
    UnknownType,
    InvalidOptional,
    CircularReference,
    InvalidIdentifier,
    ReservedKeyword,
    DuplicateStruct,
    DuplicateField,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EmptySchema => "EMPTY_SCHEMA",
            ErrorCode::EmptyStruct => "EMPTY_STRUCT",
            ErrorCode::UnknownType => "UNKNOWN_TYPE",
            ErrorCode::InvalidOptional => "INVALID_OPTIONAL",
            ErrorCode::CircularReference => "CIRCULAR_REFERENCE",
            ErrorCode::InvalidIdentifier => "INVALID_IDENTIFIER",
            ErrorCode::ReservedKeyword => "RESERVED_KEYWORD",
            ErrorCode::DuplicateStruct => "DUPLICATE_STRUCT",
            ErrorCode::DuplicateField => "DUPLICATE_FIELD",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct ValidationError {
    pub code:    ErrorCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> ValidationError {
        ValidationError { code, message: message.into() }
    }
}

/// Every validation error found in one schema, in pass order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        self.0.iter().map(|e| e.code).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Schema validation failed with {} error(s):", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
