//! Domain error types
//!
//! This module defines the error hierarchy for MediWise. All errors are
//! domain-specific and don't expose third-party types.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Main MediWise error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Persistence-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Field-level form errors, including uniqueness conflicts
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// A record addressed by id does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Template rendering errors
    #[error("Template error: {0}")]
    Template(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl PortalError {
    /// Returns the field errors when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            PortalError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Persistence errors
///
/// Errors raised by credential store implementations.
/// These errors don't expose the database driver's types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the database
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// Transaction could not be started or committed
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Schema initialization failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Row could not be mapped to a domain record
    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

/// Field-level validation messages
///
/// Messages aggregate per field so that a form can report every problem at
/// once. Field order is stable (alphabetical) for rendering and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Creates an empty error set
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Returns true when no field has an error
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns true when the given field has at least one error
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Messages recorded for a field
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates over `(field, messages)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Field → messages map, for template contexts
    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// Converts into `Err(PortalError::Validation)` when any error was recorded
    pub fn into_result(self) -> Result<(), PortalError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(PortalError::Validation(self))
        }
    }

    /// Shorthand for a single-field error set
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<ValidationErrors> for PortalError {
    fn from(errors: ValidationErrors) -> Self {
        PortalError::Validation(errors)
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for PortalError {
    fn from(err: std::io::Error) -> Self {
        PortalError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PortalError {
    fn from(err: toml::de::Error) -> Self {
        PortalError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<tera::Error> for PortalError {
    fn from(err: tera::Error) -> Self {
        PortalError::Template(err.to_string())
    }
}
