//! Result type alias for MediWise
//!
//! This module provides a convenient Result type alias that uses PortalError
//! as the error type.

use super::errors::PortalError;

/// Result type alias for MediWise operations
///
/// # Examples
///
/// ```
/// use mediwise::domain::result::Result;
/// use mediwise::domain::errors::PortalError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PortalError::NotFound("doctor 7".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PortalError>;
