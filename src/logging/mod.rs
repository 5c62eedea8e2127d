//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted file logs
//! - Configurable log levels
//! - Local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use mediwise::logging::init_logging;
//! use mediwise::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Portal started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the outcome of a login attempt
///
/// Info-level events carry the role and profile id; the email only appears
/// at debug level. The password is never logged.
///
/// # Example
///
/// ```no_run
/// use mediwise::log_login_attempt;
/// use mediwise::domain::{ProfileId, Role};
///
/// log_login_attempt!("ann@example.com", Some((Role::Patient, ProfileId::new(3))));
/// log_login_attempt!("ann@example.com", None::<(Role, ProfileId)>);
/// ```
#[macro_export]
macro_rules! log_login_attempt {
    ($email:expr, $outcome:expr) => {
        match $outcome {
            Some((role, profile_id)) => {
                tracing::debug!(email = %$email, "Login accepted");
                tracing::info!(role = %role, profile_id = %profile_id, "Login succeeded");
            }
            None => {
                tracing::debug!(email = %$email, "Login rejected");
                tracing::warn!("Login failed: invalid credentials");
            }
        }
    };
}

/// Log a profile create/update/delete
///
/// # Example
///
/// ```no_run
/// use mediwise::log_profile_change;
/// use mediwise::domain::{ProfileId, Role};
///
/// log_profile_change!(Role::Doctor, ProfileId::new(7), "deleted");
/// ```
#[macro_export]
macro_rules! log_profile_change {
    ($role:expr, $id:expr, $action:expr) => {
        tracing::info!(
            role = %$role,
            profile_id = %$id,
            action = $action,
            "Profile changed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use mediwise::log_error_with_context;
/// use mediwise::domain::PortalError;
///
/// let error = PortalError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::{ProfileId, Role};
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_info(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_successful_login_logs_id_not_email() {
        let output = capture_info(|| {
            crate::log_login_attempt!(
                "ann@example.com",
                Some((Role::Patient, ProfileId::new(42)))
            );
        });
        assert!(output.contains("Login succeeded"));
        assert!(output.contains("role=patient"));
        assert!(output.contains("profile_id=42"));
        assert!(!output.contains("ann@example.com"));
    }

    #[test]
    fn test_failed_login_hides_email_at_info() {
        let output = capture_info(|| {
            crate::log_login_attempt!("ann@example.com", None::<(Role, ProfileId)>);
        });
        assert!(output.contains("Login failed"));
        assert!(!output.contains("ann@example.com"));
    }
}
