// SPDX-License-Identifier: MPL-2.0
//! Transient user notifications.
//!
//! Tools never abort on a recoverable failure: they hand back a
//! [`Notification`] that the front-end displays, and every notification is
//! mirrored to the log at a level matching its severity.

use crate::error::Error;
use std::fmt;
use std::time::Duration;

/// Severity level determines display duration and log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Operation completed successfully.
    #[default]
    Success,
    Info,
    /// Fallback taken; the operation still produced output.
    Warning,
    Error,
}

impl Severity {
    /// Returns how long a front-end should keep the notification visible.
    /// `None` for errors (manual dismiss required).
    #[must_use]
    pub fn auto_dismiss_duration(self) -> Option<Duration> {
        match self {
            Severity::Success | Severity::Info => Some(Duration::from_secs(3)),
            Severity::Warning => Some(Duration::from_secs(5)),
            Severity::Error => None,
        }
    }

    fn log_level(self) -> log::Level {
        match self {
            Severity::Success | Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error => log::Level::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    severity: Severity,
    /// Stable message key (e.g. `"compress-not-effective"`).
    key: String,
    /// Human-readable text.
    message: String,
}

impl Notification {
    /// Creates a notification and logs it.
    pub fn new(severity: Severity, key: impl Into<String>, message: impl Into<String>) -> Self {
        let notification = Self {
            severity,
            key: key.into(),
            message: message.into(),
        };
        log::log!(
            notification.severity.log_level(),
            "[{}] {}",
            notification.key,
            notification.message
        );
        notification
    }

    pub fn success(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Success, key, message)
    }

    pub fn info(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, key, message)
    }

    pub fn warning(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, key, message)
    }

    pub fn error(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, key, message)
    }

    /// Error notification carrying the error's own key and text.
    pub fn from_error(err: &Error) -> Self {
        Self::error(err.notification_key(), err.to_string())
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

impl From<Error> for Notification {
    fn from(err: Error) -> Self {
        Self::from_error(&err)
    }
}
