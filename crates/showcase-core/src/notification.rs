//! User-facing notification value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// Describes one outcome that should be shown to the user exactly once.
///
/// Notifications are never persisted. The display layer consumes them from
/// a notification stream as they are published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Notification {
    pub fn new(severity: Severity, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    /// Success notification with the standard "Erfolg" summary.
    pub fn success(detail: impl Into<String>) -> Self {
        Self::new(Severity::Success, "Erfolg", detail)
    }

    /// Error notification with the standard "Fehler" summary.
    pub fn error(detail: impl Into<String>) -> Self {
        Self::new(Severity::Error, "Fehler", detail)
    }

    pub fn info(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Info, summary, detail)
    }

    pub fn warn(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Warn, summary, detail)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.summary, self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_set_summary() {
        let ok = Notification::success("Login erfolgreich");
        assert_eq!(ok.severity, Severity::Success);
        assert_eq!(ok.summary, "Erfolg");

        let err = Notification::error("Email oder Passwort falsch");
        assert!(err.is_error());
        assert_eq!(err.summary, "Fehler");
    }

    #[test]
    fn test_display() {
        let n = Notification::error("Projekt konnte nicht gelöscht werden.");
        assert_eq!(
            n.to_string(),
            "[error] Fehler: Projekt konnte nicht gelöscht werden."
        );
    }
}
