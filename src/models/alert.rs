use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertSeverity {
    Warning,
    Danger,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Warning => "Warning",
            AlertSeverity::Danger => "Danger",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AlertSeverity::Warning => "⚠",
            AlertSeverity::Danger => "!",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A condition the grower should act on. Recomputed from scratch on every
/// evaluation cycle and never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
    pub recommendation: String,
}

impl Alert {
    pub fn new(
        severity: AlertSeverity,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_display() {
        assert_eq!(AlertSeverity::Warning.as_str(), "Warning");
        assert_eq!(AlertSeverity::Danger.as_str(), "Danger");
        assert_eq!(AlertSeverity::Warning.symbol(), "⚠");
        assert!(AlertSeverity::Warning < AlertSeverity::Danger);
    }
}
