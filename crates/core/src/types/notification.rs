//! Notification banner kinds.

use serde::{Deserialize, Serialize};

/// Visual style of a notification banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    /// Map a loosely typed kind name to a kind.
    ///
    /// Anything other than `"success"`, `"error"` or `"warning"` is
    /// [`NotificationKind::Info`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    /// Bootstrap alert class for this kind.
    #[must_use]
    pub const fn alert_class(self) -> &'static str {
        match self {
            Self::Success => "alert-success",
            Self::Error => "alert-danger",
            Self::Warning => "alert-warning",
            Self::Info => "alert-info",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_classes() {
        assert_eq!(NotificationKind::Success.alert_class(), "alert-success");
        assert_eq!(NotificationKind::Error.alert_class(), "alert-danger");
        assert_eq!(NotificationKind::Warning.alert_class(), "alert-warning");
        assert_eq!(NotificationKind::Info.alert_class(), "alert-info");
    }

    #[test]
    fn test_from_name_falls_back_to_info() {
        assert_eq!(NotificationKind::from_name("success"), NotificationKind::Success);
        assert_eq!(NotificationKind::from_name("error"), NotificationKind::Error);
        assert_eq!(NotificationKind::from_name("warning"), NotificationKind::Warning);
        assert_eq!(NotificationKind::from_name("info"), NotificationKind::Info);
        assert_eq!(NotificationKind::from_name("danger"), NotificationKind::Info);
        assert_eq!(NotificationKind::from_name(""), NotificationKind::Info);
    }
}
