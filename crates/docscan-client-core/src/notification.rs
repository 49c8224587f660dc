pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";
pub const SUCCESS_FALLBACK_MESSAGE: &str = "Operation successful";
pub const ERROR_FALLBACK_MESSAGE: &str = "Something went wrong";
pub const PROFILE_LOAD_FAILED_MESSAGE: &str = "Failed to load profile";
pub const MATCHES_LOAD_FAILED_MESSAGE: &str = "Failed to load matches";
pub const ANALYTICS_LOAD_FAILED_MESSAGE: &str = "Failed to load analytics";
pub const LOGOUT_FAILED_MESSAGE: &str = "Error logging out";
pub const REGISTRATION_COMPLETE_MESSAGE: &str = "Registration successful";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "alert alert-success",
            Self::Error => "alert alert-error",
        }
    }

    /// Anything other than `error` is treated as success.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("error") {
            Self::Error
        } else {
            Self::Success
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// Identifies an inserted notification element so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classes() {
        assert_eq!(Severity::Success.css_class(), "alert alert-success");
        assert_eq!(Severity::Error.css_class(), "alert alert-error");
    }

    #[test]
    fn severity_parse_defaults_to_success() {
        assert_eq!(Severity::parse("ERROR"), Severity::Error);
        assert_eq!(Severity::parse("warning"), Severity::Success);
    }
}
