use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of an SDK call, as reported by the SDK
///
/// Codes arrive as strings (`"SUCCESS"`, `"ERROR_NETWORK"`, ...). Anything the
/// shell does not know about is kept as [`TrackingStatus::Unrecognized`] so a
/// newer SDK never breaks the display path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrackingStatus {
    Success,
    /// SDK not initialized with a publishable key
    ErrorPublishableKey,
    /// No user id set
    ErrorUserId,
    /// Location permission not granted
    ErrorPermissions,
    /// Location services error or timeout
    ErrorLocation,
    /// Network error or timeout
    ErrorNetwork,
    /// Invalid API key
    ErrorUnauthorized,
    ErrorServer,
    ErrorUnknown,
    Unrecognized(String),
}

impl TrackingStatus {
    /// Every status the shell knows a code for.
    pub const KNOWN: [TrackingStatus; 9] = [
        TrackingStatus::Success,
        TrackingStatus::ErrorPublishableKey,
        TrackingStatus::ErrorUserId,
        TrackingStatus::ErrorPermissions,
        TrackingStatus::ErrorLocation,
        TrackingStatus::ErrorNetwork,
        TrackingStatus::ErrorUnauthorized,
        TrackingStatus::ErrorServer,
        TrackingStatus::ErrorUnknown,
    ];

    pub fn from_code(code: &str) -> Self {
        match code {
            "SUCCESS" => TrackingStatus::Success,
            "ERROR_PUBLISHABLE_KEY" => TrackingStatus::ErrorPublishableKey,
            "ERROR_USER_ID" => TrackingStatus::ErrorUserId,
            "ERROR_PERMISSIONS" => TrackingStatus::ErrorPermissions,
            "ERROR_LOCATION" => TrackingStatus::ErrorLocation,
            "ERROR_NETWORK" => TrackingStatus::ErrorNetwork,
            "ERROR_UNAUTHORIZED" => TrackingStatus::ErrorUnauthorized,
            "ERROR_SERVER" => TrackingStatus::ErrorServer,
            "ERROR_UNKNOWN" => TrackingStatus::ErrorUnknown,
            other => TrackingStatus::Unrecognized(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            TrackingStatus::Success => "SUCCESS",
            TrackingStatus::ErrorPublishableKey => "ERROR_PUBLISHABLE_KEY",
            TrackingStatus::ErrorUserId => "ERROR_USER_ID",
            TrackingStatus::ErrorPermissions => "ERROR_PERMISSIONS",
            TrackingStatus::ErrorLocation => "ERROR_LOCATION",
            TrackingStatus::ErrorNetwork => "ERROR_NETWORK",
            TrackingStatus::ErrorUnauthorized => "ERROR_UNAUTHORIZED",
            TrackingStatus::ErrorServer => "ERROR_SERVER",
            TrackingStatus::ErrorUnknown => "ERROR_UNKNOWN",
            TrackingStatus::Unrecognized(code) => code,
        }
    }

    pub fn is_success(&self) -> bool {
        *self == TrackingStatus::Success
    }

    /// Short human-readable label for messages and notifications
    pub fn label(&self) -> &'static str {
        match self {
            TrackingStatus::Success => "Success",
            TrackingStatus::ErrorPublishableKey => "Publishable Key Error",
            TrackingStatus::ErrorUserId => "User ID Error",
            TrackingStatus::ErrorPermissions => "Permissions Error",
            TrackingStatus::ErrorLocation => "Location Error",
            TrackingStatus::ErrorNetwork => "Network Error",
            TrackingStatus::ErrorUnauthorized => "Unauthorized Error",
            TrackingStatus::ErrorServer => "Server Error",
            TrackingStatus::ErrorUnknown | TrackingStatus::Unrecognized(_) => "Unknown Error",
        }
    }
}

impl From<String> for TrackingStatus {
    fn from(code: String) -> Self {
        TrackingStatus::from_code(&code)
    }
}

impl From<TrackingStatus> for String {
    fn from(status: TrackingStatus) -> Self {
        status.code().to_string()
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
