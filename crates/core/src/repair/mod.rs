//! Repair job vocabulary.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a repair job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    /// Accepted but not started.
    Pending,
    /// Work in progress.
    InProgress,
    /// Work finished; counts toward revenue aggregates.
    Completed,
    /// Abandoned.
    Cancelled,
}

impl RepairStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Returns the status as the string stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for RepairStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown repair status: {0}")]
pub struct UnknownStatus(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case(RepairStatus::Pending, "pending")]
    #[case(RepairStatus::InProgress, "in_progress")]
    #[case(RepairStatus::Completed, "completed")]
    #[case(RepairStatus::Cancelled, "cancelled")]
    fn test_status_string_round_trip(#[case] status: RepairStatus, #[case] text: &str) {
        assert_eq!(status.as_str(), text);
        assert_eq!(RepairStatus::from_str(text), Ok(status));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = RepairStatus::from_str("finished").unwrap_err();
        assert_eq!(err.to_string(), "unknown repair status: finished");
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&RepairStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
