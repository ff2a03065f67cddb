//! Moderation types: affiliate applications and issue reports

use serde::{Deserialize, Serialize};

use crate::errors::GearbookError;

/// Review state of an affiliate application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Result<Self, GearbookError> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => {
                Err(GearbookError::InvalidInput(format!("unknown application status: {other}")))
            }
        }
    }
}

/// An application to join the affiliate program, reviewed by admins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateApplication {
    pub id: String,
    /// Applicant identifier (canonical subject on new writes)
    pub applicant_id: String,
    pub brand_name: String,
    pub website: String,
    pub pitch: String,
    pub status: ApplicationStatus,
    /// Reviewer identifier; the system sentinel for automated actions
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<i64>,
    pub created_at: i64,
}

/// Lifecycle state of an issue report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Open,
    Resolved,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Resolved => "resolved",
        }
    }

    pub fn parse(value: &str) -> Result<Self, GearbookError> {
        match value {
            "open" => Ok(Self::Open),
            "resolved" => Ok(Self::Resolved),
            other => Err(GearbookError::InvalidInput(format!("unknown issue status: {other}"))),
        }
    }
}

/// What an issue report points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSubject {
    Vehicle,
    User,
}

impl ReportSubject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vehicle => "vehicle",
            Self::User => "user",
        }
    }

    pub fn parse(value: &str) -> Result<Self, GearbookError> {
        match value {
            "vehicle" => Ok(Self::Vehicle),
            "user" => Ok(Self::User),
            other => Err(GearbookError::InvalidInput(format!("unknown report subject: {other}"))),
        }
    }
}

/// A user-filed report about a vehicle or another user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueReport {
    pub id: String,
    /// Reporter identifier, or the anonymization sentinel after the
    /// reporter erased their account
    pub reporter_id: String,
    pub subject_kind: ReportSubject,
    pub subject_id: String,
    pub reason: String,
    pub status: IssueStatus,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<i64>,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_status_roundtrip() {
        for status in
            [ApplicationStatus::Pending, ApplicationStatus::Approved, ApplicationStatus::Rejected]
        {
            assert_eq!(ApplicationStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(ApplicationStatus::parse("archived").is_err());
    }

    #[test]
    fn issue_status_roundtrip() {
        for status in [IssueStatus::Open, IssueStatus::Resolved] {
            assert_eq!(IssueStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(IssueStatus::parse("closed").is_err());
    }
}
