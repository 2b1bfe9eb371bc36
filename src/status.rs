use std::fmt;

use serde::Serialize;

/// Operating status of the district for the checked date.
///
/// `Unknown` doubles as "not yet determined" and "could not parse".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Open,
    Closed,
    Delayed,
    #[default]
    Unknown,
}

impl Status {
    /// Banner text shown above everything else.
    pub fn headline(self) -> &'static str {
        match self {
            Status::Open => "SCHOOLS ARE OPEN",
            Status::Closed => "SCHOOLS ARE CLOSED",
            Status::Delayed => "SCHOOLS ARE DELAYED",
            Status::Unknown => "STATUS UNKNOWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Open => write!(f, "OPEN"),
            Status::Closed => write!(f, "CLOSED"),
            Status::Delayed => write!(f, "DELAYED"),
            Status::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A cited web page. The URI is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

/// Outcome of one status check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResult {
    pub status: Status,
    pub summary: String,
    pub sources: Vec<Source>,
    pub timestamp: String,
    pub checked_date: String,
}

impl StatusResult {
    /// Result used when the remote call or response access failed.
    pub fn unknown(timestamp: String, checked_date: String) -> Self {
        Self {
            status: Status::Unknown,
            summary: String::new(),
            sources: Vec::new(),
            timestamp,
            checked_date,
        }
    }

    /// An UNKNOWN status with nothing cited carries no information and is
    /// treated like a connectivity error by callers.
    pub fn is_soft_failure(&self) -> bool {
        self.status == Status::Unknown && self.sources.is_empty()
    }
}
