//! Literal-marker scanning of model output.
//!
//! The model answers in prose with a few conventional marker lines
//! (`STATUS:`, `SUMMARY:`, `SOURCE_EVALUATION:`). Everything that looks
//! for those markers lives here.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::status::Status;

pub const SUMMARY_MARKER: &str = "SUMMARY:";
pub const EVALUATION_MARKER: &str = "SOURCE_EVALUATION:";
pub const SUMMARY_FALLBACK: &str = "Unable to retrieve specific details.";

/// Checked in this order; the first marker present wins.
const STATUS_MARKERS: &[(&str, Status)] = &[
    ("STATUS: OPEN", Status::Open),
    ("STATUS: CLOSED", Status::Closed),
    ("STATUS: DELAYED", Status::Delayed),
];

/// Which response template the instruction asks for, and therefore how
/// the answer is read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// `STATUS:` plus a free-text `SUMMARY:` line.
    #[default]
    Summary,
    /// `STATUS:` plus one `SOURCE_EVALUATION: <domain> | <STATUS>` line per
    /// trusted domain. No summary.
    SourceEvaluation,
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMode::Summary => write!(f, "summary"),
            ParseMode::SourceEvaluation => write!(f, "evaluation"),
        }
    }
}

impl FromStr for ParseMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(ParseMode::Summary),
            "evaluation" => Ok(ParseMode::SourceEvaluation),
            other => Err(Error::ConfigValidation(format!(
                "unknown mode: {other} (expected: summary, evaluation)"
            ))),
        }
    }
}

/// Per-domain verdicts in the order the model listed them.
///
/// A domain listed twice keeps its first position and takes the later value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceEvaluations {
    entries: Vec<(String, Status)>,
}

impl SourceEvaluations {
    pub fn insert(&mut self, domain: String, status: Status) {
        match self.entries.iter_mut().find(|(d, _)| *d == domain) {
            Some(entry) => entry.1 = status,
            None => self.entries.push((domain, status)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, domain: &str) -> Option<Status> {
        self.entries
            .iter()
            .find(|(d, _)| d == domain)
            .map(|(_, s)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Status)> {
        self.entries.iter().map(|(d, s)| (d.as_str(), *s))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Status of the first recorded domain contained in `uri`.
    pub fn status_for_uri(&self, uri: &str) -> Status {
        let uri = uri.to_lowercase();
        self.iter()
            .find(|(domain, _)| uri.contains(*domain))
            .map(|(_, status)| status)
            .unwrap_or(Status::Unknown)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub status: Status,
    /// Present only in [`ParseMode::Summary`].
    pub summary: Option<String>,
    /// Empty in [`ParseMode::Summary`].
    pub evaluations: SourceEvaluations,
}

pub fn parse_response(text: &str, mode: ParseMode) -> ParsedResponse {
    let status = parse_status(text);
    match mode {
        ParseMode::Summary => ParsedResponse {
            status,
            summary: Some(parse_summary(text)),
            evaluations: SourceEvaluations::default(),
        },
        ParseMode::SourceEvaluation => ParsedResponse {
            status,
            summary: None,
            evaluations: parse_source_evaluations(text),
        },
    }
}

pub fn parse_status(text: &str) -> Status {
    STATUS_MARKERS
        .iter()
        .find(|(marker, _)| text.contains(marker))
        .map(|(_, status)| *status)
        .unwrap_or(Status::Unknown)
}

/// Everything after the first `SUMMARY:`, trimmed.
pub fn parse_summary(text: &str) -> String {
    match text.split_once(SUMMARY_MARKER) {
        Some((_, rest)) => {
            // Only the text up to a second marker belongs to the summary.
            let rest = rest.split(SUMMARY_MARKER).next().unwrap_or(rest);
            rest.trim().to_string()
        }
        None => SUMMARY_FALLBACK.to_string(),
    }
}

pub fn parse_source_evaluations(text: &str) -> SourceEvaluations {
    let mut evaluations = SourceEvaluations::default();
    for line in text.lines() {
        let Some(rest) = line.trim().strip_prefix(EVALUATION_MARKER) else {
            continue;
        };
        let Some((domain, verdict)) = rest.split_once('|') else {
            continue;
        };
        let domain = domain.trim().to_lowercase();
        if domain.is_empty() {
            continue;
        }
        evaluations.insert(domain, parse_verdict(verdict));
    }
    evaluations
}

/// Substring match so "2 Hour Delay" still reads as delayed.
fn parse_verdict(verdict: &str) -> Status {
    let verdict = verdict.to_uppercase();
    if verdict.contains("OPEN") {
        Status::Open
    } else if verdict.contains("CLOSED") {
        Status::Closed
    } else if verdict.contains("DELAY") {
        Status::Delayed
    } else {
        Status::Unknown
    }
}
