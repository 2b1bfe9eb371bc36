use std::collections::HashSet;

use url::Url;

use crate::parse::{ParseMode, SourceEvaluations};
use crate::status::Source;

/// A web reference returned next to the model's answer. Either field may
/// be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundingCitation {
    pub uri: Option<String>,
    pub title: Option<String>,
}

impl GroundingCitation {
    pub fn new(uri: &str, title: &str) -> Self {
        Self {
            uri: Some(uri.to_string()),
            title: Some(title.to_string()),
        }
    }
}

/// Turn raw citations into the source list shown to the user: incomplete
/// entries dropped, per-source status attached in evaluation mode,
/// duplicate URIs removed.
pub fn collect_sources(
    citations: &[GroundingCitation],
    mode: ParseMode,
    evaluations: &SourceEvaluations,
) -> Vec<Source> {
    let sources = citations.iter().filter_map(|c| {
        let uri = c.uri.as_deref().filter(|u| !u.is_empty())?;
        let title = c.title.as_deref().filter(|t| !t.is_empty())?;
        let status = match mode {
            ParseMode::Summary => None,
            ParseMode::SourceEvaluation => Some(evaluations.status_for_uri(uri)),
        };
        Some(Source {
            title: title.to_string(),
            uri: uri.to_string(),
            status,
        })
    });
    dedupe_by_uri(sources)
}

/// Keep the first source for each URI, preserving order.
pub fn dedupe_by_uri(sources: impl IntoIterator<Item = Source>) -> Vec<Source> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|s| seen.insert(s.uri.clone()))
        .collect()
}

/// Host part of a URI for display, e.g. `dcs.k12.oh.us`. Anything that
/// does not parse as an absolute URL is shown as-is.
pub fn host_of(uri: &str) -> String {
    Url::parse(uri)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| uri.to_string())
}
