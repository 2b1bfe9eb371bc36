use std::fmt::Write;

use crate::citations::host_of;
use crate::district::District;
use crate::error::Result;
use crate::status::StatusResult;

pub const CONNECTION_ERROR: &str = "Connection Error: we couldn't reach our intelligence sources. \
Check your internet connection or try again later.";

pub fn disclaimer(district: &District) -> String {
    format!(
        "Information is gathered by AI from public news sources ({}) and district sites. \
         Always verify with official school communication channels.",
        district.outlet_labels()
    )
}

/// Plain-text report of a check. `error` marks a soft failure; sources and
/// the disclaimer are left out in that case.
pub fn render_text(result: &StatusResult, error: bool, district: &District) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", result.status.headline());
    let _ = writeln!(out, "Status for {}", result.checked_date);
    if !result.timestamp.is_empty() {
        let _ = writeln!(out, "Updated {}", result.timestamp);
    }

    if error {
        let _ = writeln!(out);
        let _ = writeln!(out, "{CONNECTION_ERROR}");
        return out;
    }

    if !result.summary.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", result.summary);
    }

    if !result.sources.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "VERIFIED SOURCES");
        for source in &result.sources {
            match source.status {
                Some(status) => {
                    let _ = writeln!(out, "  [{status}] {}", source.title);
                }
                None => {
                    let _ = writeln!(out, "  - {}", source.title);
                }
            }
            let _ = writeln!(out, "      {} <{}>", host_of(&source.uri), source.uri);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", disclaimer(district));
    out
}

pub fn render_json(result: &StatusResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
