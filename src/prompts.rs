use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::date::TargetDate;
use crate::district::District;
use crate::error::{Error, Result};
use crate::parse::{EVALUATION_MARKER, ParseMode};

const DEFAULT_SUMMARY: &str = include_str!("default_prompts/summary-status.md");
const DEFAULT_EVALUATION: &str = include_str!("default_prompts/evaluation-status.md");

/// Known template variable names for validation.
const KNOWN_VARIABLES: &[&str] = &[
    "district_name",
    "district_locale",
    "full_date",
    "short_date",
    "date_with_year",
    "current_time",
    "trusted_domains",
    "search_queries",
    "evaluation_lines",
];

fn default_template(mode: ParseMode) -> &'static str {
    match mode {
        ParseMode::Summary => DEFAULT_SUMMARY,
        ParseMode::SourceEvaluation => DEFAULT_EVALUATION,
    }
}

fn template_filename(mode: ParseMode) -> String {
    format!("{mode}-status.md")
}

/// Build the variables every template may reference.
pub fn build_vars(
    district: &District,
    target: &TargetDate,
    current_time: &str,
) -> HashMap<String, String> {
    let domains: Vec<&str> = district.domains().collect();
    let search_queries = district
        .search_queries(&target.short, &target.with_year)
        .iter()
        .map(|q| format!("- {q}"))
        .collect::<Vec<_>>()
        .join("\n");
    let evaluation_lines = domains
        .iter()
        .map(|d| format!("{EVALUATION_MARKER} {d} | [OPEN or CLOSED or DELAYED]"))
        .collect::<Vec<_>>()
        .join("\n");

    HashMap::from([
        ("district_name".to_string(), district.name.to_string()),
        ("district_locale".to_string(), district.locale.to_string()),
        ("full_date".to_string(), target.long.clone()),
        ("short_date".to_string(), target.short.clone()),
        ("date_with_year".to_string(), target.with_year.clone()),
        ("current_time".to_string(), current_time.to_string()),
        ("trusted_domains".to_string(), domains.join(", ")),
        ("search_queries".to_string(), search_queries),
        ("evaluation_lines".to_string(), evaluation_lines),
    ])
}

/// Instruction template engine with embedded defaults and user overrides.
pub struct PromptEngine {
    override_dir: Option<String>,
}

impl PromptEngine {
    pub fn new(override_dir: Option<String>) -> Self {
        Self { override_dir }
    }

    fn override_path(&self, mode: ParseMode) -> Option<PathBuf> {
        let path = Path::new(self.override_dir.as_deref()?).join(template_filename(mode));
        path.is_file().then_some(path)
    }

    /// Instruction template for a parse mode. A file in `override_dir`
    /// wins over the embedded default.
    pub fn load_template(&self, mode: ParseMode) -> Result<String> {
        let Some(path) = self.override_path(mode) else {
            return Ok(default_template(mode).to_string());
        };
        std::fs::read_to_string(&path).map_err(|e| {
            Error::Prompt(format!(
                "cannot read {mode} template {}: {e}",
                path.display()
            ))
        })
    }

    pub fn render(&self, mode: ParseMode, vars: &HashMap<String, String>) -> Result<String> {
        render_template(&self.load_template(mode)?, vars)
    }
}

fn lookup<'a>(name: &str, vars: &'a HashMap<String, String>) -> Result<&'a str> {
    if !KNOWN_VARIABLES.contains(&name) {
        return Err(Error::Prompt(format!("unknown template variable: {name}")));
    }
    vars.get(name)
        .map(String::as_str)
        .ok_or_else(|| Error::Prompt(format!("missing value for template variable: {name}")))
}

/// Substitute `{{name}}` placeholders. Names are trimmed; single braces pass
/// through untouched.
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            return Err(Error::Prompt(format!(
                "unclosed template variable: {}",
                &rest[open..]
            )));
        };
        out.push_str(lookup(after[..close].trim(), vars)?);
        rest = &after[close + 2..];
    }
    out.push_str(rest);

    Ok(out)
}
