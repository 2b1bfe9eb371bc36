use chrono::NaiveDateTime;
use tracing::{debug, error, info};

use crate::citations::collect_sources;
use crate::date::{TargetDate, clock_label, local_now, select_target_date, timestamp_label};
use crate::district::{DELAWARE_CITY_SCHOOLS, District};
use crate::error::Result;
use crate::gemini::GenerationClient;
use crate::parse::{ParseMode, parse_response};
use crate::prompts::{PromptEngine, build_vars};
use crate::status::{Source, Status, StatusResult};

/// Runs one status check end to end: date, instruction, remote call,
/// parsing, citations.
pub struct StatusService<C> {
    client: C,
    prompts: PromptEngine,
    district: District,
    mode: ParseMode,
}

impl<C: GenerationClient> StatusService<C> {
    pub fn new(client: C, prompts: PromptEngine, mode: ParseMode) -> Self {
        Self {
            client,
            prompts,
            district: DELAWARE_CITY_SCHOOLS,
            mode,
        }
    }

    pub fn district(&self) -> &District {
        &self.district
    }

    /// Check the status as of the local wall clock. Never fails: errors are
    /// logged and reported as an UNKNOWN result with no sources.
    pub fn check_status(&self) -> StatusResult {
        self.check_status_at(local_now())
    }

    pub fn check_status_at(&self, now: NaiveDateTime) -> StatusResult {
        let target = select_target_date(now);
        let timestamp = timestamp_label(now);
        info!(date = %target.long, mode = %self.mode, "checking school status");

        match self.query(now, &target) {
            Ok((status, summary, sources)) => {
                info!(%status, sources = sources.len(), "status check complete");
                StatusResult {
                    status,
                    summary,
                    sources,
                    timestamp,
                    checked_date: target.long,
                }
            }
            Err(e) => {
                error!(error = %e, "error checking school status");
                StatusResult::unknown(timestamp, target.long)
            }
        }
    }

    fn query(
        &self,
        now: NaiveDateTime,
        target: &TargetDate,
    ) -> Result<(Status, String, Vec<Source>)> {
        let vars = build_vars(&self.district, target, &clock_label(now));
        let prompt = self.prompts.render(self.mode, &vars)?;
        debug!(prompt_len = prompt.len(), "rendered status instruction");

        let generation = self.client.generate(&prompt)?;
        debug!(
            text_len = generation.text.len(),
            citations = generation.citations.len(),
            "generation received"
        );

        let parsed = parse_response(&generation.text, self.mode);
        let sources = collect_sources(&generation.citations, self.mode, &parsed.evaluations);
        Ok((parsed.status, parsed.summary.unwrap_or_default(), sources))
    }
}
