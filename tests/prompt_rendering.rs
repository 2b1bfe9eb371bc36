mod common;

use closings::date::{clock_label, select_target_date};
use closings::district::DELAWARE_CITY_SCHOOLS;
use closings::parse::ParseMode;
use closings::prompts::{PromptEngine, build_vars};

use common::{at, monday_afternoon};

fn render(mode: ParseMode, now: chrono::NaiveDateTime) -> String {
    let target = select_target_date(now);
    let vars = build_vars(&DELAWARE_CITY_SCHOOLS, &target, &clock_label(now));
    PromptEngine::new(None).render(mode, &vars).unwrap()
}

#[test]
fn summary_prompt_full_output() {
    let prompt = render(ParseMode::Summary, monday_afternoon());

    assert!(prompt.starts_with(
        "I need to determine the EXACT operating status for **Delaware City Schools** \
         in **Delaware, Ohio** for **Monday, December 15, 2025**."
    ));
    assert!(prompt.contains("Current System Time: 2:00:00 PM"));
    assert!(prompt.contains("(Look for mentions of \"12/15\" or \"12/15/25\")"));
    assert!(prompt.contains("- \"Delaware City Schools 2 hour delay 12/15/25\""));
    assert!(prompt.contains("- \"site:dcs.k12.oh.us\""));
    assert!(prompt.contains("- \"site:nbc4i.com Delaware City Schools closings\""));
    assert!(prompt.contains("- \"Delaware City Schools Facebook\""));
    assert!(prompt.contains("\"2 hour delay 12/15/25\""));
    assert!(prompt.contains(
        "Check snippets from dcs.k12.oh.us, 10tv.com, nbc4i.com, abc6onyourside.com."
    ));
    assert!(prompt.contains("overrides an otherwise open finding"));
    assert!(prompt.ends_with(
        "STATUS: [OPEN or CLOSED or DELAYED]\n\
         SUMMARY: [Explain the finding. E.g., \"The district website reports a 2-hour delay for 12/15.\"]\n"
    ));
    assert!(!prompt.contains("SOURCE_EVALUATION"));
}

#[test]
fn evaluation_prompt_lists_every_domain() {
    let prompt = render(ParseMode::SourceEvaluation, at(2025, 12, 15, 19, 45));

    assert!(prompt.contains("**Tuesday, December 16, 2025**"));
    assert!(prompt.contains("Current System Time: 7:45:00 PM"));
    assert!(!prompt.contains("SUMMARY:"));
    for domain in DELAWARE_CITY_SCHOOLS.domains() {
        let line = format!("SOURCE_EVALUATION: {domain} | [OPEN or CLOSED or DELAYED]");
        assert!(prompt.contains(&line), "missing line for {domain}");
    }
    let tail: Vec<&str> = prompt.trim_end().lines().rev().take(5).collect();
    assert_eq!(tail.last(), Some(&"STATUS: [OPEN or CLOSED or DELAYED]"));
}

#[test]
fn override_directory_template_is_rendered() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("evaluation-status.md"),
        "{{district_name}} on {{short_date}}\n{{evaluation_lines}}",
    )
    .unwrap();

    let now = monday_afternoon();
    let target = select_target_date(now);
    let vars = build_vars(&DELAWARE_CITY_SCHOOLS, &target, &clock_label(now));
    let engine = PromptEngine::new(Some(dir.path().to_string_lossy().to_string()));

    let prompt = engine.render(ParseMode::SourceEvaluation, &vars).unwrap();
    assert!(prompt.starts_with("Delaware City Schools on 12/15\nSOURCE_EVALUATION: dcs.k12.oh.us"));

    // Summary mode has no override in the directory and uses the default.
    let summary = engine.render(ParseMode::Summary, &vars).unwrap();
    assert!(summary.contains("SUMMARY:"));
}
