//! Intent-file batch runner: parse everything, schedule, execute, report.

use anyhow::{Result, bail};
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::path::PathBuf;
use tracing::info;

use crate::cli::{AppContext, CheckArgs, PlanArgs, RunArgs};
use crate::core::error::ParseError;
use crate::core::executor::Executor;
use crate::core::gateway::{FileGateway, FsGateway, PreviewGateway};
use crate::core::guard::{LineGuard, PrefixGuard};
use crate::core::intent::SourcedIntent;
use crate::core::parser::parse_intent_source;
use crate::core::report::{BatchSummary, Reporter};
use crate::core::schedule::{Hazard, Phase, Schedule, schedule};
use crate::infra::config::{Config, load_config};
use crate::infra::io::read_intent_source;

/// Exit code when at least one intent was malformed or failed
pub const EXIT_INTENT_ERRORS: i32 = 2;
/// Exit code when the batch could not start at all
pub const EXIT_BATCH_FAILED: i32 = 3;

/// Parsed intent source split into usable intents and per-line errors
#[derive(Debug, Default)]
pub struct ParsedBatch {
    pub intents: Vec<SourcedIntent>,
    pub errors: Vec<(usize, ParseError)>,
}

impl ParsedBatch {
    pub fn from_source(src: &str) -> Self {
        let mut batch = Self::default();
        for item in parse_intent_source(src) {
            match item {
                Ok(s) => batch.intents.push(s),
                Err(e) => batch.errors.push(e),
            }
        }
        batch
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty() && self.errors.is_empty()
    }
}

/// Run a parsed batch to completion; no single intent aborts the rest.
pub fn execute_batch<G: FileGateway>(
    batch: ParsedBatch,
    gateway: &mut G,
    guard: &dyn LineGuard,
    reporter: &Reporter,
) -> BatchSummary {
    let mut summary = BatchSummary {
        malformed: batch.errors.len(),
        ..Default::default()
    };
    for (line_no, err) in &batch.errors {
        reporter.report_malformed(*line_no, err);
    }

    let plan = schedule(batch.intents);
    for hazard in plan.hazards() {
        reporter.report_hazard(&hazard);
    }

    let mut executor = Executor::new(gateway, guard);
    for (_, s) in plan.steps() {
        let outcome = executor.execute(&s.intent);
        reporter.report_outcome(s, &outcome);
        summary.record(&outcome);
    }

    info!(
        applied = summary.applied,
        refused = summary.refused,
        failed = summary.failed_total(),
        malformed = summary.malformed,
        "batch finished"
    );
    summary
}

/// Load config and the intent source shared by run/check/plan.
fn load_batch(input: Option<PathBuf>, ctx: &AppContext) -> Result<(Config, ParsedBatch)> {
    let config = load_config(ctx.config.as_deref())?;
    let path = match input {
        Some(p) => p,
        None => config.resolved_intent_file()?,
    };
    let src = read_intent_source(&path)?;
    let batch = ParsedBatch::from_source(&src);
    if batch.is_empty() {
        bail!("No intents found in {}", path.display());
    }
    Ok((config, batch))
}

pub fn run(args: RunArgs, ctx: &AppContext) -> Result<i32> {
    let (config, batch) = load_batch(args.intent_file, ctx)?;
    let reporter = Reporter::new(ctx);
    let guard = PrefixGuard::from_config(&config.guard);

    let summary = if ctx.dry_run {
        let mut gateway = PreviewGateway::new();
        let summary = execute_batch(batch, &mut gateway, &guard, &reporter);
        for change in gateway.changes() {
            reporter.diff(&change.file, &unified_diff(&change.before, &change.after));
        }
        reporter.note("DRY RUN: no files or backups were written");
        summary
    } else {
        let mut gateway = FsGateway::new(config.resolved_backup_dir()?);
        execute_batch(batch, &mut gateway, &guard, &reporter)
    };

    reporter.report_summary(&summary);
    Ok(if summary.has_errors() {
        EXIT_INTENT_ERRORS
    } else {
        0
    })
}

pub fn check(args: CheckArgs, ctx: &AppContext) -> Result<i32> {
    let (_, batch) = load_batch(args.intent_file, ctx)?;
    let reporter = Reporter::new(ctx);

    for (line_no, err) in &batch.errors {
        reporter.report_malformed(*line_no, err);
    }
    reporter.note(format!(
        "{} valid intent(s), {} malformed",
        batch.intents.len(),
        batch.errors.len()
    ));

    Ok(if batch.errors.is_empty() {
        0
    } else {
        EXIT_INTENT_ERRORS
    })
}

#[derive(Debug, Serialize)]
struct PlanStep<'a> {
    step: usize,
    phase: Phase,
    #[serde(flatten)]
    intent: &'a SourcedIntent,
}

#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    steps: Vec<PlanStep<'a>>,
    hazards: Vec<Hazard>,
    malformed: Vec<MalformedEntry>,
}

#[derive(Debug, Serialize)]
struct MalformedEntry {
    line_no: usize,
    error: String,
}

pub fn plan(args: PlanArgs, ctx: &AppContext) -> Result<i32> {
    let (_, batch) = load_batch(args.intent_file, ctx)?;
    let reporter = Reporter::new(ctx);
    let malformed: Vec<MalformedEntry> = batch
        .errors
        .iter()
        .map(|(line_no, e)| MalformedEntry {
            line_no: *line_no,
            error: e.to_string(),
        })
        .collect();
    let exit = if malformed.is_empty() {
        0
    } else {
        EXIT_INTENT_ERRORS
    };

    let plan: Schedule = schedule(batch.intents);
    let report = PlanReport {
        steps: plan
            .steps()
            .enumerate()
            .map(|(i, (phase, intent))| PlanStep {
                step: i + 1,
                phase,
                intent,
            })
            .collect(),
        hazards: plan.hazards(),
        malformed,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(exit);
    }

    for step in &report.steps {
        let i = &step.intent.intent;
        reporter.note(format!(
            "{:>3}. [{}] {} {} {} (intent line {})",
            step.step,
            match step.phase {
                Phase::NonShifting => "non-shifting",
                Phase::Shifting => "shifting",
            },
            i.command,
            i.target.display(),
            i.range_label(),
            step.intent.line_no
        ));
    }
    for hazard in &report.hazards {
        reporter.report_hazard(hazard);
    }
    for (line_no, err) in &batch.errors {
        reporter.report_malformed(*line_no, err);
    }
    Ok(exit)
}

/// Line diff between two file bodies, hunks separated by `...`.
pub fn unified_diff(original: &str, modified: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                output.push_str(sign);
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn quiet_reporter() -> Reporter {
        Reporter::new(&AppContext {
            quiet: true,
            no_color: true,
            dry_run: false,
            config: None,
        })
    }

    #[test]
    fn test_parsed_batch_keeps_going_past_bad_lines() {
        let batch = ParsedBatch::from_source("bogus\nappend a with x\nreplace a lines 1-1 with [1]\n");
        assert_eq!(batch.intents.len(), 1);
        let bad: Vec<usize> = batch.errors.iter().map(|(n, _)| *n).collect();
        assert_eq!(bad, vec![1, 3]);
    }

    #[test]
    fn test_execute_batch_orders_and_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let f = dir.path().join("f.txt");
        fs::write(&f, "1\n2\n3\n4\n5\n").unwrap();
        let p = f.display();

        let src = format!(
            "delete {p} from line 4 to 5\nmodify {p} at line 2 with two\nmodify {p} at line 40 with x\nnot an intent\n"
        );
        let mut gw = FsGateway::new(dir.path().join("backups"));
        let sum = execute_batch(
            ParsedBatch::from_source(&src),
            &mut gw,
            &PrefixGuard::default(),
            &quiet_reporter(),
        );

        assert_eq!(fs::read_to_string(&f).unwrap(), "1\ntwo\n3\n");
        assert_eq!(sum.applied, 2);
        assert_eq!(sum.failed_total(), 1);
        assert_eq!(sum.malformed, 1);
    }

    #[test]
    fn test_unified_diff_marks_changes() {
        let d = unified_diff("a\nb\nc\n", "a\nB\nc\n");
        assert!(d.contains("-b\n"));
        assert!(d.contains("+B\n"));
        assert!(unified_diff("same\n", "same\n").is_empty());
    }
}
