//! Human-readable status lines for a batch run.
//!
//! Successes, refusals and hazards go to stdout and are hidden by `--quiet`;
//! failures always go to stderr.

use indexmap::IndexMap;
use owo_colors::{OwoColorize, Style};
use std::fmt::Display;
use std::path::Path;

use crate::cli::AppContext;
use crate::core::error::{ErrorKind, ParseError};
use crate::core::executor::Outcome;
use crate::core::intent::SourcedIntent;
use crate::core::schedule::Hazard;

/// Counts for the closing summary line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub applied: usize,
    pub refused: usize,
    pub malformed: usize,
    pub failed: IndexMap<ErrorKind, usize>,
}

impl BatchSummary {
    pub fn failed_total(&self) -> usize {
        self.failed.values().sum()
    }

    /// Any malformed line or failed intent
    pub fn has_errors(&self) -> bool {
        self.malformed > 0 || self.failed_total() > 0
    }

    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Applied { .. } => self.applied += 1,
            Outcome::Refused { .. } => self.refused += 1,
            Outcome::Failed { error, .. } => *self.failed.entry(error.kind()).or_default() += 1,
        }
    }
}

/// Formats and prints batch output
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    quiet: bool,
    color: bool,
}

impl Reporter {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            quiet: ctx.quiet,
            color: !ctx.no_color,
        }
    }

    fn paint<T: Display>(&self, text: T, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn out(&self, line: String) {
        if !self.quiet {
            println!("{line}");
        }
    }

    pub fn malformed_line(&self, line_no: usize, err: &ParseError) -> String {
        format!(
            "{} intent line {line_no}: {err}",
            self.paint("✗ MalformedIntent", Style::new().red().bold())
        )
    }

    pub fn outcome_lines(&self, s: &SourcedIntent, outcome: &Outcome) -> Vec<String> {
        let what = describe(s);
        match outcome {
            Outcome::Applied {
                backup,
                lines_before,
                lines_after,
            } => vec![format!(
                "{} {what}: {lines_before} -> {lines_after} lines (backup {})",
                self.paint("✓", Style::new().green()),
                backup.display()
            )],
            Outcome::Refused { protected } => {
                let mut v: Vec<String> = protected
                    .iter()
                    .map(|p| {
                        format!(
                            "{} protected or blank line {} in {}: '{}'",
                            self.paint("⚠", Style::new().yellow()),
                            p.line_no,
                            s.intent.target.display(),
                            p.text
                        )
                    })
                    .collect();
                v.push(format!(
                    "{} {what}: delete aborted to protect structural lines",
                    self.paint("✗ ProtectedRangeRefusal", Style::new().yellow().bold())
                ));
                v
            }
            Outcome::Failed { error, .. } => vec![format!(
                "{} {what}: {error}",
                self.paint(format!("✗ {:?}", error.kind()), Style::new().red().bold())
            )],
        }
    }

    pub fn hazard_line(&self, hazard: &Hazard) -> String {
        format!("{} {hazard}", self.paint("⚠ hazard", Style::new().yellow()))
    }

    pub fn summary_line(&self, sum: &BatchSummary) -> String {
        let failed = if sum.failed.is_empty() {
            "0".to_string()
        } else {
            sum.failed
                .iter()
                .map(|(k, n)| format!("{n} {k:?}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "{} applied, {} refused, {} malformed, failed: {failed}",
            sum.applied, sum.refused, sum.malformed
        )
    }

    pub fn report_malformed(&self, line_no: usize, err: &ParseError) {
        eprintln!("{}", self.malformed_line(line_no, err));
    }

    pub fn report_outcome(&self, s: &SourcedIntent, outcome: &Outcome) {
        for line in self.outcome_lines(s, outcome) {
            if outcome.is_failure() {
                eprintln!("{line}");
            } else {
                self.out(line);
            }
        }
    }

    pub fn report_hazard(&self, hazard: &Hazard) {
        self.out(self.hazard_line(hazard));
    }

    pub fn report_summary(&self, sum: &BatchSummary) {
        self.out(self.summary_line(sum));
    }

    pub fn note(&self, text: impl Display) {
        self.out(text.to_string());
    }

    pub fn diff(&self, file: &Path, diff: &str) {
        self.out(self.paint(format!("--- {}", file.display()), Style::new().bold()));
        for line in diff.lines() {
            let style = match line.chars().next() {
                Some('+') => Style::new().green(),
                Some('-') => Style::new().red(),
                _ => Style::new(),
            };
            self.out(self.paint(line, style));
        }
    }
}

/// `modify src/app.py (line 3, intent line 7)`
fn describe(s: &SourcedIntent) -> String {
    let i = &s.intent;
    let range = match (i.line_start, i.line_end) {
        (Some(_), Some(_)) => format!("lines {}", i.range_label()),
        (Some(_), None) => format!("line {}", i.range_label()),
        _ => "end of file".to_string(),
    };
    format!(
        "{} {} ({range}, intent line {})",
        i.command,
        i.target.display(),
        s.line_no
    )
}
