//! Two-phase execution ordering
//!
//! Insert and Delete move every line below them, so running a batch in input
//! order corrupts later line numbers. The batch is split instead:
//!
//! 1. non-shifting (Modify, Append, Replace), ascending by `line_start`,
//!    Append last;
//! 2. shifting (Insert, Delete), descending by `line_start`.
//!
//! Both sorts are stable, and each phase is one global order across files.
//!
//! Replace can change a file's length but is still scheduled as non-shifting.
//! Every later same-file intent below it, in either phase, then addresses
//! stale positions. The order is kept as is; [`Schedule::hazards`] reports
//! those cases.

use serde::Serialize;
use std::cmp::Reverse;
use std::path::PathBuf;
use tracing::{debug, instrument, warn};

use crate::core::intent::{Command, Payload, SourcedIntent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NonShifting,
    Shifting,
}

/// Ordered batch ready for execution
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pub non_shifting: Vec<SourcedIntent>,
    pub shifting: Vec<SourcedIntent>,
}

/// Same-file interaction the ordering does not resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Hazard {
    /// A length-changing Replace runs before a later intent below it
    StaleAfterReplace {
        file: PathBuf,
        replace_line_no: usize,
        affected_line_no: usize,
        delta: isize,
    },
    /// Two intents address overlapping line ranges
    Overlap {
        file: PathBuf,
        first_line_no: usize,
        second_line_no: usize,
    },
}

impl std::fmt::Display for Hazard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hazard::StaleAfterReplace {
                file,
                replace_line_no,
                affected_line_no,
                delta,
            } => write!(
                f,
                "{}: replace (intent line {replace_line_no}) shifts later lines by {delta:+}; \
                 intent line {affected_line_no} will address stale positions",
                file.display()
            ),
            Hazard::Overlap {
                file,
                first_line_no,
                second_line_no,
            } => write!(
                f,
                "{}: intent lines {first_line_no} and {second_line_no} touch overlapping ranges",
                file.display()
            ),
        }
    }
}

/// Partition and order a parsed batch.
#[instrument(skip_all, fields(intents = intents.len()))]
pub fn schedule(intents: Vec<SourcedIntent>) -> Schedule {
    let (mut shifting, mut non_shifting): (Vec<_>, Vec<_>) = intents
        .into_iter()
        .partition(|s| s.intent.command.is_shifting());

    // None sorts after every line number in both phases
    non_shifting.sort_by_key(|s| (s.intent.line_start.is_none(), s.intent.line_start));
    shifting.sort_by_key(|s| Reverse(s.intent.line_start));

    debug!(
        non_shifting = non_shifting.len(),
        shifting = shifting.len(),
        "batch scheduled"
    );

    let schedule = Schedule {
        non_shifting,
        shifting,
    };
    for hazard in schedule.hazards() {
        warn!(%hazard, "unresolved same-file interaction");
    }
    schedule
}

impl Schedule {
    /// Execution order, tagged with phase.
    pub fn steps(&self) -> impl Iterator<Item = (Phase, &SourcedIntent)> {
        self.non_shifting
            .iter()
            .map(|s| (Phase::NonShifting, s))
            .chain(self.shifting.iter().map(|s| (Phase::Shifting, s)))
    }

    pub fn len(&self) -> usize {
        self.non_shifting.len() + self.shifting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Same-file interactions the two-phase order leaves unresolved.
    pub fn hazards(&self) -> Vec<Hazard> {
        let mut out = Vec::new();

        let ordered: Vec<&SourcedIntent> = self.steps().map(|(_, s)| s).collect();
        for (i, rep) in ordered.iter().enumerate() {
            let Some(delta) = replace_delta(rep) else {
                continue;
            };
            let Some(end) = rep.intent.line_end else {
                continue;
            };
            for later in &ordered[i + 1..] {
                if later.intent.target == rep.intent.target
                    && later.intent.line_start.is_some_and(|s| s > end)
                {
                    out.push(Hazard::StaleAfterReplace {
                        file: rep.intent.target.clone(),
                        replace_line_no: rep.line_no,
                        affected_line_no: later.line_no,
                        delta,
                    });
                }
            }
        }

        let ranged: Vec<(&SourcedIntent, (usize, usize))> = self
            .steps()
            .filter_map(|(_, s)| span_of(s).map(|r| (s, r)))
            .collect();
        for (i, (a, ra)) in ranged.iter().enumerate() {
            for (b, rb) in &ranged[i + 1..] {
                if a.intent.target == b.intent.target && ra.0 <= rb.1 && rb.0 <= ra.1 {
                    out.push(Hazard::Overlap {
                        file: a.intent.target.clone(),
                        first_line_no: a.line_no.min(b.line_no),
                        second_line_no: a.line_no.max(b.line_no),
                    });
                }
            }
        }

        out
    }
}

/// Net line-count change of a Replace, when non-zero.
fn replace_delta(s: &SourcedIntent) -> Option<isize> {
    let intent = &s.intent;
    if intent.command != Command::Replace {
        return None;
    }
    let (start, end) = (intent.line_start?, intent.line_end?);
    let Some(Payload::Lines(lines)) = &intent.payload else {
        return None;
    };
    let removed = end.checked_sub(start)? + 1;
    let delta = lines.len() as isize - removed as isize;
    (delta != 0).then_some(delta)
}

/// Inclusive range an intent addresses; a point for Modify/Insert.
fn span_of(s: &SourcedIntent) -> Option<(usize, usize)> {
    let start = s.intent.line_start?;
    let end = s.intent.line_end.unwrap_or(start);
    (start <= end).then_some((start, end))
}
