//! Runs one intent against its target file through a [`FileGateway`].

use std::path::PathBuf;
use tracing::{debug, instrument};

use crate::core::error::ExecError;
use crate::core::gateway::FileGateway;
use crate::core::guard::{LineGuard, ProtectedLine};
use crate::core::intent::Intent;
use crate::core::mutator::{Mutation, apply_intent};

/// What happened to one intent
#[derive(Debug)]
pub enum Outcome {
    Applied {
        backup: PathBuf,
        lines_before: usize,
        lines_after: usize,
    },
    /// Delete refused by the guard; no snapshot, no write
    Refused { protected: Vec<ProtectedLine> },
    Failed {
        error: ExecError,
        /// Snapshot taken before the failed attempt, if it got that far
        backup: Option<PathBuf>,
    },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

/// Executes intents one at a time; each call loads fresh file state.
pub struct Executor<'a, G: FileGateway> {
    gateway: &'a mut G,
    guard: &'a dyn LineGuard,
}

impl<'a, G: FileGateway> Executor<'a, G> {
    pub fn new(gateway: &'a mut G, guard: &'a dyn LineGuard) -> Self {
        Self { gateway, guard }
    }

    #[instrument(skip_all, fields(command = %intent.command, file = %intent.target.display()))]
    pub fn execute(&mut self, intent: &Intent) -> Outcome {
        let file = &intent.target;
        let source_unavailable = |source| ExecError::SourceUnavailable {
            file: file.clone(),
            source,
        };

        let mut buf = match self.gateway.load(file) {
            Ok(buf) => buf,
            Err(e) => {
                return Outcome::Failed {
                    error: source_unavailable(e),
                    backup: None,
                };
            }
        };
        let lines_before = buf.lines.len();
        debug!(lines = lines_before, "loaded");

        // Mutation is in memory only; the file on disk still holds the
        // pre-edit content when the snapshot below is taken.
        let result = apply_intent(&mut buf.lines, intent, self.guard);
        if let Ok(Mutation::Refused(protected)) = result {
            return Outcome::Refused { protected };
        }

        let backup = match self.gateway.snapshot(file) {
            Ok(path) => path,
            Err(e) => {
                return Outcome::Failed {
                    error: source_unavailable(e),
                    backup: None,
                };
            }
        };

        if let Err(error) = result {
            return Outcome::Failed {
                error,
                backup: Some(backup),
            };
        }

        if let Err(source) = self.gateway.persist(file, &buf) {
            return Outcome::Failed {
                error: ExecError::Persist {
                    file: file.clone(),
                    source,
                },
                backup: Some(backup),
            };
        }

        Outcome::Applied {
            backup,
            lines_before,
            lines_after: buf.lines.len(),
        }
    }
}
