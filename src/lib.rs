//! **intentedit** - batch line editing driven by declarative intent lines
//!
//! Each intent (modify, insert, delete, append, replace) addresses a file by
//! 1-based line numbers. A batch is parsed in full, ordered so that
//! line-shifting edits do not invalidate each other, and applied one intent
//! at a time with a snapshot of the target taken before every write.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Intent grammar, ordering and application
pub mod core {
    /// Intent model: command, target, range, payload
    pub mod intent;
    pub use intent::{Command, Intent, Literal, Payload, SourcedIntent};

    /// Parse and execution error taxonomy
    pub mod error;
    pub use error::{ErrorKind, ExecError, ParseError};

    /// Five-grammar intent line parser
    pub mod parser;
    pub use parser::{parse_intent_line, parse_intent_source};

    /// Structural protection for deletes (pluggable line predicate)
    pub mod guard;
    pub use guard::{LineGuard, PrefixGuard};

    /// In-memory line sequence mutation
    pub mod mutator;
    pub use mutator::{Mutation, apply_intent};

    /// Two-phase execution ordering with hazard detection
    pub mod schedule;
    pub use schedule::{Hazard, Phase, Schedule, schedule};

    /// Snapshot/load/persist collaborators (disk and dry-run)
    pub mod gateway;
    pub use gateway::{FileGateway, FsGateway, PreviewGateway};

    /// Per-intent load, guard, snapshot, mutate, persist cycle
    pub mod executor;
    pub use executor::{Executor, Outcome};

    /// Status lines and batch summary
    pub mod report;

    /// Intent-file batch runner behind `run`, `check` and `plan`
    pub mod batch;
    pub use batch::{ParsedBatch, execute_batch};
}

/// Infrastructure - Configuration and file I/O
pub mod infra {
    /// Configuration management with TOML support
    pub mod config;
    pub use self::config::{Config, GuardConfig, load_config};

    /// Line buffers, intent-source reading, atomic writes
    pub mod io;
    pub use io::{LineBuffer, Newline};
}

pub use cli::{AppContext, Cli, Commands};
pub use crate::core::{Command, Intent, Payload, parse_intent_line, schedule};
pub use infra::{Config, load_config};
