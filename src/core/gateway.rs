//! Snapshot and persistence of target files.
//!
//! [`FsGateway`] works on disk and keeps timestamped snapshots under a
//! configured backup directory. [`PreviewGateway`] backs `--dry-run`: it reads
//! from disk once per file and keeps every later write in memory.

use chrono::Local;
use indexmap::IndexMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::infra::io::{LineBuffer, read_lines, write_atomic};

/// Storage collaborator for the executor
pub trait FileGateway {
    /// Copy the current content of `file` aside; returns the snapshot location.
    fn snapshot(&mut self, file: &Path) -> io::Result<PathBuf>;

    fn load(&mut self, file: &Path) -> io::Result<LineBuffer>;

    fn persist(&mut self, file: &Path, buf: &LineBuffer) -> io::Result<()>;
}

/// Disk-backed gateway
#[derive(Debug, Clone)]
pub struct FsGateway {
    backup_dir: PathBuf,
}

impl FsGateway {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }
}

impl FileGateway for FsGateway {
    fn snapshot(&mut self, file: &Path) -> io::Result<PathBuf> {
        // Read first: a missing source must fail before anything is created
        let content = fs::read(file)?;
        fs::create_dir_all(&self.backup_dir)?;
        let path = snapshot_path(&self.backup_dir, file)?;
        fs::write(&path, content)?;
        debug!(source = %file.display(), backup = %path.display(), "snapshot written");
        Ok(path)
    }

    fn load(&mut self, file: &Path) -> io::Result<LineBuffer> {
        read_lines(file)
    }

    fn persist(&mut self, file: &Path, buf: &LineBuffer) -> io::Result<()> {
        write_atomic(file, buf.to_text().as_bytes())
    }
}

/// `<dir>/<name>_backup_<YYYYmmdd_HHMMSS_mmm>[_n]`, first name not yet taken.
fn snapshot_path(dir: &Path, file: &Path) -> io::Result<PathBuf> {
    let name = file.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("no file name in {}", file.display()),
        )
    })?;
    let stamp = Local::now().format("%Y%m%d_%H%M%S_%3f");
    let base = format!("{}_backup_{stamp}", name.to_string_lossy());

    let mut candidate = dir.join(&base);
    let mut n = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{base}_{n}"));
        n += 1;
    }
    Ok(candidate)
}

/// In-memory overlay used for dry runs
#[derive(Debug, Default)]
pub struct PreviewGateway {
    files: IndexMap<PathBuf, PreviewFile>,
}

#[derive(Debug)]
struct PreviewFile {
    original: String,
    current: LineBuffer,
}

/// Before/after text for one file touched during a dry run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewChange {
    pub file: PathBuf,
    pub before: String,
    pub after: String,
}

impl PreviewGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, file: &Path) -> io::Result<&mut PreviewFile> {
        if !self.files.contains_key(file) {
            let original = fs::read_to_string(file)?;
            let current = LineBuffer::from_text(&original);
            self.files
                .insert(file.to_path_buf(), PreviewFile { original, current });
        }
        // Inserted above when absent
        self.files
            .get_mut(file)
            .ok_or_else(|| io::Error::other("preview entry vanished"))
    }

    /// Files whose content would change, in first-touched order.
    pub fn changes(&self) -> Vec<PreviewChange> {
        self.files
            .iter()
            .filter_map(|(file, pf)| {
                let after = pf.current.to_text();
                (after != pf.original).then(|| PreviewChange {
                    file: file.clone(),
                    before: pf.original.clone(),
                    after,
                })
            })
            .collect()
    }
}

impl FileGateway for PreviewGateway {
    fn snapshot(&mut self, file: &Path) -> io::Result<PathBuf> {
        // Nothing is copied; the source still has to be readable
        self.entry(file)?;
        Ok(PathBuf::from("(dry run)"))
    }

    fn load(&mut self, file: &Path) -> io::Result<LineBuffer> {
        Ok(self.entry(file)?.current.clone())
    }

    fn persist(&mut self, file: &Path, buf: &LineBuffer) -> io::Result<()> {
        self.entry(file)?.current = buf.clone();
        Ok(())
    }
}
