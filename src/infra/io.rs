use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

/// Line terminator style of a loaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Newline {
    #[default]
    Lf,
    CrLf,
}

impl Newline {
    pub fn as_str(self) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::CrLf => "\r\n",
        }
    }

    /// Style of the first terminator in `s`; LF when there is none.
    pub fn detect(s: &str) -> Self {
        match s.find('\n') {
            Some(i) if i > 0 && s.as_bytes()[i - 1] == b'\r' => Newline::CrLf,
            _ => Newline::Lf,
        }
    }
}

/// A file's content as terminator-free lines
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineBuffer {
    pub lines: Vec<String>,
    pub newline: Newline,
}

impl LineBuffer {
    pub fn from_text(content: &str) -> Self {
        let newline = Newline::detect(content);
        let lines = content
            .lines()
            .map(|s| s.trim_end_matches('\r').to_string())
            .collect();
        Self { lines, newline }
    }

    /// Every line followed by the buffer's terminator.
    pub fn to_text(&self) -> String {
        let nl = self.newline.as_str();
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 2).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push_str(nl);
        }
        out
    }
}

pub fn read_lines(path: &Path) -> io::Result<LineBuffer> {
    let content = fs::read_to_string(path)?;
    Ok(LineBuffer::from_text(&content))
}

/// Read an intent source; `-` means stdin.
pub fn read_intent_source(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut s = String::new();
        io::stdin()
            .read_to_string(&mut s)
            .context("Failed to read intents from stdin")?;
        return Ok(s);
    }
    fs::read_to_string(path)
        .with_context(|| format!("Intent file '{}' not found or unreadable", path.display()))
}

/// Atomic write with robust temp file strategy
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    // Prefer same-dir tempfile; fall back to OS temp on EPERM/ENOENT
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // Preserve original permissions
    let perms = fs::metadata(path).map(|m| m.permissions()).ok();

    let tmp = match tempfile::NamedTempFile::new_in(dir) {
        Ok(t) => t,
        Err(_) => tempfile::NamedTempFile::new()?,
    };

    let mut file = tmp.as_file();
    file.write_all(data)?;
    file.sync_all()?;

    if let Some(perms) = perms {
        fs::set_permissions(tmp.path(), perms)?;
    }

    // Atomically replace the destination
    if let Err(e) = tmp.persist(path) {
        // Different filesystem? Try copy fallback
        fs::copy(e.file.path(), path)?;
    }

    // fsync parent dir to ensure durability on Unix
    #[cfg(unix)]
    if let Ok(parent) = fs::File::open(dir) {
        let _ = parent.sync_all();
    }

    Ok(())
}
