//! Input lines remembered across chat sessions.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

/// File name under the AgentForge directory.
pub(crate) const INPUT_HISTORY_FILE: &str = "input_history";

/// Oldest lines are dropped past this many.
pub(crate) const MAX_ENTRIES: usize = 1000;

/// Submitted input lines, oldest first, mirrored to a file.
///
/// Failing to read or write the file only loses history, so errors are
/// logged and otherwise ignored.
#[derive(Debug, Default)]
pub(crate) struct InputHistory {
    path: Option<PathBuf>,
    entries: Vec<String>,
}

impl InputHistory {
    /// Load from `path`; a missing file starts an empty history.
    pub fn load(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(text) => text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Cannot read input history {}: {}", path.display(), e);
                Vec::new()
            }
        };

        let mut history = Self {
            path: Some(path),
            entries,
        };
        history.drop_oldest();
        history
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Record a submitted line. Blank lines and immediate repeats are skipped.
    pub fn push(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || self.entries.last().is_some_and(|last| last == line) {
            return;
        }
        self.entries.push(line.to_string());
        let overflowed = self.drop_oldest();

        let Some(path) = &self.path else {
            return;
        };
        let result = if overflowed {
            rewrite(path, &self.entries)
        } else {
            append(path, line)
        };
        if let Err(e) = result {
            warn!("Cannot write input history {}: {}", path.display(), e);
        }
    }

    fn drop_oldest(&mut self) -> bool {
        let excess = self.entries.len().saturating_sub(MAX_ENTRIES);
        self.entries.drain(..excess);
        excess > 0
    }
}

fn append(path: &Path, line: &str) -> io::Result<()> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

fn rewrite(path: &Path, entries: &[String]) -> io::Result<()> {
    ensure_parent(path)?;
    let mut text = entries.join("\n");
    text.push('\n');
    fs::write(path, text)
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
