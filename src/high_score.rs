//! High-score persistence: one decimal integer in a plain text file.

use std::path::{Path, PathBuf};

/// `$HOME/.alien_invasion_high_score`, or the working directory when
/// `HOME` is unset.
pub fn default_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".alien_invasion_high_score")
}

#[derive(Clone, Debug)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        HighScoreStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: a missing file means no score yet, an unreadable or
    /// garbled one is logged and treated as 0.
    pub fn load(&self) -> u64 {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => text.trim().parse().unwrap_or_else(|err| {
                tracing::warn!(path = %self.path.display(), %err, "ignoring corrupt high score file");
                0
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => 0,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "could not read high score file");
                0
            }
        }
    }

    /// Overwrite the file with `score`.
    pub fn save(&self, score: u64) -> std::io::Result<()> {
        std::fs::write(&self.path, score.to_string())?;
        tracing::info!(path = %self.path.display(), score, "high score saved");
        Ok(())
    }
}

impl Default for HighScoreStore {
    fn default() -> Self {
        HighScoreStore::new(default_path())
    }
}
