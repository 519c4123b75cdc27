//! Recorded game sessions: rounds discovered from a session directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

/// Summary artifact parsing.
pub mod summary;

pub use summary::{RoundSummary, parse_summary};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// One round of a recorded session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    /// Round number, 1-based.
    pub index: u32,
    /// Prompt word or phrase shown above the drawing.
    pub prompt: String,
    /// Rasterized drawing, when one was found.
    pub image_path: Option<PathBuf>,
    /// Wrong guess recorded for the round.
    pub guess: Option<String>,
}

/// Ordered rounds of one recorded game.
#[derive(Clone, Debug)]
pub struct Session {
    rounds: Vec<Round>,
}

#[derive(Default)]
struct RoundFiles {
    summary: Option<PathBuf>,
    images: Vec<PathBuf>,
}

impl Session {
    /// Build a session from rounds already in memory, ordered by round number.
    pub fn from_rounds(mut rounds: Vec<Round>) -> ReelResult<Self> {
        if rounds.is_empty() {
            return Err(ReelError::config("session has no rounds"));
        }
        rounds.sort_by_key(|r| r.index);
        Ok(Self { rounds })
    }

    /// Discover rounds in `dir` from `round_<N>_summary.txt` and `round_<N>_*.<image>` files.
    ///
    /// Unreadable or incomplete summaries keep the round with a `Round N` prompt. A missing
    /// directory or a directory without rounds is a configuration error.
    pub fn load(dir: &Path, max_rounds: Option<usize>) -> ReelResult<Self> {
        if !dir.is_dir() {
            return Err(ReelError::config(format!(
                "session directory '{}' does not exist",
                dir.display()
            )));
        }

        let mut found = BTreeMap::<u32, RoundFiles>::new();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("read session directory '{}'", dir.display()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("read entry in '{}'", dir.display()))?
                .path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some((number, rest)) = split_round_file_name(name) else {
                continue;
            };
            let files = found.entry(number).or_default();
            if rest.eq_ignore_ascii_case("summary.txt") {
                files.summary = Some(path);
            } else if has_image_extension(&path) {
                files.images.push(path);
            }
        }

        let mut rounds = Vec::with_capacity(found.len());
        for (number, mut files) in found {
            files.images.sort();
            rounds.push(load_round(dir, number, files));
            if max_rounds.is_some_and(|max| rounds.len() >= max) {
                break;
            }
        }

        if rounds.is_empty() {
            return Err(ReelError::config(format!(
                "no rounds found in session directory '{}'",
                dir.display()
            )));
        }
        tracing::info!(dir = %dir.display(), rounds = rounds.len(), "loaded session");
        Ok(Self { rounds })
    }

    /// Rounds in order.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Number of rounds.
    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }
}

fn load_round(dir: &Path, number: u32, files: RoundFiles) -> Round {
    let summary = match files.summary.as_deref() {
        Some(path) => match read_summary(path) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(round = number, error = %e, "unusable round summary");
                None
            }
        },
        None => {
            tracing::warn!(round = number, "round has no summary file");
            None
        }
    };

    let declared = summary
        .as_ref()
        .and_then(|s| s.image_file.as_deref())
        .map(|name| dir.join(name))
        .filter(|p| p.is_file());
    let image_path = declared.or_else(|| files.images.first().cloned());
    if image_path.is_none() {
        tracing::warn!(round = number, "round has no drawing image");
    }

    let prompt = summary
        .as_ref()
        .map(|s| s.prompt.clone())
        .unwrap_or_else(|| format!("Round {number}"));
    Round {
        index: number,
        prompt,
        image_path,
        guess: summary.and_then(|s| s.guess),
    }
}

fn read_summary(path: &Path) -> ReelResult<RoundSummary> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read summary '{}'", path.display()))?;
    parse_summary(&text)
}

fn split_round_file_name(name: &str) -> Option<(u32, &str)> {
    let rest = name.strip_prefix("round_")?;
    let (digits, tail) = rest.split_once('_')?;
    let number = digits.parse().ok()?;
    Some((number, tail))
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

#[cfg(test)]
#[path = "../../tests/unit/session/session.rs"]
mod tests;
