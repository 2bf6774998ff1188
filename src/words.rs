//! Word dictionary for typing objectives.

use std::path::Path;

use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::error::DataError;
use crate::job::WordDictionary;

const BUILTIN_WORDS: &[&str] = &[
    "engine", "wrench", "gasket", "piston", "battery", "bumper", "chassis", "clutch",
    "exhaust", "filter", "gearbox", "ignition", "radiator", "spark", "throttle", "valve",
];

/// A flat list of candidate words
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words
                .into_iter()
                .map(Into::into)
                .filter(|w: &String| !w.trim().is_empty())
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self { words: Vec::new() }
    }

    pub fn builtin() -> Self {
        Self::from_words(BUILTIN_WORDS.iter().copied())
    }

    /// Load one word per line; blank lines and `#` comments are skipped
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path).map_err(|source| DataError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let list = Self::from_words(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#'))
                .map(str::to_lowercase),
        );

        if list.is_empty() {
            warn!("Word list {:?} is empty", path);
        } else {
            info!("Loaded {} words from {:?}", list.len(), path);
        }
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WordDictionary for WordList {
    fn pick_random_word(&self) -> Option<String> {
        self.words.choose(&mut rand::thread_rng()).cloned()
    }
}
