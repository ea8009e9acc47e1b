//! The allowed vocabulary.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::common::error::LexiconError;

/// Immutable set of allowed words, stored lower-cased.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: HashSet<String>,
}

impl Lexicon {
    /// Build from a newline-delimited source, one word per line.
    ///
    /// The last line is kept even without a trailing newline. A trailing
    /// `\r` is dropped so CRLF files work; blank lines are skipped.
    pub fn build(mut source: impl Read) -> Result<Self, LexiconError> {
        let mut content = String::new();
        source.read_to_string(&mut content)?;

        let words = content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.is_empty())
            .map(str::to_lowercase)
            .collect();

        Ok(Self { words })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LexiconError::Open {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::build(file)
    }

    /// Case-insensitive membership.
    pub fn exists(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}
