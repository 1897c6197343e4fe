use crate::domain::model::Entity;
use crate::utils::error::Result;
use regex::{RegexSet, RegexSetBuilder};
use std::collections::BTreeSet;
use std::path::Path;

/// Geo-political entities, locations and facilities.
pub const TOPONYM_LABELS: &[&str] = &["GPE", "LOC", "FAC"];

/// Unique, sorted texts of the entities whose label is in `labels`.
pub fn extract_toponyms<S: AsRef<str>>(entities: &[Entity], labels: &[S]) -> BTreeSet<String> {
    entities
        .iter()
        .filter(|e| labels.iter().any(|l| l.as_ref() == e.label))
        .map(|e| e.text.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn merge(ner: &BTreeSet<String>, gazetteer_matches: &BTreeSet<String>) -> BTreeSet<String> {
    ner.union(gazetteer_matches).cloned().collect()
}

/// Reference list of place names matched literally against text. All
/// entries are compiled into one case-insensitive `RegexSet` when the list is
/// built, so matching is a single pass over the text.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: Vec<String>,
    patterns: RegexSet,
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            patterns: RegexSet::empty(),
        }
    }
}

impl Gazetteer {
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<String> = lines
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let patterns = RegexSetBuilder::new(
            entries
                .iter()
                .map(|place| format!(r"\b{}\b", regex::escape(place))),
        )
        .case_insensitive(true)
        .build()?;
        Ok(Self { entries, patterns })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_lines(content.lines())
    }

    /// Reads `path`, or logs the failure and returns an empty gazetteer.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(gazetteer) => {
                tracing::info!(
                    "Loaded {} gazetteer entries from {}",
                    gazetteer.len(),
                    path.display()
                );
                gazetteer
            }
            Err(e) => {
                tracing::error!("Error loading gazetteer {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries found in `text` as whole words, ignoring case. Matches are
    /// reported in the gazetteer's own spelling.
    pub fn match_text(&self, text: &str) -> BTreeSet<String> {
        let matches: BTreeSet<String> = self
            .patterns
            .matches(text)
            .into_iter()
            .map(|idx| self.entries[idx].clone())
            .collect();
        tracing::debug!(
            "Gazetteer matched {} of {} entries",
            matches.len(),
            self.entries.len()
        );
        matches
    }
}

/// Splits `text` at whitespace into pieces of at most `max_chars` characters.
/// Returns each piece with its byte offset into `text`. A single word longer
/// than `max_chars` becomes its own piece.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<(usize, &str)> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut chars_in_chunk = 0;

    for (offset, word) in words_with_offsets(text) {
        let word_chars = word.chars().count();
        match start {
            Some(s) => {
                // the whitespace between the previous word and this one counts too
                let grown = chars_in_chunk + text[end..offset].chars().count() + word_chars;
                if grown > max_chars {
                    chunks.push((s, &text[s..end]));
                    start = Some(offset);
                    chars_in_chunk = word_chars;
                } else {
                    chars_in_chunk = grown;
                }
            }
            None => {
                start = Some(offset);
                chars_in_chunk = word_chars;
            }
        }
        end = offset + word.len();
    }

    if let Some(s) = start {
        chunks.push((s, &text[s..end]));
    }
    chunks
}

fn words_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_whitespace().map(move |w| {
        let offset = w.as_ptr() as usize - text.as_ptr() as usize;
        (offset, w)
    })
}
