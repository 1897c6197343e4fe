use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Raw text pulled out of a PDF.
#[derive(Debug, Clone)]
pub struct Document {
    pub source: PathBuf,
    pub text: String,
    pub page_count: usize,
}

/// A span the NER model tagged. `label` carries no `B-`/`I-` prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub score: f32,
}

impl Entity {
    pub fn new(
        text: impl Into<String>,
        label: impl Into<String>,
        start: usize,
        end: usize,
        score: f32,
    ) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            start,
            end,
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageChoice {
    pub code: String,
    /// false when forced on the command line
    pub detected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToponymReport {
    pub source: String,
    pub page_count: usize,
    pub language: LanguageChoice,
    pub model: String,
    pub ner_toponyms: BTreeSet<String>,
    pub gazetteer_matches: BTreeSet<String>,
    pub toponyms: BTreeSet<String>,
    /// Size of the gazetteer that was matched, zero when none was given.
    pub gazetteer_entries: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToponymSource {
    Ner,
    Gazetteer,
    Both,
}

impl ToponymSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToponymSource::Ner => "ner",
            ToponymSource::Gazetteer => "gazetteer",
            ToponymSource::Both => "both",
        }
    }
}

impl ToponymReport {
    pub fn source_of(&self, toponym: &str) -> Option<ToponymSource> {
        match (
            self.ner_toponyms.contains(toponym),
            self.gazetteer_matches.contains(toponym),
        ) {
            (true, true) => Some(ToponymSource::Both),
            (true, false) => Some(ToponymSource::Ner),
            (false, true) => Some(ToponymSource::Gazetteer),
            (false, false) => None,
        }
    }
}

/// Local paths of a cached ONNX token-classification model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model_id: String,
    pub onnx: PathBuf,
    pub tokenizer: PathBuf,
    pub config: Option<PathBuf>,
}
