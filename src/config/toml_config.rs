use crate::domain::catalog::{ModelCatalog, DEFAULT_LANGUAGE};
use crate::domain::services::TOPONYM_LABELS;
use crate::utils::error::{Result, ToponymError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const OUTPUT_FORMATS: &[&str] = &["txt", "csv", "json"];

/// Settings file. Every section and field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Language code to hub model id, layered over the built-in mapping.
    pub models: BTreeMap<String, String>,
    pub detection: DetectionSettings,
    pub ner: NerSettings,
    pub setup: SetupSettings,
    pub hub: HubSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    pub default_language: String,
    /// Leading characters handed to the detector.
    pub sample_chars: usize,
    /// Shorter samples are not worth detecting and get the default language.
    pub min_sample_chars: usize,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            sample_chars: 1000,
            min_sample_chars: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NerSettings {
    pub labels: Vec<String>,
    pub max_chunk_chars: usize,
    pub max_sequence_tokens: usize,
    pub num_threads: usize,
}

impl Default for NerSettings {
    fn default() -> Self {
        Self {
            labels: TOPONYM_LABELS.iter().map(|l| l.to_string()).collect(),
            max_chunk_chars: 1000,
            max_sequence_tokens: 512,
            num_threads: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupSettings {
    pub essential_languages: Vec<String>,
    pub marker_file: Option<PathBuf>,
}

impl Default for SetupSettings {
    fn default() -> Self {
        Self {
            essential_languages: vec!["en".to_string(), "it".to_string()],
            marker_file: None,
        }
    }
}

impl SetupSettings {
    /// Configured marker path, else `<data dir>/geonames-pdf/.setup_complete`.
    pub fn marker_path(&self) -> PathBuf {
        self.marker_file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("geonames-pdf")
                .join(".setup_complete")
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HubSettings {
    pub endpoint: Option<String>,
    pub cache_dir: Option<PathBuf>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: Option<PathBuf>,
    pub formats: Vec<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ToponymError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ToponymError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn catalog(&self) -> ModelCatalog {
        ModelCatalog::with_overrides(self.models.clone(), &self.detection.default_language)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_language_code(
            "detection.default_language",
            &self.detection.default_language,
        )?;
        validation::validate_range("detection.sample_chars", self.detection.sample_chars, 1, 1_000_000)?;
        validation::validate_positive_number("ner.max_chunk_chars", self.ner.max_chunk_chars, 1)?;
        validation::validate_range("ner.max_sequence_tokens", self.ner.max_sequence_tokens, 8, 8192)?;
        validation::validate_positive_number("ner.num_threads", self.ner.num_threads, 1)?;
        if self.ner.labels.is_empty() {
            return Err(ToponymError::InvalidConfigValueError {
                field: "ner.labels".to_string(),
                value: "[]".to_string(),
                reason: "At least one entity label is required".to_string(),
            });
        }

        for (code, model) in &self.models {
            validation::validate_language_code("models", &code.to_lowercase())?;
            validation::validate_non_empty_string(&format!("models.{}", code), model)?;
        }
        for code in &self.setup.essential_languages {
            validation::validate_language_code("setup.essential_languages", code)?;
        }

        if let Some(endpoint) = &self.hub.endpoint {
            validation::validate_url("hub.endpoint", endpoint)?;
        }
        if let Some(dir) = &self.output.dir {
            validation::validate_path("output.dir", &dir.to_string_lossy())?;
        }
        validation::validate_output_formats("output.formats", &self.output.formats, OUTPUT_FORMATS)?;

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
