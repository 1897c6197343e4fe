pub mod cli;
pub mod toml_config;

use crate::domain::catalog::ModelCatalog;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};
use toml_config::{DetectionSettings, NerSettings, TomlConfig};

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_CONFIG_FILE: &str = "geonames.toml";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "geonames-pdf")]
#[command(version, about = "Extract toponyms (place names) from PDF files using named-entity recognition")]
pub struct CliConfig {
    /// Path to the PDF file to process
    pub pdf_path: Option<PathBuf>,

    /// Force a language (en, it, ...). Auto-detected when omitted
    #[arg(short, long)]
    pub language: Option<String>,

    /// List the configured languages and whether their models are installed, then exit
    #[arg(long)]
    pub list_languages: bool,

    /// Install the model for a language code (e.g. it, es, fr, de), then exit
    #[arg(long, value_name = "LANG_CODE")]
    pub install_language: Option<String>,

    /// Skip the first-run setup check
    #[arg(long)]
    pub skip_setup: bool,

    /// Answer yes to the first-run installation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Gazetteer file (one place name per line) matched literally against the text
    #[arg(long)]
    pub gazetteer: Option<PathBuf>,

    /// Settings file (default: ./geonames.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the report into this directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Report formats written to the output directory
    #[arg(short, long, value_delimiter = ',')]
    pub format: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Log CPU and memory usage per stage
    #[arg(long)]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Settings file named on the command line, else `geonames.toml` if present.
    pub fn load_settings(&self) -> Result<TomlConfig> {
        match &self.config {
            Some(path) => TomlConfig::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                TomlConfig::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(TomlConfig::default()),
        }
    }

    /// Settings with command-line overrides applied.
    pub fn into_app_config(self, mut settings: TomlConfig) -> AppConfig {
        if self.output_dir.is_some() {
            settings.output.dir = self.output_dir;
        }
        if !self.format.is_empty() {
            settings.output.formats = self.format;
        }
        if settings.output.dir.is_some() && settings.output.formats.is_empty() {
            settings.output.formats = vec!["txt".to_string()];
        }

        let mut config = AppConfig::new(settings);
        config.pdf_path = self.pdf_path;
        config.language = self.language.map(|l| l.to_lowercase());
        config.gazetteer = self.gazetteer;
        config
    }
}

/// Effective configuration of one run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pdf_path: Option<PathBuf>,
    pub language: Option<String>,
    pub gazetteer: Option<PathBuf>,
    pub settings: TomlConfig,
    catalog: ModelCatalog,
}

impl AppConfig {
    pub fn new(settings: TomlConfig) -> Self {
        let catalog = settings.catalog();
        Self {
            pdf_path: None,
            language: None,
            gazetteer: None,
            settings,
            catalog,
        }
    }

    pub fn with_pdf(mut self, path: impl Into<PathBuf>) -> Self {
        self.pdf_path = Some(path.into());
        self
    }

    pub fn with_language(mut self, code: &str) -> Self {
        self.language = Some(code.to_lowercase());
        self
    }

    pub fn with_gazetteer(mut self, path: impl Into<PathBuf>) -> Self {
        self.gazetteer = Some(path.into());
        self
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.settings.output.dir.as_deref()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(TomlConfig::default())
    }
}

impl ConfigProvider for AppConfig {
    fn pdf_path(&self) -> Option<&Path> {
        self.pdf_path.as_deref()
    }

    fn forced_language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    fn gazetteer_path(&self) -> Option<&Path> {
        self.gazetteer.as_deref()
    }

    fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    fn detection(&self) -> &DetectionSettings {
        &self.settings.detection
    }

    fn ner(&self) -> &NerSettings {
        &self.settings.ner
    }

    fn output_formats(&self) -> &[String] {
        &self.settings.output.formats
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.settings.validate()?;
        if let Some(code) = &self.language {
            validation::validate_language_code("language", code)?;
        }
        if let Some(path) = &self.gazetteer {
            validation::validate_path("gazetteer", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_language_is_lowercased() {
        let config = AppConfig::default().with_language("IT");
        assert_eq!(config.forced_language(), Some("it"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_forced_language_fails_validation() {
        let config = AppConfig::default().with_language("italian");
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides_settings() {
        let cli = CliConfig::parse_from([
            "geonames-pdf",
            "report.pdf",
            "-l",
            "FR",
            "--gazetteer",
            "places.txt",
            "--output-dir",
            "out",
            "--format",
            "csv,json",
        ]);
        let config = cli.into_app_config(TomlConfig::default());

        assert_eq!(config.pdf_path(), Some(Path::new("report.pdf")));
        assert_eq!(config.forced_language(), Some("fr"));
        assert_eq!(config.gazetteer_path(), Some(Path::new("places.txt")));
        assert_eq!(config.output_dir(), Some(Path::new("out")));
        assert_eq!(config.output_formats(), &["csv".to_string(), "json".to_string()]);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_output_dir_defaults_to_text_format() {
        let cli = CliConfig::parse_from(["geonames-pdf", "a.pdf", "-o", "out"]);
        let config = cli.into_app_config(TomlConfig::default());
        assert_eq!(config.output_formats(), &["txt".to_string()]);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_pdf_path_is_optional_for_setup_commands() {
        let cli = CliConfig::parse_from(["geonames-pdf", "--list-languages"]);
        assert!(cli.list_languages);
        assert!(cli.pdf_path.is_none());

        let cli = CliConfig::parse_from(["geonames-pdf", "--install-language", "es"]);
        assert_eq!(cli.install_language.as_deref(), Some("es"));
    }
}
