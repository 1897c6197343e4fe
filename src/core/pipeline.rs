use crate::adapters::{lang, pdf};
use crate::core::report;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::catalog::ModelCatalog;
use crate::domain::model::{Document, LanguageChoice, ToponymReport};
use crate::domain::ports::{EntityRecognizer, ModelLoader};
use crate::domain::services::{extract_toponyms, merge, Gazetteer};
use crate::utils::error::{Result, ToponymError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeSet;
use std::path::Path;

/// Loads the model mapped to `code`, or the default language's model when
/// that one cannot be loaded.
pub fn load_with_fallback<L: ModelLoader + ?Sized>(
    loader: &L,
    catalog: &ModelCatalog,
    code: &str,
) -> Result<Box<dyn EntityRecognizer>> {
    let model_id = catalog.model_for(code);
    match loader.load(model_id) {
        Ok(recognizer) => Ok(recognizer),
        Err(e) => {
            let fallback = catalog.default_model();
            if fallback == model_id {
                return Err(e);
            }
            tracing::debug!("Loading {} failed: {}", model_id, e);
            tracing::warn!(
                "Model '{}' not found. Falling back to {} model.",
                model_id,
                catalog.default_language()
            );
            loader.load(fallback)
        }
    }
}

pub struct ToponymPipeline<S: Storage, C: ConfigProvider, L: ModelLoader> {
    storage: S,
    config: C,
    loader: L,
    gazetteer: Gazetteer,
}

impl<S: Storage, C: ConfigProvider, L: ModelLoader> ToponymPipeline<S, C, L> {
    /// Reads the configured gazetteer up front. An unreadable file leaves
    /// the gazetteer empty.
    pub fn new(storage: S, config: C, loader: L) -> Self {
        let gazetteer = config
            .gazetteer_path()
            .map(Gazetteer::load_or_empty)
            .unwrap_or_default();
        Self {
            storage,
            config,
            loader,
            gazetteer,
        }
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    fn choose_language(&self, text: &str) -> LanguageChoice {
        match self.config.forced_language() {
            Some(code) => LanguageChoice {
                code: code.to_lowercase(),
                detected: false,
            },
            None => LanguageChoice {
                code: lang::detect_language(text, self.config.detection()),
                detected: true,
            },
        }
    }
}

#[async_trait]
impl<S: Storage, C: ConfigProvider, L: ModelLoader> Pipeline for ToponymPipeline<S, C, L> {
    async fn extract(&self) -> Result<Document> {
        let path = self
            .config
            .pdf_path()
            .ok_or_else(|| ToponymError::MissingConfigError {
                field: "pdf_path".to_string(),
            })?;
        pdf::extract_document(path)
    }

    async fn transform(&self, document: Document) -> Result<ToponymReport> {
        let language = self.choose_language(&document.text);
        let recognizer = load_with_fallback(&self.loader, self.config.catalog(), &language.code)?;

        let entities = recognizer.recognize(&document.text)?;
        tracing::debug!("{} entities recognised", entities.len());
        let ner_toponyms = extract_toponyms(&entities, &self.config.ner().labels);

        let gazetteer_matches = if self.gazetteer.is_empty() {
            BTreeSet::new()
        } else {
            self.gazetteer.match_text(&document.text)
        };

        let toponyms = merge(&ner_toponyms, &gazetteer_matches);

        Ok(ToponymReport {
            source: document.source.display().to_string(),
            page_count: document.page_count,
            language,
            model: recognizer.model_name().to_string(),
            ner_toponyms,
            gazetteer_matches,
            toponyms,
            gazetteer_entries: self.gazetteer.len(),
            generated_at: Utc::now(),
        })
    }

    async fn load(&self, report: &ToponymReport) -> Result<Vec<String>> {
        let stem = Path::new(&report.source)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");

        let mut written = Vec::new();
        for format in self.config.output_formats() {
            let data = report::render(report, format)?;
            let file_name = format!("{}_toponyms.{}", stem, format);
            written.push(self.storage.write_file(&file_name, &data).await?);
        }
        Ok(written)
    }
}
