use crate::config::toml_config::{DetectionSettings, NerSettings};
use crate::domain::catalog::ModelCatalog;
use crate::domain::model::{Document, Entity, ModelFiles, ToponymReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn pdf_path(&self) -> Option<&Path>;
    fn forced_language(&self) -> Option<&str>;
    fn gazetteer_path(&self) -> Option<&Path>;
    fn catalog(&self) -> &ModelCatalog;
    fn detection(&self) -> &DetectionSettings;
    fn ner(&self) -> &NerSettings;
    fn output_formats(&self) -> &[String];
}

/// A loaded NER model.
pub trait EntityRecognizer: Send + Sync {
    fn model_name(&self) -> &str;
    fn recognize(&self, text: &str) -> Result<Vec<Entity>>;
}

/// Turns a model id into a ready recognizer, from local files only.
pub trait ModelLoader: Send + Sync {
    fn load(&self, model_id: &str) -> Result<Box<dyn EntityRecognizer>>;
}

/// Where model files come from: a local cache plus a remote to download from.
#[async_trait]
pub trait ModelHub: Send + Sync {
    fn locate(&self, model_id: &str) -> Option<ModelFiles>;

    async fn fetch(&self, model_id: &str) -> Result<ModelFiles>;

    fn is_installed(&self, model_id: &str) -> bool {
        self.locate(model_id).is_some()
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Document>;
    async fn transform(&self, document: Document) -> Result<ToponymReport>;
    /// Returns the paths written, if any.
    async fn load(&self, report: &ToponymReport) -> Result<Vec<String>>;
}
