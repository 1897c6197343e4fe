use crate::config::toml_config::HubSettings;
use crate::domain::model::ModelFiles;
use crate::domain::ports::ModelHub;
use crate::utils::error::{Result, ToponymError};
use async_trait::async_trait;
use hf_hub::api::tokio::{Api, ApiBuilder};
use hf_hub::Cache;

/// Exported graphs live at the repo root or under `onnx/`, depending on the publisher.
pub const ONNX_CANDIDATES: &[&str] = &["model.onnx", "onnx/model.onnx"];
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const CONFIG_FILE: &str = "config.json";

/// Hugging Face Hub with its local cache.
pub struct HfModelHub {
    cache: Cache,
    endpoint: Option<String>,
    token: Option<String>,
    progress: bool,
}

impl HfModelHub {
    pub fn new(settings: &HubSettings) -> Self {
        let cache = match &settings.cache_dir {
            Some(dir) => Cache::new(dir.clone()),
            None => Cache::from_env(),
        };
        Self {
            cache,
            endpoint: settings.endpoint.clone(),
            token: settings.token.clone(),
            progress: true,
        }
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    fn api(&self, model_id: &str) -> Result<Api> {
        let mut builder = ApiBuilder::new()
            .with_cache_dir(self.cache.path().clone())
            .with_progress(self.progress);
        if let Some(endpoint) = &self.endpoint {
            builder = builder.with_endpoint(endpoint.clone());
        }
        if self.token.is_some() {
            builder = builder.with_token(self.token.clone());
        }
        builder.build().map_err(|e| ToponymError::DownloadError {
            model: model_id.to_string(),
            message: format!("failed to initialise the hub client: {}", e),
        })
    }
}

#[async_trait]
impl ModelHub for HfModelHub {
    fn locate(&self, model_id: &str) -> Option<ModelFiles> {
        let repo = self.cache.model(model_id.to_string());
        let onnx = ONNX_CANDIDATES.iter().find_map(|file| repo.get(file))?;
        let tokenizer = repo.get(TOKENIZER_FILE)?;
        Some(ModelFiles {
            model_id: model_id.to_string(),
            onnx,
            tokenizer,
            config: repo.get(CONFIG_FILE),
        })
    }

    async fn fetch(&self, model_id: &str) -> Result<ModelFiles> {
        let api = self.api(model_id)?;
        let repo = api.model(model_id.to_string());

        let mut onnx = None;
        let mut failures = Vec::new();
        for candidate in ONNX_CANDIDATES {
            tracing::debug!("Fetching {}/{}", model_id, candidate);
            match repo.get(candidate).await {
                Ok(path) => {
                    onnx = Some(path);
                    break;
                }
                Err(e) => failures.push(format!("{}: {}", candidate, e)),
            }
        }
        let onnx = onnx.ok_or_else(|| ToponymError::DownloadError {
            model: model_id.to_string(),
            message: format!("no ONNX graph found ({})", failures.join("; ")),
        })?;

        let tokenizer = repo
            .get(TOKENIZER_FILE)
            .await
            .map_err(|e| ToponymError::DownloadError {
                model: model_id.to_string(),
                message: format!("{}: {}", TOKENIZER_FILE, e),
            })?;

        // id2label falls back to CoNLL-03 when the repo has no config
        let config = match repo.get(CONFIG_FILE).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("{} has no {}: {}", model_id, CONFIG_FILE, e);
                None
            }
        };

        Ok(ModelFiles {
            model_id: model_id.to_string(),
            onnx,
            tokenizer,
            config,
        })
    }
}
