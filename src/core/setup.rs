//! First-run checks and model installation.

use crate::config::toml_config::SetupSettings;
use crate::domain::catalog::ModelCatalog;
use crate::domain::ports::ModelHub;
use crate::utils::error::{Result, ToponymError};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

const RULE: &str = "======================================================================";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    Ready,
    Incomplete,
}

/// A language whose model is not in the local cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingModel {
    pub code: String,
    pub model_id: String,
}

pub struct SetupChecker<H: ModelHub> {
    hub: Arc<H>,
    catalog: ModelCatalog,
    essential_languages: Vec<String>,
    marker: PathBuf,
}

impl<H: ModelHub> SetupChecker<H> {
    pub fn new(hub: Arc<H>, catalog: ModelCatalog, settings: &SetupSettings) -> Self {
        Self {
            hub,
            catalog,
            essential_languages: settings.essential_languages.clone(),
            marker: settings.marker_path(),
        }
    }

    pub fn marker_path(&self) -> &PathBuf {
        &self.marker
    }

    pub fn is_complete(&self) -> bool {
        self.marker.is_file()
    }

    /// Essential languages whose model is missing. Languages sharing a model
    /// are reported once, under the first code.
    pub fn missing_models(&self) -> Vec<MissingModel> {
        let mut missing: Vec<MissingModel> = Vec::new();
        for code in &self.essential_languages {
            let model_id = self.catalog.model_for(code);
            if missing.iter().any(|m| m.model_id == model_id) {
                continue;
            }
            if !self.hub.is_installed(model_id) {
                missing.push(MissingModel {
                    code: code.clone(),
                    model_id: model_id.to_string(),
                });
            }
        }
        missing
    }

    fn write_marker(&self) -> Result<()> {
        if let Some(parent) = self.marker.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.marker, chrono::Utc::now().to_rfc3339())?;
        tracing::debug!("Setup marker written to {}", self.marker.display());
        Ok(())
    }

    pub async fn first_run<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        out: &mut W,
        assume_yes: bool,
    ) -> Result<SetupOutcome> {
        if self.is_complete() {
            return Ok(SetupOutcome::Ready);
        }

        writeln!(out, "{}", RULE)?;
        writeln!(out, "🚀 FIRST RUN SETUP - geonames-pdf")?;
        writeln!(out, "{}", RULE)?;
        writeln!(out, "\nChecking dependencies...\n")?;

        let missing = self.missing_models();
        if missing.is_empty() {
            writeln!(out, "✅ All dependencies are already installed!")?;
            self.write_marker()?;
            return Ok(SetupOutcome::Ready);
        }

        writeln!(out, "🌍 Missing essential language models:")?;
        for m in &missing {
            writeln!(out, "   ❌ [{}] {}", m.code, m.model_id)?;
        }
        writeln!(out)?;
        writeln!(out, "{}", RULE)?;
        writeln!(
            out,
            "The missing models must be downloaded before PDFs can be processed."
        )?;
        writeln!(
            out,
            "The download may take several minutes and several hundred MB per language."
        )?;
        writeln!(out, "{}", RULE)?;

        let accepted = if assume_yes {
            true
        } else {
            write!(
                out,
                "\n❓ Do you want to install missing dependencies now? (yes/no): "
            )?;
            out.flush()?;
            let mut answer = String::new();
            input.read_line(&mut answer)?;
            matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
        };

        if !accepted {
            writeln!(out, "\n⚠️  Setup cancelled. Please install the models manually:")?;
            for m in &missing {
                writeln!(out, "   geonames-pdf --install-language {}", m.code)?;
            }
            writeln!(out, "\nOr run the command again to retry automatic installation.\n")?;
            return Ok(SetupOutcome::Incomplete);
        }

        writeln!(out, "\n{}", RULE)?;
        writeln!(out, "📥 INSTALLING DEPENDENCIES")?;
        writeln!(out, "{}\n", RULE)?;

        let mut all_ok = true;
        for m in &missing {
            writeln!(out, "Installing [{}] language model ({})...", m.code, m.model_id)?;
            writeln!(out, "   This may take a few minutes...")?;
            out.flush()?;
            match self.hub.fetch(&m.model_id).await {
                Ok(_) => writeln!(out, "   ✅ [{}] model installed successfully!\n", m.code)?,
                Err(e) => {
                    tracing::error!("Installing {} failed: {}", m.model_id, e);
                    writeln!(out, "   ❌ Error installing [{}] model: {}\n", m.code, e)?;
                    all_ok = false;
                }
            }
        }

        if !all_ok {
            writeln!(out, "\n⚠️  Some dependencies failed to install.")?;
            writeln!(
                out,
                "   Please check the errors above and retry with --install-language.\n"
            )?;
            return Ok(SetupOutcome::Incomplete);
        }

        self.write_marker()?;
        writeln!(out, "{}", RULE)?;
        writeln!(out, "🎉 SETUP COMPLETE!")?;
        writeln!(out, "{}\n", RULE)?;
        Ok(SetupOutcome::Ready)
    }

    pub fn list_languages<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "🌍 Configured Languages:")?;
        writeln!(out, "{}", &RULE[..60])?;
        for (code, model_id) in self.catalog.entries() {
            let status = if self.hub.is_installed(model_id) {
                "✅ Installed"
            } else {
                "❌ Not installed"
            };
            writeln!(out, "  [{}] {:48} {}", code, model_id, status)?;
        }
        writeln!(out, "\n💡 To install a missing model, run:")?;
        writeln!(out, "   geonames-pdf --install-language <language_code>")?;
        writeln!(out, "\nExample: geonames-pdf --install-language it")?;
        Ok(())
    }

    /// Downloads the model for `code`. Returns whether the model is available
    /// afterwards; a code missing from the catalog is an `UnknownLanguage` error.
    pub async fn install_language<W: Write>(&self, code: &str, out: &mut W) -> Result<bool> {
        let code = code.to_lowercase();
        let Some(model_id) = self.catalog.get(&code) else {
            return Err(ToponymError::UnknownLanguage {
                code,
                available: self.catalog.codes().join(", "),
            });
        };

        if self.hub.is_installed(model_id) {
            writeln!(
                out,
                "✅ Model '{}' for language '{}' is already installed.",
                model_id, code
            )?;
            return Ok(true);
        }

        writeln!(out, "📦 Installing language model: {}", model_id)?;
        writeln!(out, "   Language: {}", code.to_uppercase())?;
        writeln!(out, "   This may take a few minutes...\n")?;
        out.flush()?;

        match self.hub.fetch(model_id).await {
            Ok(files) => {
                tracing::debug!("Model graph at {}", files.onnx.display());
                writeln!(out, "\n✅ Successfully installed {}!", model_id)?;
                writeln!(
                    out,
                    "   You can now process {} documents.",
                    code.to_uppercase()
                )?;
                Ok(true)
            }
            Err(e) => {
                writeln!(out, "\n❌ Error installing model '{}':", model_id)?;
                writeln!(out, "   {}", e)?;
                writeln!(out, "   {}", e.recovery_suggestion())?;
                Ok(false)
            }
        }
    }
}
