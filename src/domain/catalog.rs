use std::collections::BTreeMap;

pub const DEFAULT_LANGUAGE: &str = "en";

const ENGLISH_MODEL: &str = "protectai/bert-base-NER-onnx";
const MULTILINGUAL_MODEL: &str = "Xenova/bert-base-multilingual-cased-ner-hrl";

/// Languages shipped with a model mapping. Edit `[models]` in the settings
/// file to add more or to point a language at another hub repository.
///
/// The multilingual model was fine-tuned on ar, de, en, es, fr, it, lv, nl,
/// pt and zh. `el`, `pl` and `ro` rely on the multilingual BERT base alone,
/// so expect lower recall there unless `[models]` points them at a
/// language-specific export.
const BUILTIN_MODELS: &[(&str, &str)] = &[
    ("en", ENGLISH_MODEL),
    ("it", MULTILINGUAL_MODEL),
    ("es", MULTILINGUAL_MODEL),
    ("fr", MULTILINGUAL_MODEL),
    ("de", MULTILINGUAL_MODEL),
    ("pt", MULTILINGUAL_MODEL),
    ("nl", MULTILINGUAL_MODEL),
    ("el", MULTILINGUAL_MODEL),
    ("pl", MULTILINGUAL_MODEL),
    ("ro", MULTILINGUAL_MODEL),
];

/// Language code to model id mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    models: BTreeMap<String, String>,
    default_language: String,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            models: BUILTIN_MODELS
                .iter()
                .map(|(code, model)| (code.to_string(), model.to_string()))
                .collect(),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl ModelCatalog {
    /// Built-in mapping with `overrides` layered on top.
    pub fn with_overrides<I>(overrides: I, default_language: &str) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut catalog = Self::default();
        for (code, model) in overrides {
            catalog.models.insert(code.to_lowercase(), model);
        }
        catalog.default_language = default_language.to_lowercase();
        catalog
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.models.get(code).map(String::as_str)
    }

    /// Model for `code`, or the default language's model for unknown codes.
    pub fn model_for(&self, code: &str) -> &str {
        self.get(code)
            .or_else(|| self.get(&self.default_language))
            .unwrap_or(ENGLISH_MODEL)
    }

    pub fn default_model(&self) -> &str {
        self.model_for(&self.default_language)
    }

    /// Sorted by language code.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.models.iter().map(|(c, m)| (c.as_str(), m.as_str()))
    }

    pub fn codes(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_languages() {
        let catalog = ModelCatalog::default();
        assert_eq!(
            catalog.codes(),
            vec!["de", "el", "en", "es", "fr", "it", "nl", "pl", "pt", "ro"]
        );
        assert_eq!(catalog.model_for("en"), ENGLISH_MODEL);
        assert_eq!(catalog.model_for("it"), MULTILINGUAL_MODEL);
    }

    #[test]
    fn test_untuned_languages_can_be_repointed() {
        let catalog = ModelCatalog::default();
        for code in ["el", "pl", "ro"] {
            assert_eq!(catalog.model_for(code), MULTILINGUAL_MODEL);
        }

        let catalog = ModelCatalog::with_overrides(
            vec![("el".to_string(), "acme/greek-ner-onnx".to_string())],
            DEFAULT_LANGUAGE,
        );
        assert_eq!(catalog.model_for("el"), "acme/greek-ner-onnx");
        assert_eq!(catalog.model_for("pl"), MULTILINGUAL_MODEL);
    }

    #[test]
    fn test_unknown_language_maps_to_default_model() {
        let catalog = ModelCatalog::default();
        assert_eq!(catalog.model_for("ru"), ENGLISH_MODEL);
        assert_eq!(catalog.get("ru"), None);
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let catalog = ModelCatalog::with_overrides(
            vec![
                ("IT".to_string(), "acme/italian-ner".to_string()),
                ("ru".to_string(), "acme/russian-ner".to_string()),
            ],
            "it",
        );
        assert_eq!(catalog.model_for("it"), "acme/italian-ner");
        assert_eq!(catalog.model_for("ru"), "acme/russian-ner");
        assert_eq!(catalog.default_model(), "acme/italian-ner");
        assert_eq!(catalog.model_for("xx"), "acme/italian-ner");
    }
}
