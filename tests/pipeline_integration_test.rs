mod common;

use common::{write_pdf, FakeLoader};
use geonames_pdf::config::toml_config::TomlConfig;
use geonames_pdf::core::Pipeline;
use geonames_pdf::domain::catalog::ModelCatalog;
use geonames_pdf::utils::error::ErrorSeverity;
use geonames_pdf::{AppConfig, LocalStorage, ToponymEngine, ToponymError, ToponymPipeline};
use std::fs;
use tempfile::TempDir;

const ENGLISH_PAGES: &[&str] = &[
    "The expedition left Edinburgh at dawn and followed the coast road north towards Aberdeen,",
    "stopping for the night near the old harbour of Stonehaven before crossing into the Highlands.",
];

const VOCABULARY: &[(&str, &str)] = &[
    ("Edinburgh", "GPE"),
    ("Aberdeen", "GPE"),
    ("Highlands", "LOC"),
    ("Stonehaven", "ORG"),
];

fn english_model() -> String {
    ModelCatalog::default().model_for("en").to_string()
}

#[tokio::test]
async fn test_full_run_writes_requested_reports() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("expedition.pdf");
    write_pdf(&pdf, ENGLISH_PAGES);
    let gazetteer = dir.path().join("places.txt");
    fs::write(&gazetteer, "Stonehaven\nInverness\n").unwrap();
    let out_dir = dir.path().join("reports");

    let mut settings = TomlConfig::default();
    settings.output.formats = vec!["csv".to_string(), "json".to_string()];
    let config = AppConfig::new(settings)
        .with_pdf(&pdf)
        .with_gazetteer(&gazetteer);

    let en = english_model();
    let pipeline = ToponymPipeline::new(
        LocalStorage::new(&out_dir),
        config,
        FakeLoader::new(&[&en], VOCABULARY),
    );
    let output = ToponymEngine::new(pipeline).run().await.unwrap();

    let toponyms: Vec<&str> = output.report.toponyms.iter().map(String::as_str).collect();
    assert_eq!(toponyms, vec!["Aberdeen", "Edinburgh", "Highlands", "Stonehaven"]);
    assert_eq!(output.report.language.code, "en");
    assert_eq!(output.report.page_count, 2);
    assert_eq!(output.written.len(), 2);

    let csv = fs::read_to_string(out_dir.join("expedition_toponyms.csv")).unwrap();
    assert!(csv.contains("Stonehaven,gazetteer"));
    assert!(csv.contains("Edinburgh,ner"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("expedition_toponyms.json")).unwrap())
            .unwrap();
    assert_eq!(json["gazetteer_entries"], 2);
    assert_eq!(json["model"], en.as_str());
}

#[tokio::test]
async fn test_missing_language_model_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("expedition.pdf");
    write_pdf(&pdf, ENGLISH_PAGES);

    let en = english_model();
    let config = AppConfig::default().with_pdf(&pdf).with_language("IT");
    let pipeline = ToponymPipeline::new(
        LocalStorage::new(dir.path()),
        config,
        FakeLoader::new(&[&en], VOCABULARY),
    );

    let output = ToponymEngine::new(pipeline).run().await.unwrap();

    assert_eq!(output.report.language.code, "it");
    assert!(!output.report.language.detected);
    assert_eq!(output.report.model, en);
    assert!(output.written.is_empty());
}

#[tokio::test]
async fn test_no_models_installed_is_a_model_error() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("expedition.pdf");
    write_pdf(&pdf, ENGLISH_PAGES);

    let pipeline = ToponymPipeline::new(
        LocalStorage::new(dir.path()),
        AppConfig::default().with_pdf(&pdf),
        FakeLoader::new(&[], VOCABULARY),
    );

    let err = ToponymEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, ToponymError::ModelNotInstalled { .. }));
    assert_eq!(err.severity(), ErrorSeverity::High);
}

#[tokio::test]
async fn test_missing_pdf_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nowhere.pdf");

    let pipeline = ToponymPipeline::new(
        LocalStorage::new(dir.path()),
        AppConfig::default().with_pdf(&missing),
        FakeLoader::new(&[], VOCABULARY),
    );

    let err = pipeline.extract().await.unwrap_err();
    assert_eq!(
        err.user_friendly_message(),
        format!("Error: PDF file '{}' not found.", missing.display())
    );
}

#[tokio::test]
async fn test_short_document_defaults_to_english() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("note.pdf");
    write_pdf(&pdf, &["Aberdeen"]);

    let en = english_model();
    let pipeline = ToponymPipeline::new(
        LocalStorage::new(dir.path()),
        AppConfig::default().with_pdf(&pdf),
        FakeLoader::new(&[&en], VOCABULARY),
    );

    let document = pipeline.extract().await.unwrap();
    let report = pipeline.transform(document).await.unwrap();
    assert_eq!(report.language.code, "en");
    assert!(report.language.detected);
    assert!(report.toponyms.contains("Aberdeen"));
}
