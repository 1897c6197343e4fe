#![allow(dead_code)]

use geonames_pdf::domain::model::Entity;
use geonames_pdf::domain::ports::{EntityRecognizer, ModelLoader};
use geonames_pdf::{Result, ToponymError};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};
use std::fs;
use std::path::Path;

/// Writes a PDF with one text line per page.
pub fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Lays out a model snapshot the way the hub cache stores it.
pub fn cache_model(cache_dir: &Path, model_id: &str, files: &[&str]) {
    let repo_dir = cache_dir.join(format!("models--{}", model_id.replace('/', "--")));
    let commit = "fedcba9876543210fedcba9876543210fedcba98";
    fs::create_dir_all(repo_dir.join("refs")).unwrap();
    fs::write(repo_dir.join("refs").join("main"), commit).unwrap();

    let snapshot = repo_dir.join("snapshots").join(commit);
    for file in files {
        let path = snapshot.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"{}").unwrap();
    }
}

/// Tags a fixed vocabulary of words.
pub struct GazetteerStyleRecognizer {
    name: String,
    vocabulary: Vec<(String, String)>,
}

impl EntityRecognizer for GazetteerStyleRecognizer {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
        let mut entities = Vec::new();
        for (word, label) in &self.vocabulary {
            for (start, _) in text.match_indices(word.as_str()) {
                entities.push(Entity::new(word.clone(), label.clone(), start, start + word.len(), 0.95));
            }
        }
        Ok(entities)
    }
}

/// Serves recognizers for the listed model ids only.
pub struct FakeLoader {
    installed: Vec<String>,
    vocabulary: Vec<(String, String)>,
}

impl FakeLoader {
    pub fn new(installed: &[&str], vocabulary: &[(&str, &str)]) -> Self {
        Self {
            installed: installed.iter().map(|s| s.to_string()).collect(),
            vocabulary: vocabulary
                .iter()
                .map(|(w, l)| (w.to_string(), l.to_string()))
                .collect(),
        }
    }
}

impl ModelLoader for FakeLoader {
    fn load(&self, model_id: &str) -> Result<Box<dyn EntityRecognizer>> {
        if !self.installed.iter().any(|m| m == model_id) {
            return Err(ToponymError::ModelNotInstalled {
                model: model_id.to_string(),
            });
        }
        Ok(Box::new(GazetteerStyleRecognizer {
            name: model_id.to_string(),
            vocabulary: self.vocabulary.clone(),
        }))
    }
}
