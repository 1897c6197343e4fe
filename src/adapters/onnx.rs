//! BERT-style token classification NER on ONNX Runtime.
//!
//! Works with any hub repository exporting a token classification graph
//! (`input_ids`, `attention_mask`, `token_type_ids` → `logits`) next to a
//! `tokenizer.json`. Labels come from `id2label` in the model's
//! `config.json` and use the BIO scheme (`B-LOC`, `I-LOC`, `O`, ...).
//!
//! Text is fed in whitespace-bounded chunks, each truncated to the model's
//! maximum sequence length.

use crate::config::toml_config::NerSettings;
use crate::domain::model::{Entity, ModelFiles};
use crate::domain::ports::{EntityRecognizer, ModelHub, ModelLoader};
use crate::domain::services::chunk_text;
use crate::utils::error::{Result, ToponymError};
use ndarray::Array2;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Encoding, Tokenizer, TruncationParams};

/// CoNLL-03 tag set, used when a model ships no `id2label`.
const CONLL_LABELS: &[&str] = &[
    "O", "B-MISC", "I-MISC", "B-PER", "I-PER", "B-ORG", "I-ORG", "B-LOC", "I-LOC",
];

pub struct BertNerOnnx {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    id_to_label: HashMap<usize, String>,
    model_name: String,
    max_chunk_chars: usize,
}

impl BertNerOnnx {
    pub fn from_files(files: &ModelFiles, settings: &NerSettings) -> Result<Self> {
        let load_error = |message: String| ToponymError::ModelLoadError {
            model: files.model_id.clone(),
            message,
        };

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| load_error(format!("failed to load tokenizer: {}", e)))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: settings.max_sequence_tokens,
                ..TruncationParams::default()
            }))
            .map_err(|e| load_error(format!("failed to configure truncation: {}", e)))?;
        // one sequence at a time, no padding needed
        tokenizer.with_padding(None);

        let id_to_label = match &files.config {
            Some(path) => read_id_to_label(path).map_err(|e| load_error(e.to_string()))?,
            None => HashMap::new(),
        };
        let id_to_label = if id_to_label.is_empty() {
            conll_labels()
        } else {
            id_to_label
        };

        let session = Session::builder()
            .map_err(|e| load_error(format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_error(format!("optimization level: {}", e)))?
            .with_intra_threads(settings.num_threads)
            .map_err(|e| load_error(format!("intra threads: {}", e)))?
            .commit_from_file(&files.onnx)
            .map_err(|e| load_error(format!("failed to load ONNX model: {}", e)))?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            id_to_label,
            model_name: files.model_id.clone(),
            max_chunk_chars: settings.max_chunk_chars,
        })
    }

    fn recognize_chunk(&self, chunk: &str, base_offset: usize) -> Result<Vec<Entity>> {
        let encoding = self
            .tokenizer
            .encode(chunk, true)
            .map_err(|e| inference_error(format!("failed to tokenize input: {}", e)))?;

        let seq_len = encoding.get_ids().len();
        if seq_len == 0 {
            return Ok(Vec::new());
        }

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids = vec![0i64; seq_len];

        let tensor = |data: Vec<i64>, name: &str| -> Result<Tensor<i64>> {
            let array = Array2::from_shape_vec((1, seq_len), data)
                .map_err(|e| inference_error(format!("bad {} shape: {}", name, e)))?;
            Tensor::from_array(array)
                .map_err(|e| inference_error(format!("failed to build {} tensor: {}", name, e)))
        };
        let input_ids = tensor(input_ids, "input_ids")?;
        let attention_mask = tensor(attention_mask, "attention_mask")?;
        let token_type_ids = tensor(token_type_ids, "token_type_ids")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| inference_error("model session lock poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids.into_dyn(),
                "attention_mask" => attention_mask.into_dyn(),
                "token_type_ids" => token_type_ids.into_dyn(),
            ])
            .map_err(|e| inference_error(format!("ONNX inference failed: {}", e)))?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| inference_error("model output has no 'logits'".to_string()))?;
        let (shape, data) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| inference_error(format!("failed to read logits: {}", e)))?;

        if shape.len() != 3 || shape[0] != 1 {
            return Err(inference_error(format!("unexpected logits shape {:?}", shape)));
        }
        let rows = shape[1] as usize;
        let num_labels = shape[2] as usize;

        let tags: Vec<TokenTag> = (0..rows.min(seq_len))
            .map(|token| {
                let row = &data[token * num_labels..(token + 1) * num_labels];
                let (label_id, score) = argmax_softmax(row);
                TokenTag {
                    label: self
                        .id_to_label
                        .get(&label_id)
                        .cloned()
                        .unwrap_or_else(|| format!("LABEL_{}", label_id)),
                    score,
                }
            })
            .collect();

        Ok(decode_bio(chunk, base_offset, &encoding, &tags))
    }
}

impl EntityRecognizer for BertNerOnnx {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
        let chunks = chunk_text(text, self.max_chunk_chars);
        tracing::debug!("Running NER over {} chunk(s)", chunks.len());

        let mut entities = Vec::new();
        for (offset, chunk) in chunks {
            entities.extend(self.recognize_chunk(chunk, offset)?);
        }
        Ok(entities)
    }
}

/// Loads models that are already in the hub's local cache.
pub struct OnnxModelLoader<H: ModelHub> {
    hub: Arc<H>,
    settings: NerSettings,
}

impl<H: ModelHub> OnnxModelLoader<H> {
    pub fn new(hub: Arc<H>, settings: NerSettings) -> Self {
        Self { hub, settings }
    }
}

impl<H: ModelHub> ModelLoader for OnnxModelLoader<H> {
    fn load(&self, model_id: &str) -> Result<Box<dyn EntityRecognizer>> {
        let files = self
            .hub
            .locate(model_id)
            .ok_or_else(|| ToponymError::ModelNotInstalled {
                model: model_id.to_string(),
            })?;
        tracing::debug!("Loading {} from {}", model_id, files.onnx.display());
        Ok(Box::new(BertNerOnnx::from_files(&files, &self.settings)?))
    }
}

fn inference_error(message: String) -> ToponymError {
    ToponymError::InferenceError { message }
}

fn conll_labels() -> HashMap<usize, String> {
    CONLL_LABELS
        .iter()
        .enumerate()
        .map(|(id, label)| (id, label.to_string()))
        .collect()
}

fn read_id_to_label(path: &Path) -> Result<HashMap<usize, String>> {
    let content = std::fs::read_to_string(path)?;
    let config: serde_json::Value = serde_json::from_str(&content)?;
    Ok(parse_id_to_label(&config))
}

fn parse_id_to_label(config: &serde_json::Value) -> HashMap<usize, String> {
    config
        .get("id2label")
        .and_then(|v| v.as_object())
        .map(|labels| {
            labels
                .iter()
                .filter_map(|(id, label)| Some((id.parse().ok()?, label.as_str()?.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

/// Index of the largest logit and its softmax probability.
fn argmax_softmax(logits: &[f32]) -> (usize, f32) {
    let (max_idx, max_val) = logits
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, v)| if v > best.1 { (i, v) } else { best });
    let exp_sum: f32 = logits.iter().map(|v| (v - max_val).exp()).sum();
    (max_idx, 1.0 / exp_sum)
}

#[derive(Debug, Clone)]
struct TokenTag {
    label: String,
    score: f32,
}

/// An entity being grown token by token, in chunk byte offsets.
struct OpenSpan {
    label: String,
    start: usize,
    end: usize,
    word: Option<u32>,
    score: f32,
}

/// Turns per-token BIO tags into entities. Sub-word pieces of a word that
/// already belongs to an entity extend it whatever their own tag.
fn decode_bio(chunk: &str, base_offset: usize, encoding: &Encoding, tags: &[TokenTag]) -> Vec<Entity> {
    let offsets = encoding.get_offsets();
    let word_ids = encoding.get_word_ids();
    let special = encoding.get_special_tokens_mask();

    let mut entities = Vec::new();
    let mut current: Option<OpenSpan> = None;

    let close = |span: Option<OpenSpan>, entities: &mut Vec<Entity>| {
        if let Some(span) = span {
            if let Some(text) = chunk.get(span.start..span.end) {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    entities.push(Entity::new(
                        trimmed,
                        span.label,
                        base_offset + span.start,
                        base_offset + span.end,
                        span.score,
                    ));
                }
            }
        }
    };

    for (idx, tag) in tags.iter().enumerate() {
        let (start, end) = offsets[idx];
        if special.get(idx).copied().unwrap_or(0) == 1 || start == end {
            close(current.take(), &mut entities);
            continue;
        }
        let word = word_ids.get(idx).copied().flatten();

        if let Some(span) = current.as_mut() {
            if word.is_some() && span.word == word {
                span.end = end;
                continue;
            }
        }

        let (prefix, label) = split_bio(&tag.label);
        if label == "O" {
            close(current.take(), &mut entities);
            continue;
        }

        let continues = prefix == Some('I')
            && current.as_ref().is_some_and(|span| span.label == label);
        if continues {
            if let Some(span) = current.as_mut() {
                span.end = end;
                span.word = word;
                span.score = span.score.min(tag.score);
            }
        } else {
            close(current.take(), &mut entities);
            current = Some(OpenSpan {
                label: label.to_string(),
                start,
                end,
                word,
                score: tag.score,
            });
        }
    }
    close(current.take(), &mut entities);

    entities
}

fn split_bio(tag: &str) -> (Option<char>, &str) {
    if let Some(label) = tag.strip_prefix("B-") {
        (Some('B'), label)
    } else if let Some(label) = tag.strip_prefix("I-") {
        (Some('I'), label)
    } else {
        (None, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenizers::models::wordlevel::WordLevel;
    use tokenizers::pre_tokenizers::whitespace::Whitespace;

    fn word_tokenizer(words: &[&str]) -> Tokenizer {
        let mut vocab: HashMap<String, u32> = HashMap::new();
        vocab.insert("[UNK]".to_string(), 0);
        for (i, w) in words.iter().enumerate() {
            vocab.insert(w.to_string(), i as u32 + 1);
        }
        let model = WordLevel::builder()
            .vocab(vocab.into_iter().collect())
            .unk_token("[UNK]".to_string())
            .build()
            .unwrap();
        let mut tokenizer = Tokenizer::new(model);
        tokenizer.with_pre_tokenizer(Whitespace::default());
        tokenizer
    }

    fn tags(labels: &[&str]) -> Vec<TokenTag> {
        labels
            .iter()
            .map(|l| TokenTag {
                label: l.to_string(),
                score: 0.9,
            })
            .collect()
    }

    #[test]
    fn test_decode_bio_merges_multi_token_entities() {
        let text = "From New York to Rome";
        let tokenizer = word_tokenizer(&["From", "New", "York", "to", "Rome"]);
        let encoding = tokenizer.encode(text, false).unwrap();

        let entities = decode_bio(
            text,
            100,
            &encoding,
            &tags(&["O", "B-LOC", "I-LOC", "O", "B-LOC"]),
        );

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].text, "New York");
        assert_eq!(entities[0].label, "LOC");
        assert_eq!(entities[0].start, 105);
        assert_eq!(entities[0].end, 113);
        assert_eq!(entities[1].text, "Rome");
    }

    #[test]
    fn test_decode_bio_splits_on_new_begin_and_label_change() {
        let text = "Paris London Acme";
        let tokenizer = word_tokenizer(&["Paris", "London", "Acme"]);
        let encoding = tokenizer.encode(text, false).unwrap();

        let entities = decode_bio(text, 0, &encoding, &tags(&["B-LOC", "B-LOC", "I-ORG"]));

        let found: Vec<(&str, &str)> = entities
            .iter()
            .map(|e| (e.text.as_str(), e.label.as_str()))
            .collect();
        assert_eq!(found, vec![("Paris", "LOC"), ("London", "LOC"), ("Acme", "ORG")]);
    }

    #[test]
    fn test_decode_bio_accepts_unprefixed_labels() {
        let text = "Visit Berlin";
        let tokenizer = word_tokenizer(&["Visit", "Berlin"]);
        let encoding = tokenizer.encode(text, false).unwrap();

        let entities = decode_bio(text, 0, &encoding, &tags(&["O", "GPE"]));
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].label, "GPE");
    }

    #[test]
    fn test_argmax_softmax() {
        let (idx, score) = argmax_softmax(&[0.0, 3.0, 1.0]);
        assert_eq!(idx, 1);
        assert!(score > 0.8 && score < 0.9);

        let (_, uniform) = argmax_softmax(&[1.0, 1.0]);
        assert!((uniform - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_parse_id_to_label() {
        let config = serde_json::json!({
            "id2label": {"0": "O", "1": "B-LOC", "2": "I-LOC", "x": "bad"}
        });
        let labels = parse_id_to_label(&config);
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[&1], "B-LOC");

        assert!(parse_id_to_label(&serde_json::json!({})).is_empty());
    }

    #[test]
    fn test_conll_fallback_labels() {
        let labels = conll_labels();
        assert_eq!(labels[&0], "O");
        assert_eq!(labels[&7], "B-LOC");
    }

    #[test]
    fn test_loader_reports_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let hub = crate::adapters::hub::HfModelHub::new(&crate::config::toml_config::HubSettings {
            cache_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        });
        let loader = OnnxModelLoader::new(Arc::new(hub), NerSettings::default());

        let err = loader.load("acme/missing").err().unwrap();
        assert!(matches!(err, ToponymError::ModelNotInstalled { .. }));
    }
}
