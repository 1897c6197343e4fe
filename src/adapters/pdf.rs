use crate::domain::model::Document;
use crate::utils::error::{Result, ToponymError};
use std::path::Path;

/// Loads the PDF at `path` and joins the text of its pages, in page order,
/// with a single space. A page whose text cannot be decoded contributes an
/// empty string.
pub fn extract_document(path: &Path) -> Result<Document> {
    if !path.is_file() {
        return Err(ToponymError::PdfNotFound {
            path: path.display().to_string(),
        });
    }

    let pdf = lopdf::Document::load(path)?;
    let pages = pdf.get_pages();
    tracing::debug!("Opened {} ({} pages)", path.display(), pages.len());

    let mut page_texts = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        match pdf.extract_text(&[*page_number]) {
            Ok(text) => page_texts.push(text),
            Err(e) => {
                tracing::warn!("Could not extract text from page {}: {}", page_number, e);
                page_texts.push(String::new());
            }
        }
    }

    Ok(Document {
        source: path.to_path_buf(),
        text: page_texts.join(" "),
        page_count: pages.len(),
    })
}
