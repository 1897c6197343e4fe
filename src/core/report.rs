use crate::domain::model::ToponymReport;
use crate::utils::error::{Result, ToponymError};

/// Listing printed at the end of a run.
pub fn format_listing(report: &ToponymReport) -> String {
    let mut out = format!(
        "📍 Toponyms found in the PDF ({} total):\n\n",
        report.toponyms.len()
    );
    for toponym in &report.toponyms {
        out.push_str("- ");
        out.push_str(toponym);
        out.push('\n');
    }
    out
}

pub fn format_gazetteer_loaded(entries: usize) -> String {
    format!("✅ Loaded {} entries from gazetteer.", entries)
}

/// One toponym per line.
pub fn render_text(report: &ToponymReport) -> Vec<u8> {
    let mut out = String::new();
    for toponym in &report.toponyms {
        out.push_str(toponym);
        out.push('\n');
    }
    out.into_bytes()
}

/// `toponym,source` rows, source being `ner`, `gazetteer` or `both`.
pub fn render_csv(report: &ToponymReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["toponym", "source"])?;
    for toponym in &report.toponyms {
        let source = report
            .source_of(toponym)
            .map(|s| s.as_str())
            .unwrap_or("unknown");
        writer.write_record([toponym.as_str(), source])?;
    }
    writer.into_inner().map_err(|e| ToponymError::IoError(e.into_error()))
}

pub fn render_json(report: &ToponymReport) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(report)?)
}

pub fn render(report: &ToponymReport, format: &str) -> Result<Vec<u8>> {
    match format {
        "txt" => Ok(render_text(report)),
        "csv" => render_csv(report),
        "json" => render_json(report),
        other => Err(ToponymError::InvalidConfigValueError {
            field: "output.formats".to_string(),
            value: other.to_string(),
            reason: "Unsupported format".to_string(),
        }),
    }
}
