use crate::core::Pipeline;
use crate::domain::model::ToponymReport;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// What one run produced.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub report: ToponymReport,
    pub written: Vec<String>,
}

pub struct ToponymEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ToponymEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunOutput> {
        tracing::info!("Starting toponym extraction");
        self.monitor.log_stats("start");

        // Extract
        let document = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} characters from {} pages",
            document.text.len(),
            document.page_count
        );
        self.monitor.log_stats("extract");

        // Transform
        let report = self.pipeline.transform(document).await?;
        if report.language.detected {
            println!("🌐 Detected language: {}", report.language.code);
        } else {
            println!("🌐 Using specified language: {}", report.language.code);
        }
        println!("🧠 Using model: {}", report.model);
        self.monitor.log_stats("transform");

        // Load
        let written = self.pipeline.load(&report).await?;
        for path in &written {
            println!("💾 Report saved to: {}", path);
        }
        self.monitor.log_stats("load");
        self.monitor.log_final_stats();

        Ok(RunOutput { report, written })
    }
}
