pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, AppConfig};

pub use adapters::hub::HfModelHub;
pub use adapters::onnx::{BertNerOnnx, OnnxModelLoader};
pub use core::setup::{SetupChecker, SetupOutcome};
pub use core::{etl::ToponymEngine, pipeline::ToponymPipeline};
pub use domain::model::ToponymReport;
pub use utils::error::{Result, ToponymError};
