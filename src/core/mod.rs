pub mod etl;
pub mod pipeline;
pub mod report;
pub mod setup;

pub use crate::domain::model::{Document, ToponymReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
pub use etl::{RunOutput, ToponymEngine};
pub use pipeline::{load_with_fallback, ToponymPipeline};
