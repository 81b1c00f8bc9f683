pub mod config;
pub mod error;
pub mod report;
pub mod types;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use report::{Report, ReportLevel, ReportSink};
