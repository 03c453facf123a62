pub mod aggregate;
pub mod config;
pub mod error;
pub mod fallback;
pub mod fixtures;
pub mod report;
pub mod reports;

pub use error::{ConfigError, ReportError};
pub use fallback::DataSource;
pub use report::{ReportClient, ReportQuery, ReportRow};
