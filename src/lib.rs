pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod load;
pub mod logging;
pub mod parser;
pub mod report;
pub mod schema;

pub use cli::Cli;
pub use error::{Error, Result};
pub use gateway::{Credentials, Gateway};
pub use load::{Inputs, LoadPipeline, LoadSummary, MissingInputPolicy};
pub use report::{ReportFormat, ReportRunner};
