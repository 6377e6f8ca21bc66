pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{DelimitedFileReader, SqlitePersonStore};
pub use app::import_job::{build_import_job, open_store};
pub use config::BatchConfig;
pub use self::core::{
    execution::{BatchStatus, JobExecution},
    launcher::JobLauncher,
    listener::TracingSink,
    repository::InMemoryJobRepository,
};
pub use utils::error::{BatchError, Result};
