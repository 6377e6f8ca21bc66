//! Wiring for the person import job: flat file → name concatenation → SQLite.

use crate::adapters::{DelimitedFileReader, SqlitePersonStore};
use crate::config::BatchConfig;
use crate::core::job::Job;
use crate::core::listener::{VerificationListener, VerificationSink};
use crate::core::processor::NameConcatenationProcessor;
use crate::core::repository::InMemoryJobRepository;
use crate::core::step::ChunkOrientedStep;
use crate::core::writer::PersonItemWriter;
use crate::domain::ports::PersonStore;
use crate::utils::error::Result;
use std::sync::Arc;

/// 依配置開啟 SQLite store
pub fn open_store(config: &BatchConfig) -> Result<SqlitePersonStore> {
    if config.store.is_in_memory() {
        SqlitePersonStore::open_in_memory()
    } else {
        SqlitePersonStore::open(&config.store.database_path)
    }
}

/// 組出 import job。輸入檔在此時開啟，每個 Job 只能執行一次讀取
pub fn build_import_job<S>(
    config: &BatchConfig,
    store: Arc<S>,
    repository: Arc<InMemoryJobRepository>,
    sink: Arc<dyn VerificationSink>,
) -> Result<Job>
where
    S: PersonStore + 'static,
{
    let reader = DelimitedFileReader::from_path(&config.reader.path, &config.reader)?;
    let writer = PersonItemWriter::new(store.clone());
    let step = ChunkOrientedStep::new(
        config.step.name.clone(),
        config.chunk_size(),
        reader,
        NameConcatenationProcessor,
        writer,
    )?;

    tracing::debug!(
        "Built job [{}] reading {} in chunks of {}",
        config.job.name,
        config.reader.path,
        config.chunk_size()
    );

    Ok(Job::builder(config.job.name.clone(), repository)
        .listener(Arc::new(VerificationListener::new(store, sink)))
        .step(Box::new(step))
        .build())
}
