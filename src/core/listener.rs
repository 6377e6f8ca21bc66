use crate::core::execution::{BatchStatus, JobExecution};
use crate::domain::model::Person;
use crate::domain::ports::PersonStore;
use crate::utils::error::BatchError;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait JobExecutionListener: Send + Sync {
    async fn before_job(&self, _execution: &JobExecution) {}

    async fn after_job(&self, execution: &JobExecution);
}

/// 驗證結果的輸出目標
pub trait VerificationSink: Send + Sync {
    fn job_finished(&self, execution: &JobExecution);
    fn found(&self, person: &Person);
    fn read_failed(&self, error: &BatchError);
}

/// 透過 tracing 輸出驗證結果
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl VerificationSink for TracingSink {
    fn job_finished(&self, execution: &JobExecution) {
        tracing::info!(
            "!!! JOB FINISHED! Time to verify the results (job={}, run={})",
            execution.job_name,
            execution.run_id
        );
    }

    fn found(&self, person: &Person) {
        tracing::info!("Found <{}> in the database.", person);
    }

    fn read_failed(&self, error: &BatchError) {
        tracing::error!("❌ Unable to verify persisted records: {}", error);
    }
}

/// job 成功後重新讀出所有已寫入的記錄
pub struct VerificationListener<S: PersonStore> {
    store: Arc<S>,
    sink: Arc<dyn VerificationSink>,
}

impl<S: PersonStore> VerificationListener<S> {
    pub fn new(store: Arc<S>, sink: Arc<dyn VerificationSink>) -> Self {
        Self { store, sink }
    }
}

#[async_trait]
impl<S: PersonStore> JobExecutionListener for VerificationListener<S> {
    async fn after_job(&self, execution: &JobExecution) {
        if execution.status != BatchStatus::Completed {
            return;
        }

        self.sink.job_finished(execution);
        match self.store.find_all().await {
            Ok(people) => people.iter().for_each(|person| self.sink.found(person)),
            Err(e) => self.sink.read_failed(&e),
        }
    }
}
