use crate::core::execution::JobExecution;
use crate::utils::error::{BatchError, Result};
use std::sync::{Mutex, MutexGuard};

/// 行程內的 job 執行紀錄，負責配發 execution id 與 run id
#[derive(Debug, Default)]
pub struct InMemoryJobRepository {
    executions: Mutex<Vec<JobExecution>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<JobExecution>>> {
        self.executions
            .lock()
            .map_err(|e| BatchError::store(format!("Failed to acquire job repository lock: {}", e)))
    }

    /// 建立新的 execution，run id 為同名 job 上一次的值加一
    pub fn create_job_execution(&self, job_name: &str) -> Result<JobExecution> {
        let mut executions = self.lock()?;

        let id = executions.len() as u64 + 1;
        let run_id = executions
            .iter()
            .filter(|e| e.job_name == job_name)
            .map(|e| e.run_id)
            .max()
            .unwrap_or(0)
            + 1;

        let execution = JobExecution::new(id, job_name, run_id);
        executions.push(execution.clone());
        Ok(execution)
    }

    pub fn update(&self, execution: &JobExecution) -> Result<()> {
        let mut executions = self.lock()?;
        let stored = executions
            .iter_mut()
            .find(|e| e.id == execution.id)
            .ok_or_else(|| {
                BatchError::store(format!("Unknown job execution id {}", execution.id))
            })?;
        *stored = execution.clone();
        Ok(())
    }

    pub fn find_job_executions(&self, job_name: &str) -> Result<Vec<JobExecution>> {
        let executions = self.lock()?;
        Ok(executions
            .iter()
            .filter(|e| e.job_name == job_name)
            .cloned()
            .collect())
    }

    pub fn last_job_execution(&self, job_name: &str) -> Result<Option<JobExecution>> {
        let executions = self.lock()?;
        Ok(executions
            .iter()
            .rev()
            .find(|e| e.job_name == job_name)
            .cloned())
    }
}
