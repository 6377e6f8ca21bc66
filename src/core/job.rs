use crate::core::execution::{JobExecution, StepExecution};
use crate::core::listener::JobExecutionListener;
use crate::core::repository::InMemoryJobRepository;
use crate::core::step::Step;
use crate::utils::error::Result;
use std::sync::Arc;

pub struct Job {
    name: String,
    steps: Vec<Box<dyn Step>>,
    listeners: Vec<Arc<dyn JobExecutionListener>>,
    repository: Arc<InMemoryJobRepository>,
}

pub struct JobBuilder {
    job: Job,
}

impl JobBuilder {
    pub fn listener(mut self, listener: Arc<dyn JobExecutionListener>) -> Self {
        self.job.listeners.push(listener);
        self
    }

    pub fn step(mut self, step: Box<dyn Step>) -> Self {
        self.job.steps.push(step);
        self
    }

    pub fn build(self) -> Job {
        self.job
    }
}

impl Job {
    pub fn builder(name: impl Into<String>, repository: Arc<InMemoryJobRepository>) -> JobBuilder {
        JobBuilder {
            job: Job {
                name: name.into(),
                steps: Vec::new(),
                listeners: Vec::new(),
                repository,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 依序執行所有 step；step 的錯誤記錄在 execution 中，不會以 `Err` 回傳。
    /// `Err` 只代表 job repository 本身無法使用。
    pub async fn execute(&mut self) -> Result<JobExecution> {
        let mut execution = self.repository.create_job_execution(&self.name)?;
        tracing::info!(
            "Job [{}] launched with run.id={}",
            self.name,
            execution.run_id
        );

        for listener in &self.listeners {
            listener.before_job(&execution).await;
        }

        execution.start()?;
        self.repository.update(&execution)?;

        for step in self.steps.iter_mut() {
            let mut step_execution = StepExecution::new(step.name());
            step_execution.start()?;
            tracing::info!("Executing step: [{}]", step.name());

            let outcome = step.execute(&mut step_execution).await;
            let failed = match outcome {
                Ok(()) => {
                    step_execution.complete()?;
                    false
                }
                Err(e) => {
                    tracing::error!(
                        "❌ Step [{}] failed: {} (Category: {:?}, Severity: {:?})",
                        step.name(),
                        e,
                        e.category(),
                        e.severity()
                    );
                    step_execution.fail(&e)?;
                    execution.failure_messages.push(e.to_string());
                    true
                }
            };

            execution.step_executions.push(step_execution);
            self.repository.update(&execution)?;
            if failed {
                break;
            }
        }

        execution.finish()?;
        self.repository.update(&execution)?;
        tracing::info!(
            "Job [{}] run.id={} finished with status [{}]",
            self.name,
            execution.run_id,
            execution.status
        );

        for listener in &self.listeners {
            listener.after_job(&execution).await;
        }

        Ok(execution)
    }
}
