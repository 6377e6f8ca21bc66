//! Job and step execution records.
//!
//! Both follow the same lifecycle: `CREATED → RUNNING → (COMPLETED | FAILED)`.

use crate::utils::error::{BatchError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Created,
    Running,
    Completed,
    Failed,
}

impl BatchStatus {
    pub fn can_transition_to(self, next: BatchStatus) -> bool {
        matches!(
            (self, next),
            (BatchStatus::Created, BatchStatus::Running)
                | (BatchStatus::Running, BatchStatus::Completed)
                | (BatchStatus::Running, BatchStatus::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BatchStatus::Completed | BatchStatus::Failed)
    }

    fn transition(&mut self, next: BatchStatus) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(BatchError::InvalidStateTransition {
                from: self.to_string(),
                to: next.to_string(),
            });
        }
        *self = next;
        Ok(())
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BatchStatus::Created => "CREATED",
            BatchStatus::Running => "RUNNING",
            BatchStatus::Completed => "COMPLETED",
            BatchStatus::Failed => "FAILED",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepExecution {
    pub step_name: String,
    pub status: BatchStatus,
    pub read_count: usize,
    pub write_count: usize,
    pub filter_count: usize,
    pub commit_count: usize,
    pub rollback_count: usize,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub failure: Option<String>,
}

impl StepExecution {
    pub fn new(step_name: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            status: BatchStatus::Created,
            read_count: 0,
            write_count: 0,
            filter_count: 0,
            commit_count: 0,
            rollback_count: 0,
            start_time: None,
            end_time: None,
            failure: None,
        }
    }

    pub fn start(&mut self) -> Result<()> {
        self.status.transition(BatchStatus::Running)?;
        self.start_time = Some(Utc::now());
        Ok(())
    }

    pub fn complete(&mut self) -> Result<()> {
        self.status.transition(BatchStatus::Completed)?;
        self.end_time = Some(Utc::now());
        Ok(())
    }

    pub fn fail(&mut self, error: &BatchError) -> Result<()> {
        self.status.transition(BatchStatus::Failed)?;
        self.end_time = Some(Utc::now());
        self.failure = Some(error.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobExecution {
    pub id: u64,
    pub job_name: String,
    /// 每次啟動遞增，同名 job 重跑會成為新的 execution
    pub run_id: u64,
    pub status: BatchStatus,
    pub exit_description: String,
    pub create_time: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub step_executions: Vec<StepExecution>,
    pub failure_messages: Vec<String>,
}

impl JobExecution {
    pub fn new(id: u64, job_name: impl Into<String>, run_id: u64) -> Self {
        Self {
            id,
            job_name: job_name.into(),
            run_id,
            status: BatchStatus::Created,
            exit_description: String::new(),
            create_time: Utc::now(),
            start_time: None,
            end_time: None,
            step_executions: Vec::new(),
            failure_messages: Vec::new(),
        }
    }

    pub fn start(&mut self) -> Result<()> {
        self.status.transition(BatchStatus::Running)?;
        self.start_time = Some(Utc::now());
        Ok(())
    }

    /// 依各 step 結果決定最終狀態
    pub fn finish(&mut self) -> Result<()> {
        let next = if self.failure_messages.is_empty()
            && self
                .step_executions
                .iter()
                .all(|step| step.status == BatchStatus::Completed)
        {
            BatchStatus::Completed
        } else {
            BatchStatus::Failed
        };

        self.status.transition(next)?;
        self.end_time = Some(Utc::now());
        self.exit_description = match next {
            BatchStatus::Completed => String::new(),
            _ => self.failure_messages.join("; "),
        };
        Ok(())
    }

    pub fn read_count(&self) -> usize {
        self.step_executions.iter().map(|s| s.read_count).sum()
    }

    pub fn write_count(&self) -> usize {
        self.step_executions.iter().map(|s| s.write_count).sum()
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use BatchStatus::*;

        assert!(Created.can_transition_to(Running));
        assert!(Running.can_transition_to(Completed));
        assert!(Running.can_transition_to(Failed));

        assert!(!Created.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Running));
        assert!(!Failed.can_transition_to(Completed));
        assert!(!Running.can_transition_to(Running));
    }

    #[test]
    fn test_invalid_transition_is_rejected() {
        let mut execution = JobExecution::new(1, "importUserJob", 1);

        let err = execution.finish().unwrap_err();

        assert!(matches!(err, BatchError::InvalidStateTransition { .. }));
        assert_eq!(execution.status, BatchStatus::Created);
    }

    #[test]
    fn test_finish_with_completed_steps() {
        let mut execution = JobExecution::new(1, "importUserJob", 1);
        execution.start().unwrap();

        let mut step = StepExecution::new("step1");
        step.start().unwrap();
        step.read_count = 2;
        step.write_count = 2;
        step.complete().unwrap();
        execution.step_executions.push(step);
        execution.finish().unwrap();

        assert_eq!(execution.status, BatchStatus::Completed);
        assert!(execution.status.is_terminal());
        assert_eq!(execution.read_count(), 2);
        assert_eq!(execution.write_count(), 2);
        assert!(execution.duration().is_some());
    }

    #[test]
    fn test_finish_with_failed_step() {
        let mut execution = JobExecution::new(1, "importUserJob", 1);
        execution.start().unwrap();

        let mut step = StepExecution::new("step1");
        step.start().unwrap();
        let error = BatchError::MalformedRecord {
            line: 2,
            expected: 2,
            found: 1,
        };
        step.fail(&error).unwrap();
        execution.failure_messages.push(error.to_string());
        execution.step_executions.push(step);
        execution.finish().unwrap();

        assert_eq!(execution.status, BatchStatus::Failed);
        assert!(execution.exit_description.contains("line 2"));
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&BatchStatus::Completed).unwrap();
        assert_eq!(json, "\"COMPLETED\"");
        assert_eq!(BatchStatus::Failed.to_string(), "FAILED");
    }
}
