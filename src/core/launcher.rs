use crate::core::execution::{BatchStatus, JobExecution};
use crate::core::job::Job;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct JobLauncher {
    monitor: SystemMonitor,
}

impl JobLauncher {
    pub fn new() -> Self {
        Self::new_with_monitoring(false)
    }

    pub fn new_with_monitoring(monitor_enabled: bool) -> Self {
        Self {
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self, job: &mut Job) -> Result<JobExecution> {
        tracing::info!("🚀 Starting job [{}]", job.name());
        self.monitor.log_phase(job.name(), "Job started");

        let execution = job.execute().await?;

        let elapsed = execution
            .duration()
            .map(|d| format!("{}ms", d.num_milliseconds()))
            .unwrap_or_else(|| "n/a".to_string());
        match execution.status {
            BatchStatus::Completed => tracing::info!(
                "✅ Job [{}] completed: {} read, {} written in {}",
                execution.job_name,
                execution.read_count(),
                execution.write_count(),
                elapsed
            ),
            _ => tracing::error!(
                "❌ Job [{}] ended with status {}: {}",
                execution.job_name,
                execution.status,
                execution.exit_description
            ),
        }

        self.monitor.log_phase(&execution.job_name, "Job finished");
        self.monitor.log_job_summary(&execution);

        Ok(execution)
    }
}

impl Default for JobLauncher {
    fn default() -> Self {
        Self::new()
    }
}
