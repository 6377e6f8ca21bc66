use crate::core::execution::JobExecution;
#[cfg(feature = "cli")]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

/// 單次取樣的行程資源使用量
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy)]
pub struct ResourceSample {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub memory_percent: f32,
    pub elapsed: Duration,
}

/// 批次執行期間的行程資源監控，只刷新本行程與記憶體總量
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    started: Instant,
    peak_memory_mb: AtomicU64,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            sysinfo::get_current_pid()
                .map_err(|e| tracing::warn!("Unable to resolve current PID, monitoring disabled: {}", e))
                .ok()
        } else {
            None
        };

        Self {
            system: Mutex::new(System::new()),
            pid,
            started: Instant::now(),
            peak_memory_mb: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.pid.is_some()
    }

    pub fn sample(&self) -> Option<ResourceSample> {
        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_memory();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let process = system.process(pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        let total_mb = system.total_memory() / 1024 / 1024;
        self.peak_memory_mb.fetch_max(memory_mb, Ordering::Relaxed);

        Some(ResourceSample {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            memory_percent: if total_mb > 0 {
                memory_mb as f32 / total_mb as f32 * 100.0
            } else {
                0.0
            },
            elapsed: self.started.elapsed(),
        })
    }

    pub fn peak_memory_mb(&self) -> u64 {
        self.peak_memory_mb.load(Ordering::Relaxed)
    }

    pub fn log_phase(&self, job_name: &str, phase: &str) {
        if let Some(sample) = self.sample() {
            tracing::info!(
                "📊 [{}] {} - CPU: {:.1}%, Memory: {}MB ({:.1}%), Time: {:?}",
                job_name,
                phase,
                sample.cpu_usage,
                sample.memory_mb,
                sample.memory_percent,
                sample.elapsed
            );
        }
    }

    /// 以執行結果計算吞吐量，並附上峰值記憶體
    pub fn log_job_summary(&self, execution: &JobExecution) {
        if !self.is_enabled() {
            return;
        }
        let elapsed = self.started.elapsed();
        let per_second = if elapsed.as_secs_f64() > 0.0 {
            execution.write_count() as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        tracing::info!(
            "📊 [{}] run {} - {} records in {:?} ({:.1}/s), Peak Memory: {}MB",
            execution.job_name,
            execution.run_id,
            execution.write_count(),
            elapsed,
            per_second,
            self.peak_memory_mb()
        );
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 非 CLI 建置時的空實作
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn log_phase(&self, _job_name: &str, _phase: &str) {}

    pub fn log_job_summary(&self, _execution: &JobExecution) {}
}
