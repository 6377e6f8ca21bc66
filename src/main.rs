use clap::Parser;
use person_batch::utils::{logger, validation::Validate};
use person_batch::{
    build_import_job, open_store, BatchError, BatchStatus, CliArgs, InMemoryJobRepository,
    JobLauncher, TracingSink,
};
use std::sync::Arc;

fn exit_with(e: &BatchError) -> ! {
    tracing::error!(
        "❌ Job could not be launched: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        person_batch::utils::error::ErrorSeverity::Critical => 3,
        _ => 1,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting person-batch");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let store = match open_store(&config) {
        Ok(store) => Arc::new(store),
        Err(e) => exit_with(&e),
    };
    let repository = Arc::new(InMemoryJobRepository::new());
    let mut job = match build_import_job(&config, store, repository, Arc::new(TracingSink)) {
        Ok(job) => job,
        Err(e) => exit_with(&e),
    };

    let launcher = JobLauncher::new_with_monitoring(config.monitoring_enabled());
    let execution = launcher.run(&mut job).await?;

    if args.verbose {
        tracing::debug!(
            "Job execution summary:\n{}",
            serde_json::to_string_pretty(&execution)?
        );
    }

    match execution.status {
        BatchStatus::Completed => {
            println!(
                "✅ Job {} completed: {} records written",
                execution.job_name,
                execution.write_count()
            );
            Ok(())
        }
        _ => {
            eprintln!(
                "❌ Job {} failed: {}",
                execution.job_name, execution.exit_description
            );
            std::process::exit(1);
        }
    }
}
