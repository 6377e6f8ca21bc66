use crate::config::toml_config::BatchConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "person-batch")]
#[command(about = "Import person records from a delimited file into SQLite")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the input file
    #[arg(long)]
    pub input: Option<String>,

    /// Override the SQLite database path (":memory:" for an in-memory store)
    #[arg(long)]
    pub database: Option<String>,

    /// Override the chunk size
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Override the field delimiter
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Report CPU and memory usage
    #[arg(long)]
    pub monitor: bool,
}

impl CliArgs {
    /// 載入配置檔 (若有指定) 並套用命令列覆蓋設定
    pub fn load_config(&self) -> Result<BatchConfig> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::from_file(path)?,
            None => BatchConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut BatchConfig) {
        if let Some(input) = &self.input {
            config.reader.path = input.clone();
        }
        if let Some(database) = &self.database {
            config.store.database_path = database.clone();
        }
        if let Some(chunk_size) = self.chunk_size {
            config.step.chunk_size = chunk_size;
        }
        if let Some(delimiter) = &self.delimiter {
            config.reader.delimiter = delimiter.clone();
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
    }
}
