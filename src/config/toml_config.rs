use crate::utils::error::{BatchError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_JOB_NAME: &str = "importUserJob";
pub const DEFAULT_STEP_NAME: &str = "step1";
pub const DEFAULT_CHUNK_SIZE: usize = 10;
pub const DEFAULT_INPUT_PATH: &str = "resources/sample-data.csv";
pub const DEFAULT_DATABASE_PATH: &str = "people.db";
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub job: JobConfig,
    pub reader: ReaderConfig,
    pub step: StepConfig,
    pub store: StoreConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub name: String,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_JOB_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub path: String,
    pub delimiter: String,
    pub lines_to_skip: usize,
    /// 依欄位順序對應到 firstName / lastName
    pub field_names: Vec<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_INPUT_PATH.to_string(),
            delimiter: ",".to_string(),
            lines_to_skip: 1,
            field_names: vec!["firstName".to_string(), "lastName".to_string()],
        }
    }
}

impl ReaderConfig {
    pub fn delimiter_byte(&self) -> Result<u8> {
        validation::validate_delimiter("reader.delimiter", &self.delimiter)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    pub name: String,
    pub chunk_size: usize,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_STEP_NAME.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY_DATABASE
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl BatchConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| BatchError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${INPUT_FILE})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| BatchError::config(format!("Invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn chunk_size(&self) -> usize {
        self.step.chunk_size
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl Validate for BatchConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;
        validation::validate_non_empty_string("step.name", &self.step.name)?;
        validation::validate_path("reader.path", &self.reader.path)?;
        validation::validate_path("store.database_path", &self.store.database_path)?;
        validation::validate_positive_number("step.chunk_size", self.step.chunk_size, 1)?;
        self.reader.delimiter_byte()?;
        crate::adapters::csv_reader::FieldMapping::from_names(&self.reader.field_names)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = BatchConfig::from_toml_str("").unwrap();

        assert_eq!(config.job.name, "importUserJob");
        assert_eq!(config.step.name, "step1");
        assert_eq!(config.chunk_size(), 10);
        assert_eq!(config.reader.delimiter, ",");
        assert_eq!(config.reader.lines_to_skip, 1);
        assert_eq!(config.reader.field_names, vec!["firstName", "lastName"]);
        assert_eq!(config.store.database_path, "people.db");
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[job]
name = "nightlyImport"

[reader]
path = "data/people.tsv"
delimiter = "\t"
lines_to_skip = 2
field_names = ["lastName", "firstName"]

[step]
chunk_size = 25

[store]
database_path = ":memory:"

[monitoring]
enabled = true
"#;

        let config = BatchConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.job.name, "nightlyImport");
        assert_eq!(config.reader.delimiter_byte().unwrap(), b'\t');
        assert_eq!(config.reader.lines_to_skip, 2);
        assert_eq!(config.chunk_size(), 25);
        assert_eq!(config.step.name, "step1");
        assert!(config.store.is_in_memory());
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PERSON_BATCH_TEST_INPUT", "/tmp/people.csv");

        let toml_content = r#"
[reader]
path = "${PERSON_BATCH_TEST_INPUT}"
"#;

        let config = BatchConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.reader.path, "/tmp/people.csv");

        std::env::remove_var("PERSON_BATCH_TEST_INPUT");
    }

    #[test]
    fn test_unknown_env_var_is_left_untouched() {
        let toml_content = r#"
[store]
database_path = "${PERSON_BATCH_SURELY_UNSET_VAR}"
"#;

        let config = BatchConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.store.database_path,
            "${PERSON_BATCH_SURELY_UNSET_VAR}"
        );
    }

    #[test]
    fn test_config_validation() {
        let zero_chunk = BatchConfig::from_toml_str("[step]\nchunk_size = 0\n").unwrap();
        assert!(zero_chunk.validate().is_err());

        let bad_delimiter = BatchConfig::from_toml_str("[reader]\ndelimiter = \"::\"\n").unwrap();
        assert!(bad_delimiter.validate().is_err());

        let bad_fields =
            BatchConfig::from_toml_str("[reader]\nfield_names = [\"firstName\"]\n").unwrap();
        assert!(bad_fields.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = BatchConfig::from_toml_str("[step\nchunk_size = 3").unwrap_err();
        assert!(matches!(err, BatchError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[job]\nname = \"file-test\"\n")
            .unwrap();

        let config = BatchConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "file-test");
    }
}
