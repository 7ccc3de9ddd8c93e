use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants;
use crate::error::{EtlError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub orders_path: PathBuf,
    pub vip_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_name: String,
    /// Also write JSON logs to a daily-rolled file
    pub json_file: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            orders_path: PathBuf::from(constants::DEFAULT_ORDERS_PATH),
            vip_path: PathBuf::from(constants::DEFAULT_VIP_PATH),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(constants::DEFAULT_OUTPUT_PATH),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(constants::DEFAULT_LOG_DIR),
            file_name: constants::DEFAULT_LOG_FILE.to_string(),
            json_file: true,
        }
    }
}

impl EtlConfig {
    /// Load configuration from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(EtlError::Config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                )))
            }
        };

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EtlConfig = toml::from_str(content)?;
        if config.output.path.as_os_str().is_empty() {
            return Err(EtlError::Config("output.path must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Apply command-line overrides on top of the file values
    pub fn with_overrides(
        mut self,
        orders: Option<PathBuf>,
        vip: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> Self {
        if let Some(orders) = orders {
            self.input.orders_path = orders;
        }
        if let Some(vip) = vip {
            self.input.vip_path = vip;
        }
        if let Some(output) = output {
            self.output.path = output;
        }
        self
    }
}
