//! Configuration management for cdc_schema
//!
//! Loads configuration with priority:
//! 1. The file passed with `--config`
//! 2. cdc_schema.toml in the current directory or any parent
//! 3. Defaults
//!
//! Command-line flags are applied on top by the binary.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file searched for when no path is given
pub const CONFIG_FILE_NAME: &str = "cdc_schema.toml";

/// Namespace written into every generated schema document
pub const DEFAULT_NAMESPACE: &str = "MaxScaleChangeDataSchema.avro";

/// Record name written into every generated schema document
pub const DEFAULT_RECORD_NAME: &str = "ChangeRecord";

/// cdc_schema configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdcsConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub schema: SchemaConfig,

    /// Databases to export when none are given on the command line
    #[serde(default)]
    pub databases: Vec<String>,

    /// Number of tables exported concurrently per database
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

/// Source server connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// User name (can reference env var with ${VAR_NAME})
    #[serde(default)]
    pub user: String,

    /// Password (can reference env var with ${VAR_NAME})
    #[serde(default)]
    pub password: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Where and how schema files are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// Replace schema files that already exist instead of skipping them
    #[serde(default)]
    pub overwrite: bool,
}

/// Fixed identifiers of the generated documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_record_name")]
    pub record_name: String,
}

impl Default for CdcsConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            output: OutputConfig::default(),
            schema: SchemaConfig::default(),
            databases: Vec::new(),
            concurrency: default_concurrency(),
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: String::new(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
            max_connections: default_max_connections(),
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            overwrite: false,
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            record_name: default_record_name(),
        }
    }
}

impl CdcsConfig {
    /// Load configuration from `cdc_schema.toml` if one can be found,
    /// otherwise return the defaults
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file.
    ///
    /// An explicit path must exist. Without one, the current directory and
    /// its parents are searched and the defaults are used if nothing is found.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::find_config_file()? {
                Some(found) => found,
                None => {
                    tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                    return Ok(Self::default());
                }
            },
        };

        tracing::debug!("Loading configuration from: {:?}", config_path);

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    /// Parse configuration text and resolve environment references
    pub fn from_toml(contents: &str) -> Result<Self> {
        let mut config: CdcsConfig = toml::from_str(contents)?;
        config.resolve_env_vars()?;
        Ok(config)
    }

    /// Find cdc_schema.toml by searching current directory and parents
    fn find_config_file() -> Result<Option<PathBuf>> {
        let mut current = env::current_dir()?;

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(Some(config_path));
            }

            if !current.pop() {
                return Ok(None);
            }
        }
    }

    /// Resolve ${VAR_NAME} references in the credentials
    fn resolve_env_vars(&mut self) -> Result<()> {
        self.connection.user = Self::resolve_required(&self.connection.user, "connection.user")?;
        self.connection.password =
            Self::resolve_required(&self.connection.password, "connection.password")?;
        Ok(())
    }

    fn resolve_required(value: &str, key: &str) -> Result<String> {
        Self::resolve_env_var(value).ok_or_else(|| {
            anyhow!(
                "{} references environment variable {} which is not set",
                key,
                value
            )
        })
    }

    /// Resolve a single ${VAR_NAME} reference
    fn resolve_env_var(value: &str) -> Option<String> {
        if value.starts_with("${") && value.ends_with('}') {
            let var_name = &value[2..value.len() - 1];
            env::var(var_name).ok()
        } else {
            Some(value.to_string())
        }
    }

    /// Check values that cannot be expressed through serde defaults
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(anyhow!("concurrency must be at least 1"));
        }
        if self.connection.max_connections == 0 {
            return Err(anyhow!("connection.max_connections must be at least 1"));
        }
        if self.schema.namespace.is_empty() || self.schema.record_name.is_empty() {
            return Err(anyhow!("schema.namespace and schema.record_name must not be empty"));
        }
        Ok(())
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    4
}

fn default_concurrency() -> usize {
    4
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_record_name() -> String {
    DEFAULT_RECORD_NAME.to_string()
}
