//! Configuration for the staging harness
//!
//! Two sources feed a [`ProductService`](crate::product::ProductService):
//!
//! 1. **Product configuration** ([`ProductConfig`]) - which tile to stage and
//!    the two JSON documents used to configure it. Built in code by tests or
//!    loaded from a TOML file by the CLI.
//! 2. **Ops Manager environment** ([`OmEnvironment`]) - credentials and
//!    target URL, read from `OM_USERNAME`, `OM_PASSWORD` and `OM_URL`. `om`
//!    itself reads the credentials from the environment; only the URL is
//!    passed on the command line.
//!
//! # Product config file
//!
//! ```toml
//! [product]
//! name = "p-redis"
//! version = "2.4.0"
//! properties_file = "fixtures/properties.json"
//! network_config_file = "fixtures/network.json"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::{HarnessError, Result};

/// Environment variable holding the Ops Manager username.
pub const OM_USERNAME: &str = "OM_USERNAME";
/// Environment variable holding the Ops Manager password.
pub const OM_PASSWORD: &str = "OM_PASSWORD";
/// Environment variable holding the Ops Manager URL.
pub const OM_URL: &str = "OM_URL";

/// The product to stage and the documents used to configure it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    /// Product name as Ops Manager reports it in the staged product `type`
    pub name: String,
    /// Product version to stage
    pub version: String,
    /// JSON document holding the minimal product properties
    pub properties_file: PathBuf,
    /// JSON document holding the product network configuration
    pub network_config_file: PathBuf,
}

#[derive(Deserialize)]
struct ProductConfigFile {
    product: ProductConfig,
}

impl ProductConfig {
    /// Creates a product configuration. Call [`validate`](Self::validate)
    /// before use, or let [`ProductService`](crate::product::ProductService)
    /// do it.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        properties_file: impl Into<PathBuf>,
        network_config_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            properties_file: properties_file.into(),
            network_config_file: network_config_file.into(),
        }
    }

    /// Checks that every field is non-empty, reporting the first one missing.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(HarnessError::configuration("Product name must be provided in config"));
        }
        if self.version.is_empty() {
            return Err(HarnessError::configuration("Product version must be provided in config"));
        }
        if self.properties_file.as_os_str().is_empty() {
            return Err(HarnessError::configuration("Properties file must be provided in config"));
        }
        if self.network_config_file.as_os_str().is_empty() {
            return Err(HarnessError::configuration(
                "Network config file must be provided in config",
            ));
        }
        Ok(())
    }

    /// Parses a `[product]` table from TOML text. Paths are taken as written.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ProductConfigFile = toml::from_str(content)
            .map_err(|e| HarnessError::io("Unable to parse product config", e))?;
        Ok(file.product)
    }

    /// Loads a `[product]` table from a TOML file, resolving relative paths
    /// against the file's directory.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::io(format!("Unable to read product config {}", path.display()), e)
        })?;
        let mut config = Self::from_toml_str(&content).map_err(|e| match e {
            HarnessError::Io {
                source, ..
            } => HarnessError::Io {
                context: format!("Unable to parse product config {}", path.display()),
                source,
            },
            other => other,
        })?;

        if let Some(base) = path.parent() {
            config.properties_file = resolve(base, &config.properties_file);
            config.network_config_file = resolve(base, &config.network_config_file);
        }
        Ok(config)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() || path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Ops Manager credentials and target.
#[derive(Clone, PartialEq, Eq)]
pub struct OmEnvironment {
    /// Value of `OM_USERNAME`
    pub username: String,
    /// Value of `OM_PASSWORD`
    pub password: String,
    /// Value of `OM_URL`, passed to `om --target`
    pub url: String,
}

impl OmEnvironment {
    /// Reads the environment from the current process.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the environment through `lookup`, failing on the first variable
    /// that is unset or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name).filter(|v| !v.is_empty()).ok_or_else(|| {
                HarnessError::configuration(format!("Environment variable {name} must be set"))
            })
        };

        Ok(Self {
            username: require(OM_USERNAME)?,
            password: require(OM_PASSWORD)?,
            url: require(OM_URL)?,
        })
    }
}

impl fmt::Debug for OmEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OmEnvironment")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("url", &self.url)
            .finish()
    }
}
