//! Zone Copy Configuration
//!
//! Loaded from a YAML file (`./config/cp.yaml` by default):
//!
//! ```yaml
//! log_path: ./log/zone-copy.log
//! account:
//!   secret_id: AKID...
//!   secret_key: ...
//!   end_point: teo.tencentcloudapi.com
//!   region: ap-guangzhou
//! template_zone: old.example.com
//! template_zone_id: zone-2o0i41pv2h8c
//! target_zone: new.example.com
//! target_zone_id: zone-2o1xvpmq7nn
//! ```
//!
//! `TENCENTCLOUD_SECRET_ID`, `TENCENTCLOUD_SECRET_KEY` and
//! `TENCENTCLOUD_REGION` override the account fields when set.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ZoneCopyError};

pub const DEFAULT_CONFIG_PATH: &str = "./config/cp.yaml";
pub const DEFAULT_ENDPOINT: &str = "teo.tencentcloudapi.com";

const ENV_SECRET_ID: &str = "TENCENTCLOUD_SECRET_ID";
const ENV_SECRET_KEY: &str = "TENCENTCLOUD_SECRET_KEY";
const ENV_REGION: &str = "TENCENTCLOUD_REGION";

/// API account used for both zones
#[derive(Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    #[serde(default)]
    pub secret_id: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_endpoint")]
    pub end_point: String,
    #[serde(default)]
    pub region: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<redacted>")
            .field("end_point", &self.end_point)
            .field("region", &self.region)
            .finish()
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneCopyConfig {
    /// Append logs to this file instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
    pub account: AccountConfig,
    /// Zone name embedded in template domain names, e.g. `old.example.com`
    #[serde(default)]
    pub template_zone: String,
    #[serde(default)]
    pub template_zone_id: String,
    #[serde(default)]
    pub target_zone: String,
    #[serde(default)]
    pub target_zone_id: String,
}

/// The two zones of one copy and the names that qualify them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyScope {
    pub source_zone_id: String,
    pub source_token: String,
    pub target_zone_id: String,
    pub target_token: String,
}

impl ZoneCopyConfig {
    /// Load, apply environment overrides and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration");

        let content = fs::read_to_string(path).map_err(|e| {
            ZoneCopyError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_yaml(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self) {
        let override_with = |field: &mut String, var: &str| {
            if let Ok(value) = env::var(var) {
                if !value.is_empty() {
                    debug!(var = %var, "Using value from environment");
                    *field = value;
                }
            }
        };

        override_with(&mut self.account.secret_id, ENV_SECRET_ID);
        override_with(&mut self.account.secret_key, ENV_SECRET_KEY);
        override_with(&mut self.account.region, ENV_REGION);
    }

    /// Every account field and zone field is required
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("account.secret_id", &self.account.secret_id),
            ("account.secret_key", &self.account.secret_key),
            ("account.end_point", &self.account.end_point),
            ("account.region", &self.account.region),
            ("template_zone", &self.template_zone),
            ("template_zone_id", &self.template_zone_id),
            ("target_zone", &self.target_zone),
            ("target_zone_id", &self.target_zone_id),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ZoneCopyError::Config(format!("{} is required", name)));
            }
        }

        if self.template_zone_id == self.target_zone_id {
            return Err(ZoneCopyError::Config(
                "template_zone_id and target_zone_id must differ".to_string(),
            ));
        }
        Ok(())
    }

    pub fn scope(&self) -> CopyScope {
        CopyScope {
            source_zone_id: self.template_zone_id.clone(),
            source_token: self.template_zone.clone(),
            target_zone_id: self.target_zone_id.clone(),
            target_token: self.target_zone.clone(),
        }
    }

    /// Example configuration written by `zone-copy init-config`
    pub fn template() -> Self {
        Self {
            log_path: Some(PathBuf::from("./log/zone-copy.log")),
            account: AccountConfig {
                secret_id: "YOUR_SECRET_ID".to_string(),
                secret_key: "YOUR_SECRET_KEY".to_string(),
                end_point: DEFAULT_ENDPOINT.to_string(),
                region: "ap-guangzhou".to_string(),
            },
            template_zone: "old.example.com".to_string(),
            template_zone_id: "zone-template".to_string(),
            target_zone: "new.example.com".to_string(),
            target_zone_id: "zone-target".to_string(),
        }
    }

    /// Write the configuration as YAML; an existing file is never replaced
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(ZoneCopyError::Config(format!(
                "{} already exists",
                path.display()
            )));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}
