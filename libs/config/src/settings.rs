//! Exchange Configuration Module
//!
//! Loads [`ExchangeConfig`] from a base TOML file, an optional
//! environment-specific override file next to it, and finally `AMM_`-prefixed
//! environment variables (`AMM_ROUTER__PLATFORM_FEE_BPS=250`).

use crate::LoggingConfig;
use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};
use types::Address;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "AMM";
/// Fee rates are expressed against this denominator
pub const FEE_DENOMINATOR_BPS: u32 = 10_000;
pub const DEFAULT_PLATFORM_FEE_BPS: u32 = 100;
pub const DEFAULT_REFERRAL_FEE_BPS: u32 = 50;

/// Main exchange configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ExchangeConfig {
    pub factory: FactorySettings,
    pub router: RouterSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FactorySettings {
    /// Identity allowed to change the protocol fee recipient
    pub fee_to_setter: Address,
    /// Protocol fee recipient; absent means the protocol fee is off
    #[serde(default)]
    pub fee_to: Option<Address>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RouterSettings {
    pub owner: Address,
    pub treasury: Address,
    #[serde(default = "default_platform_fee")]
    pub platform_fee_bps: u32,
    #[serde(default = "default_referral_fee")]
    pub referral_fee_bps: u32,
}

fn default_platform_fee() -> u32 {
    DEFAULT_PLATFORM_FEE_BPS
}

fn default_referral_fee() -> u32 {
    DEFAULT_REFERRAL_FEE_BPS
}

impl RouterSettings {
    pub fn new(owner: Address, treasury: Address) -> Self {
        Self {
            owner,
            treasury,
            platform_fee_bps: DEFAULT_PLATFORM_FEE_BPS,
            referral_fee_bps: DEFAULT_REFERRAL_FEE_BPS,
        }
    }
}

impl ExchangeConfig {
    /// Load configuration from files with environment overrides
    pub fn load(base_path: &Path, environment: Option<&str>) -> Result<Self> {
        Self::load_with_overrides(base_path, environment, None)
    }

    /// Same as [`ExchangeConfig::load`] but reads overrides from `overrides`
    /// instead of the process environment when given
    pub fn load_with_overrides(
        base_path: &Path,
        environment: Option<&str>,
        overrides: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder().add_source(File::from(base_path).required(true));

        if let Some(env) = environment {
            let env_file = base_path
                .parent()
                .unwrap_or(Path::new("."))
                .join("environments")
                .join(format!("{env}.toml"));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(overrides),
        );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from TOML text without any overrides
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(contents, config::FileFormat::Toml))
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Fee rates must satisfy `referral < platform < 10000`
    pub fn validate(&self) -> Result<()> {
        let router = &self.router;
        ensure!(
            router.platform_fee_bps < FEE_DENOMINATOR_BPS,
            "platform_fee_bps ({}) must be below {}",
            router.platform_fee_bps,
            FEE_DENOMINATOR_BPS
        );
        ensure!(
            router.referral_fee_bps < router.platform_fee_bps,
            "referral_fee_bps ({}) must be below platform_fee_bps ({})",
            router.referral_fee_bps,
            router.platform_fee_bps
        );
        ensure!(
            !router.treasury.is_zero(),
            "router treasury must not be the zero address"
        );
        Ok(())
    }
}
