//! # Exchange Configuration
//!
//! Typed configuration for the exchange core and its operator tooling.
//!
//! ## Features
//!
//! - **Factory settings**: protocol fee recipient and the identity allowed to change it
//! - **Router settings**: owner, treasury, platform and referral fee rates
//! - **Logging**: level filter and output format for the tracing subscriber
//!
//! ## Usage
//!
//! ```rust,no_run
//! use exchange_config::{init_tracing, ExchangeConfig};
//! use std::path::Path;
//!
//! let config = ExchangeConfig::load(Path::new("config/exchange.toml"), Some("local"))?;
//! init_tracing(&config.logging)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod logging;
pub mod settings;

pub use logging::{init_tracing, LoggingConfig};
pub use settings::{
    ExchangeConfig, FactorySettings, RouterSettings, DEFAULT_PLATFORM_FEE_BPS,
    DEFAULT_REFERRAL_FEE_BPS, ENV_PREFIX, FEE_DENOMINATOR_BPS,
};
