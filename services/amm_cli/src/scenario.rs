//! Offline swap simulation
//!
//! A scenario seeds an in-memory ledger with tokens held by a single trader,
//! provisions the listed pools through the router and then executes one
//! exact-input swap. The exchange itself is built from the `[factory]` and
//! `[router]` sections of the same file.

use amm::{AddLiquidity, Exchange, ExactInput, PairHandle};
use anyhow::{bail, Context, Result};
use exchange_config::ExchangeConfig;
use ledger::{AssetHost, FeeOnTransferToken, FungibleAsset, Ledger, StandardToken};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::{debug, info};
use types::{parse_amount, Address, Amount};

/// Seconds a simulated trade stays valid
const DEADLINE_WINDOW: u64 = 600;

fn default_timestamp() -> u64 {
    1_700_000_000
}

fn default_decimals() -> u8 {
    18
}

/// Amounts are written as base-10 strings since they exceed TOML integers
fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_amount(&raw).map_err(serde::de::Error::custom)
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    scenario: Scenario,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_timestamp")]
    pub timestamp: u64,
    /// Holds the whole supply of every token and provides all liquidity
    pub trader: Address,
    pub tokens: Vec<TokenSpec>,
    #[serde(default)]
    pub pools: Vec<PoolSpec>,
    pub swap: SwapSpec,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenSpec {
    pub address: Address,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    #[serde(deserialize_with = "decimal")]
    pub supply: Amount,
    /// Non-zero makes this a fee-on-transfer token; fees are burned
    #[serde(default)]
    pub transfer_fee_bps: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolSpec {
    pub token_a: Address,
    pub token_b: Address,
    #[serde(deserialize_with = "decimal")]
    pub amount_a: Amount,
    #[serde(deserialize_with = "decimal")]
    pub amount_b: Amount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwapSpec {
    #[serde(deserialize_with = "decimal")]
    pub amount_in: Amount,
    #[serde(default, deserialize_with = "decimal")]
    pub amount_out_min: Amount,
    pub path: Vec<Address>,
    #[serde(default)]
    pub referrer: Option<Address>,
    /// Measure what each pair received instead of trusting quoted amounts
    #[serde(default)]
    pub supporting_fee_on_transfer: bool,
}

#[derive(Debug, Serialize)]
pub struct PoolReport {
    pub pair: Address,
    pub token0: Address,
    pub token1: Address,
    pub reserve0: String,
    pub reserve1: String,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub path: Vec<Address>,
    pub amount_in: String,
    /// Platform fee paid to the treasury and referrer
    pub platform_fee: String,
    /// Per-node amounts; empty for fee-on-transfer swaps
    pub amounts: Vec<String>,
    pub amount_out: String,
    pub pools: Vec<PoolReport>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file {path:?}"))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ScenarioFile =
            toml::from_str(contents).context("Failed to parse [scenario] section")?;
        file.scenario.validate()?;
        Ok(file.scenario)
    }

    fn validate(&self) -> Result<()> {
        if self.swap.path.len() < 2 {
            bail!("swap path needs at least two tokens");
        }
        for asset in &self.swap.path {
            if !self.tokens.iter().any(|t| t.address == *asset) {
                bail!("swap path token {asset} is not declared in [[scenario.tokens]]");
            }
        }
        Ok(())
    }

    fn deploy_tokens(&self, host: &mut Ledger, router: Address) -> Result<()> {
        for spec in &self.tokens {
            let token = StandardToken::new(spec.symbol.clone(), spec.decimals)
                .with_balance(self.trader, spec.supply);
            let asset: Box<dyn FungibleAsset> = if spec.transfer_fee_bps > 0 {
                Box::new(FeeOnTransferToken::new(token, spec.transfer_fee_bps, Address::ZERO))
            } else {
                Box::new(token)
            };
            host.deploy(spec.address, asset)
                .with_context(|| format!("Failed to deploy {}", spec.symbol))?;
            host.approve(&spec.address, self.trader, router, Amount::MAX)?;
            debug!(symbol = %spec.symbol, address = %spec.address, "token deployed");
        }
        Ok(())
    }

    /// Build the exchange, seed it and run the swap
    pub fn run(&self, config: &ExchangeConfig) -> Result<Report> {
        let factory = Address::derive(b"factory", &[]);
        let router = Address::derive(b"router", &[]);
        let mut exchange =
            Exchange::from_config(Ledger::with_timestamp(self.timestamp), factory, router, config)?;
        self.deploy_tokens(exchange.host_mut(), router)?;

        let deadline = self.timestamp + DEADLINE_WINDOW;
        for pool in &self.pools {
            let added = exchange
                .add_liquidity(
                    self.trader,
                    &AddLiquidity {
                        token_a: pool.token_a,
                        token_b: pool.token_b,
                        amount_a_desired: pool.amount_a,
                        amount_b_desired: pool.amount_b,
                        amount_a_min: Amount::zero(),
                        amount_b_min: Amount::zero(),
                        to: self.trader,
                        deadline,
                    },
                )
                .with_context(|| format!("Failed to seed pool {}/{}", pool.token_a, pool.token_b))?;
            info!(
                token_a = %pool.token_a,
                token_b = %pool.token_b,
                liquidity = %added.liquidity,
                "pool seeded"
            );
        }

        let swap = &self.swap;
        let params = ExactInput {
            amount_in: swap.amount_in,
            amount_out_min: swap.amount_out_min,
            path: swap.path.clone(),
            to: self.trader,
            deadline,
            referrer: swap.referrer,
        };
        let (platform_fee, _) = exchange.router().platform_fee(swap.amount_in, swap.referrer)?;

        let (amounts, amount_out) = if swap.supporting_fee_on_transfer {
            let received = exchange
                .swap_exact_tokens_for_tokens_supporting_fee_on_transfer_tokens(self.trader, &params)?;
            (Vec::new(), received)
        } else {
            let amounts = exchange.swap_exact_tokens_for_tokens(self.trader, &params)?;
            let out = amounts.last().copied().unwrap_or_default();
            (amounts, out)
        };
        info!(amount_in = %swap.amount_in, %amount_out, "swap simulated");

        let pools = exchange
            .factory()
            .all_pairs()
            .iter()
            .filter_map(|address| exchange.pair(address))
            .map(|pair| {
                let reserves = pair.reserves();
                PoolReport {
                    pair: pair.address(),
                    token0: pair.token0(),
                    token1: pair.token1(),
                    reserve0: reserves.reserve0.to_string(),
                    reserve1: reserves.reserve1.to_string(),
                }
            })
            .collect();

        Ok(Report {
            path: swap.path.clone(),
            amount_in: swap.amount_in.to_string(),
            platform_fee: platform_fee.to_string(),
            amounts: amounts.iter().map(Amount::to_string).collect(),
            amount_out: amount_out.to_string(),
            pools,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amm::AmmError;

    const SAMPLE: &str = include_str!("../config/simulate.toml");

    fn sample() -> (ExchangeConfig, Scenario) {
        (
            ExchangeConfig::from_toml_str(SAMPLE).unwrap(),
            Scenario::from_toml_str(SAMPLE).unwrap(),
        )
    }

    #[test]
    fn test_sample_scenario_parses() {
        let (config, scenario) = sample();
        assert_eq!(config.router.platform_fee_bps, 100);
        assert_eq!(scenario.tokens.len(), 3);
        assert_eq!(scenario.pools.len(), 2);
        assert_eq!(scenario.tokens[1].decimals, 6);
        assert_eq!(scenario.swap.path.len(), 3);
        assert_eq!(scenario.swap.amount_in, Amount::exp10(18));
    }

    #[test]
    fn test_sample_scenario_runs() {
        let (config, scenario) = sample();
        let report = scenario.run(&config).unwrap();

        assert_eq!(report.amounts.len(), 3);
        assert_eq!(report.amount_out, report.amounts[2]);
        // 1% of one WETH
        assert_eq!(report.platform_fee, Amount::exp10(16).to_string());
        assert_eq!(report.pools.len(), 2);
        let out = parse_amount(&report.amount_out).unwrap();
        assert!(!out.is_zero());
    }

    #[test]
    fn test_fee_on_transfer_scenario() {
        let (config, mut scenario) = sample();
        scenario.tokens[0].transfer_fee_bps = 200;
        scenario.swap.supporting_fee_on_transfer = true;

        let report = scenario.run(&config).unwrap();
        assert!(report.amounts.is_empty());
        assert!(!parse_amount(&report.amount_out).unwrap().is_zero());

        scenario.swap.supporting_fee_on_transfer = false;
        let error = scenario.run(&config).unwrap_err();
        assert_eq!(error.downcast_ref::<AmmError>(), Some(&AmmError::K));
    }

    #[test]
    fn test_rejects_undeclared_path_token() {
        let text = SAMPLE.replace(
            "\"0x0000000000000000000000000000000000001003\",\n]",
            "\"0x0000000000000000000000000000000000009999\",\n]",
        );
        let error = Scenario::from_toml_str(&text).unwrap_err();
        assert!(error.to_string().contains("not declared"), "{error}");
    }
}
