//! `amm` - quotes and offline simulation against the exchange core

use amm::V2Math;
use anyhow::Result;
use clap::{Parser, Subcommand};
use exchange_config::{init_tracing, ExchangeConfig, LoggingConfig};
use std::path::PathBuf;
use types::{parse_amount, Amount};

mod scenario;

use scenario::Scenario;

#[derive(Parser)]
#[command(name = "amm")]
#[command(about = "Constant-product AMM quotes and swap simulation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Output for an exact input against one pair, after the 0.3% pair fee
    AmountOut {
        #[arg(value_parser = parse_amount)]
        amount_in: Amount,
        #[arg(value_parser = parse_amount)]
        reserve_in: Amount,
        #[arg(value_parser = parse_amount)]
        reserve_out: Amount,
    },
    /// Input required for an exact output against one pair
    AmountIn {
        #[arg(value_parser = parse_amount)]
        amount_out: Amount,
        #[arg(value_parser = parse_amount)]
        reserve_in: Amount,
        #[arg(value_parser = parse_amount)]
        reserve_out: Amount,
    },
    /// Seed pools from a scenario file and run one swap, printing a JSON report
    Simulate {
        /// Exchange configuration with a [scenario] section
        #[arg(short, long)]
        config: PathBuf,
        /// Environment override file under `environments/` next to the config
        #[arg(short, long)]
        env: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::AmountOut {
            amount_in,
            reserve_in,
            reserve_out,
        } => {
            init_tracing(&LoggingConfig::default())?;
            println!("{}", V2Math::get_amount_out(amount_in, reserve_in, reserve_out)?);
        }

        Commands::AmountIn {
            amount_out,
            reserve_in,
            reserve_out,
        } => {
            init_tracing(&LoggingConfig::default())?;
            println!("{}", V2Math::get_amount_in(amount_out, reserve_in, reserve_out)?);
        }

        Commands::Simulate { config, env } => {
            let exchange_config = ExchangeConfig::load(&config, env.as_deref())?;
            init_tracing(&exchange_config.logging)?;
            let scenario = Scenario::load(&config)?;
            let report = scenario.run(&exchange_config)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
