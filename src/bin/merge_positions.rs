//! Merge YES + NO positions of one market back into USDC via the Gnosis Safe
//!
//! Usage:
//!   cargo run --bin merge_positions <amount> <condition_id> <is_neg_risk_market>
//!
//! Examples:
//!   cargo run --bin merge_positions 1000000 0xabc123...def false
//!   cargo run --bin merge_positions 1000000 0xabc123...def true
//!
//! On success the transaction hash is the only line on stdout.

use anyhow::{Context, Result};
use poly_merger::bin_common::{parse_args, parse_command, report, Command, MergeArgs, USAGE};
use poly_merger::polymarket::{connect, init_tracing, MergerConfig, TxHash};
use tracing::info;

async fn run(args: &MergeArgs) -> Result<TxHash> {
    let request = args.to_request()?;
    let config = MergerConfig::load().context("Failed to load configuration")?;
    let executor = connect(&config).context("Failed to connect")?;

    info!("[Merge] Signer {:?} via Safe {:?}", executor.signer(), config.safe_address);

    let tx_hash = executor.merge(&request).await?;
    Ok(tx_hash)
}

#[tokio::main]
async fn main() {
    init_tracing();

    let command = match parse_command(&parse_args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprint!("{}", USAGE);
            std::process::exit(1);
        }
    };

    let code = match command {
        Command::Help => {
            print!("{}", USAGE);
            0
        }
        Command::Merge(args) => {
            let result = run(&args).await;
            report(result, &mut std::io::stdout(), &mut std::io::stderr())
        }
    };

    std::process::exit(code);
}
