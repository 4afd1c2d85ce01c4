//! CLI utilities for binaries
//!
//! Positional argument handling for `merge_positions`.

use anyhow::{bail, Context};
use polymarket::domain::MergeRequest;

pub const USAGE: &str = "\
Usage:
  merge_positions <amount> <condition_id> <is_neg_risk_market>

Arguments:
  amount              Raw token units to merge (1000000 = 1 YES + 1 NO)
  condition_id        Market condition ID (0x hex, or decimal)
  is_neg_risk_market  'true' for negative-risk markets, anything else otherwise

Example:
  merge_positions 1000000 0xabc...def true

Environment (.env in the working directory, else ../.env):
  PK / PRIVATE_KEY             Safe owner private key
  BROWSER_ADDRESS / PROXY_WALLET  Safe wallet address
  POLYGON_RPC_URL              Optional RPC endpoint
";

/// What the binary was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Merge(MergeArgs),
}

/// The three positional arguments, as given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeArgs {
    pub amount: String,
    pub condition_id: String,
    pub neg_risk_flag: String,
}

impl MergeArgs {
    pub fn to_request(&self) -> anyhow::Result<MergeRequest> {
        MergeRequest::parse(&self.amount, &self.condition_id, &self.neg_risk_flag)
            .context("Invalid merge arguments")
    }
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

/// Interpret positional arguments. Extra trailing arguments are ignored.
pub fn parse_command(args: &[String]) -> anyhow::Result<Command> {
    if matches!(args.first().map(String::as_str), Some("-h" | "--help")) {
        return Ok(Command::Help);
    }

    match args {
        [amount, condition_id, neg_risk_flag, ..] => Ok(Command::Merge(MergeArgs {
            amount: amount.clone(),
            condition_id: condition_id.clone(),
            neg_risk_flag: neg_risk_flag.clone(),
        })),
        _ => bail!(
            "expected 3 arguments <amount> <condition_id> <is_neg_risk_market>, got {}",
            args.len()
        ),
    }
}
