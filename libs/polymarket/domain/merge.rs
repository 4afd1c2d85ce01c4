//! Merge request domain model
//!
//! A merge converts equal amounts of the YES and NO outcome tokens of one
//! market back into collateral. The request is built once from command-line
//! input and never mutated.

use ethers::types::U256;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeRequestError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid condition ID: {0}")]
    InvalidConditionId(String),
}

pub type Result<T> = std::result::Result<T, MergeRequestError>;

/// Market flavour, decides which contract receives the merge call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketKind {
    /// Plain binary market, merged directly on the conditional tokens contract
    Regular,
    /// Negative-risk market, merged through the adapter contract
    NegRisk,
}

impl MarketKind {
    /// Only the exact string `"true"` selects the negative-risk path.
    pub fn from_flag(flag: &str) -> Self {
        if flag == "true" {
            MarketKind::NegRisk
        } else {
            MarketKind::Regular
        }
    }
}

impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketKind::Regular => write!(f, "Regular"),
            MarketKind::NegRisk => write!(f, "NegRisk"),
        }
    }
}

/// One merge to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Raw token units (6 decimals, 1_000_000 = 1 share pair)
    pub amount: U256,
    pub condition_id: [u8; 32],
    pub market: MarketKind,
}

impl MergeRequest {
    pub fn new(amount: U256, condition_id: [u8; 32], market: MarketKind) -> Self {
        Self {
            amount,
            condition_id,
            market,
        }
    }

    /// Build a request from the three raw command-line strings.
    ///
    /// Values are only converted into their ABI types here. Whether the amount
    /// is actually held or the condition exists is left to the contracts.
    pub fn parse(amount: &str, condition_id: &str, neg_risk_flag: &str) -> Result<Self> {
        Ok(Self::new(
            parse_amount(amount)?,
            parse_condition_id(condition_id)?,
            MarketKind::from_flag(neg_risk_flag),
        ))
    }

    pub fn condition_id_hex(&self) -> String {
        format!("0x{}", hex::encode(self.condition_id))
    }
}

/// Parse a raw token amount (decimal, or `0x` hex)
pub fn parse_amount(amount: &str) -> Result<U256> {
    let trimmed = amount.trim();
    if let Some(hex_str) = trimmed.strip_prefix("0x") {
        if hex_str.is_empty() || !hex_str.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(MergeRequestError::InvalidAmount(amount.to_string()));
        }
        return U256::from_str_radix(hex_str, 16)
            .map_err(|e| MergeRequestError::InvalidAmount(format!("{}: {}", amount, e)));
    }
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MergeRequestError::InvalidAmount(amount.to_string()));
    }
    U256::from_dec_str(trimmed)
        .map_err(|e| MergeRequestError::InvalidAmount(format!("{}: {}", amount, e)))
}

/// Parse a condition ID into bytes32
///
/// Accepts `0x` hex up to 64 digits (left-padded) or a decimal integer.
pub fn parse_condition_id(condition_id: &str) -> Result<[u8; 32]> {
    let trimmed = condition_id.trim();

    if let Some(hex_str) = trimmed.strip_prefix("0x") {
        if hex_str.is_empty() || hex_str.len() > 64 {
            return Err(MergeRequestError::InvalidConditionId(format!(
                "Expected 1 to 64 hex chars, got {}",
                hex_str.len()
            )));
        }
        let padded = format!("{:0>64}", hex_str);
        let bytes = hex::decode(&padded)
            .map_err(|e| MergeRequestError::InvalidConditionId(e.to_string()))?;
        let mut result = [0u8; 32];
        result.copy_from_slice(&bytes);
        return Ok(result);
    }

    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MergeRequestError::InvalidConditionId(condition_id.to_string()));
    }

    let value = U256::from_dec_str(trimmed)
        .map_err(|e| MergeRequestError::InvalidConditionId(format!("{}: {}", condition_id, e)))?;
    let mut result = [0u8; 32];
    value.to_big_endian(&mut result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_kind_from_flag() {
        assert_eq!(MarketKind::from_flag("true"), MarketKind::NegRisk);
        assert_eq!(MarketKind::from_flag("false"), MarketKind::Regular);
        assert_eq!(MarketKind::from_flag("True"), MarketKind::Regular);
        assert_eq!(MarketKind::from_flag("1"), MarketKind::Regular);
        assert_eq!(MarketKind::from_flag(""), MarketKind::Regular);
        assert_eq!(MarketKind::from_flag("true "), MarketKind::Regular);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1000000").unwrap(), U256::from(1_000_000u64));
        assert_eq!(parse_amount("0x0f4240").unwrap(), U256::from(1_000_000u64));
        assert_eq!(parse_amount("0").unwrap(), U256::zero());
        assert!(parse_amount("").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("1.5").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_parse_amount_rejects_malformed_hex() {
        assert_eq!(
            parse_amount("0x"),
            Err(MergeRequestError::InvalidAmount("0x".to_string()))
        );
        assert!(parse_amount("0x0x5").is_err());
        assert!(parse_amount("0xzz").is_err());
        assert!(parse_amount("0x+5").is_err());
        assert_eq!(parse_amount("0xff").unwrap(), U256::from(255u64));
    }

    #[test]
    fn test_parse_condition_id_full_hex() {
        let valid = "0xabcd1234abcd1234abcd1234abcd1234abcd1234abcd1234abcd1234abcd1234";
        let bytes = parse_condition_id(valid).unwrap();
        assert_eq!(bytes[0], 0xab);
        assert_eq!(bytes[31], 0x34);
    }

    #[test]
    fn test_parse_condition_id_short_hex_is_left_padded() {
        let bytes = parse_condition_id("0x3039").unwrap();
        assert_eq!(&bytes[..30], &[0u8; 30]);
        assert_eq!(bytes[30], 0x30);
        assert_eq!(bytes[31], 0x39);
    }

    #[test]
    fn test_parse_condition_id_decimal() {
        // 12345 = 0x3039
        let bytes = parse_condition_id("12345").unwrap();
        assert_eq!(bytes, parse_condition_id("0x3039").unwrap());
    }

    #[test]
    fn test_parse_condition_id_rejects_garbage() {
        assert!(parse_condition_id("").is_err());
        assert!(parse_condition_id("0x").is_err());
        assert!(parse_condition_id("0xzz").is_err());
        assert!(parse_condition_id("market-1").is_err());
        let too_long = format!("0x{}", "a".repeat(65));
        assert!(parse_condition_id(&too_long).is_err());
    }

    #[test]
    fn test_merge_request_parse() {
        let request = MergeRequest::parse("1000000", "12345", "true").unwrap();
        assert_eq!(request.amount, U256::from(1_000_000u64));
        assert_eq!(request.market, MarketKind::NegRisk);
        assert_eq!(
            request.condition_id_hex(),
            "0x0000000000000000000000000000000000000000000000000000000000003039"
        );

        let request = MergeRequest::parse("1000000", "12345", "false").unwrap();
        assert_eq!(request.market, MarketKind::Regular);
    }

    #[test]
    fn test_market_kind_display() {
        assert_eq!(format!("{}", MarketKind::Regular), "Regular");
        assert_eq!(format!("{}", MarketKind::NegRisk), "NegRisk");
    }
}
