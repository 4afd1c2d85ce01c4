//! CTF (Conditional Token Framework) merge encoding
//!
//! Builds the call that turns YES + NO outcome tokens back into USDC.
//!
//! # Market types
//!
//! - **Regular**: `ConditionalTokens.mergePositions(collateral, parent, condition, partition, amount)`
//!   on the CTF contract. Parent collection is always zero and the partition is
//!   always `[1, 2]` (YES = 0b01, NO = 0b10).
//! - **Negative risk**: `NegRiskAdapter.mergePositions(condition, amount)` on the
//!   adapter, which resolves collateral and partition itself.
//!
//! # Gas
//!
//! The gas limit is a fixed, oversized constant instead of an estimate. Wasted
//! headroom is accepted so that estimation can never fail a merge. Gas price is
//! whatever the node reports at the time of the call.
//!
//! # Usage
//!
//! ```rust,ignore
//! use polymarket::domain::MergeRequest;
//! use polymarket::infrastructure::client::ctf::{MergeCall, TransactionPayload};
//!
//! let request = MergeRequest::parse("1000000", "12345", "true")?;
//! let call = MergeCall::from_request(&request);
//! let payload = TransactionPayload::new(&call, nonce, gas_price);
//! ```

use ethers::abi::AbiEncode;
use ethers::contract::abigen;
use ethers::types::{Address, Bytes, U256};

use crate::domain::{MarketKind, MergeRequest};

// Contract addresses on Polygon
pub const POLYGON_RPC_URL: &str = "https://polygon-rpc.com";
pub const POLYGON_CHAIN_ID: u64 = 137;
pub const CTF_CONTRACT: &str = "0x4D97DCd97eC945f40cF65F87097ACe5EA0476045";
pub const NEG_RISK_ADAPTER: &str = "0xd91E80cF2E7be2e162c6513ceD06f1dD0dA35296";
pub const USDC_ADDRESS: &str = "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174";

/// Gas limit for a merge executed through the Safe
pub const MERGE_GAS_LIMIT: u64 = 10_000_000;

/// Binary market partition: outcome slot 1 and outcome slot 2
pub const BINARY_PARTITION: [u64; 2] = [1, 2];

/// Parent collection ID is always zero for top-level Polymarket conditions
pub const ZERO_COLLECTION_ID: [u8; 32] = [0u8; 32];

abigen!(
    ConditionalTokens,
    r#"[
        function mergePositions(address collateralToken, bytes32 parentCollectionId, bytes32 conditionId, uint256[] calldata partition, uint256 amount) external
    ]"#
);

abigen!(
    NegRiskAdapter,
    r#"[
        function mergePositions(bytes32 conditionId, uint256 amount) external
    ]"#
);

/// Conditional tokens contract address
pub fn ctf_address() -> Address {
    address_from_const(CTF_CONTRACT)
}

/// Negative-risk adapter contract address
pub fn neg_risk_adapter_address() -> Address {
    address_from_const(NEG_RISK_ADAPTER)
}

/// USDC (collateral) token address
pub fn usdc_address() -> Address {
    address_from_const(USDC_ADDRESS)
}

fn address_from_const(address: &str) -> Address {
    address.parse().expect("hardcoded contract address is valid")
}

/// A merge call, one variant per market type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeCall {
    Regular {
        collateral: Address,
        parent_collection_id: [u8; 32],
        condition_id: [u8; 32],
        partition: Vec<U256>,
        amount: U256,
    },
    NegRisk {
        condition_id: [u8; 32],
        amount: U256,
    },
}

impl MergeCall {
    pub fn from_request(request: &MergeRequest) -> Self {
        match request.market {
            MarketKind::NegRisk => MergeCall::NegRisk {
                condition_id: request.condition_id,
                amount: request.amount,
            },
            MarketKind::Regular => MergeCall::Regular {
                collateral: usdc_address(),
                parent_collection_id: ZERO_COLLECTION_ID,
                condition_id: request.condition_id,
                partition: BINARY_PARTITION.iter().map(|&i| U256::from(i)).collect(),
                amount: request.amount,
            },
        }
    }

    /// Contract the call is sent to
    pub fn target(&self) -> Address {
        match self {
            MergeCall::Regular { .. } => ctf_address(),
            MergeCall::NegRisk { .. } => neg_risk_adapter_address(),
        }
    }

    /// ABI-encoded call data (selector + arguments)
    pub fn calldata(&self) -> Bytes {
        match self {
            MergeCall::Regular {
                collateral,
                parent_collection_id,
                condition_id,
                partition,
                amount,
            } => conditional_tokens::MergePositionsCall {
                collateral_token: *collateral,
                parent_collection_id: *parent_collection_id,
                condition_id: *condition_id,
                partition: partition.clone(),
                amount: *amount,
            }
            .encode()
            .into(),
            MergeCall::NegRisk { condition_id, amount } => neg_risk_adapter::MergePositionsCall {
                condition_id: *condition_id,
                amount: *amount,
            }
            .encode()
            .into(),
        }
    }
}

/// Fully assembled transaction parameters for one merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPayload {
    pub to: Address,
    pub data: Bytes,
    pub chain_id: u64,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub nonce: U256,
}

impl TransactionPayload {
    /// Chain ID and gas limit are fixed; only nonce and gas price come from the network.
    pub fn new(call: &MergeCall, nonce: U256, gas_price: U256) -> Self {
        Self {
            to: call.target(),
            data: call.calldata(),
            chain_id: POLYGON_CHAIN_ID,
            gas_price,
            gas_limit: U256::from(MERGE_GAS_LIMIT),
            nonce,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::AbiDecode;
    use ethers::utils::id;

    fn condition_12345() -> [u8; 32] {
        let mut bytes = [0u8; 32];
        U256::from(12345u64).to_big_endian(&mut bytes);
        bytes
    }

    #[test]
    fn test_contract_addresses() {
        assert_eq!(ctf_address(), CTF_CONTRACT.parse::<Address>().unwrap());
        assert_eq!(neg_risk_adapter_address(), NEG_RISK_ADAPTER.parse::<Address>().unwrap());
        assert_eq!(usdc_address(), USDC_ADDRESS.parse::<Address>().unwrap());
        assert_ne!(ctf_address(), neg_risk_adapter_address());
    }

    #[test]
    fn test_neg_risk_call_encoding() {
        let request = MergeRequest::parse("1000000", "12345", "true").unwrap();
        let call = MergeCall::from_request(&request);

        assert_eq!(call.target(), NEG_RISK_ADAPTER.parse::<Address>().unwrap());

        let data = call.calldata();
        assert_eq!(&data[..4], &id("mergePositions(bytes32,uint256)"));
        // selector + two static words
        assert_eq!(data.len(), 4 + 32 * 2);

        let decoded = neg_risk_adapter::MergePositionsCall::decode(&data).unwrap();
        assert_eq!(decoded.condition_id, condition_12345());
        assert_eq!(decoded.amount, U256::from(1_000_000u64));
    }

    #[test]
    fn test_regular_call_encoding() {
        let request = MergeRequest::parse("1000000", "12345", "false").unwrap();
        let call = MergeCall::from_request(&request);

        assert_eq!(call.target(), CTF_CONTRACT.parse::<Address>().unwrap());

        let data = call.calldata();
        assert_eq!(
            &data[..4],
            &id("mergePositions(address,bytes32,bytes32,uint256[],uint256)")
        );

        let decoded = conditional_tokens::MergePositionsCall::decode(&data).unwrap();
        assert_eq!(decoded.collateral_token, USDC_ADDRESS.parse::<Address>().unwrap());
        assert_eq!(decoded.parent_collection_id, [0u8; 32]);
        assert_eq!(decoded.condition_id, condition_12345());
        assert_eq!(decoded.partition, vec![U256::from(1), U256::from(2)]);
        assert_eq!(decoded.amount, U256::from(1_000_000u64));
    }

    #[test]
    fn test_any_non_true_flag_is_regular() {
        for flag in ["false", "TRUE", "yes", "neg_risk", ""] {
            let request = MergeRequest::parse("1", "0x01", flag).unwrap();
            let call = MergeCall::from_request(&request);
            assert!(matches!(call, MergeCall::Regular { .. }), "flag {:?}", flag);
            assert_eq!(call.target(), ctf_address());
        }
    }

    #[test]
    fn test_payload_fixed_fields() {
        for flag in ["true", "false"] {
            let request = MergeRequest::parse("42", "0xabcd", flag).unwrap();
            let call = MergeCall::from_request(&request);
            let payload = TransactionPayload::new(&call, U256::from(7), U256::from(30_000_000_000u64));

            assert_eq!(payload.chain_id, 137);
            assert_eq!(payload.gas_limit, U256::from(10_000_000u64));
            assert_eq!(payload.gas_price, U256::from(30_000_000_000u64));
            assert_eq!(payload.nonce, U256::from(7));
            assert_eq!(payload.to, call.target());
            assert_eq!(payload.data, call.calldata());
        }
    }
}
