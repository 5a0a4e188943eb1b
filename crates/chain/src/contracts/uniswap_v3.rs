//! Uniswap V3 swap router interface.
//!
//! The liquidator only performs single-hop exact-input swaps, so this
//! binds `exactInputSingle` and the closed set of pool fee tiers.

use alloy::primitives::{aliases::U24, Address, Bytes, U160, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use serde::{Deserialize, Serialize};

sol! {
    /// Uniswap V3 SwapRouter (single-hop subset)
    #[derive(Debug, PartialEq, Eq)]
    interface ISwapRouter {
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }

        function exactInputSingle(ExactInputSingleParams calldata params)
            external
            payable
            returns (uint256 amountOut);
    }
}

/// Uniswap V3 fee tiers in hundredths of a basis point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeTier {
    /// 0.01% - Ultra stable pairs (e.g., USDC/USDT)
    Lowest,
    /// 0.05% - Stable pairs
    Low,
    /// 0.3% - Standard pairs
    #[default]
    Medium,
    /// 1% - Exotic pairs
    High,
}

impl FeeTier {
    /// Every tier the router accepts.
    pub const ALL: [FeeTier; 4] = [Self::Lowest, Self::Low, Self::Medium, Self::High];

    /// Fee in hundredths of a basis point.
    pub fn as_u32(&self) -> u32 {
        match self {
            Self::Lowest => 100,
            Self::Low => 500,
            Self::Medium => 3000,
            Self::High => 10000,
        }
    }

    /// Parse a raw fee, accepting only the closed set of tiers.
    pub fn from_u32(fee: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.as_u32() == fee)
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = String;

    fn try_from(fee: u32) -> Result<Self, Self::Error> {
        Self::from_u32(fee).ok_or_else(|| format!("unsupported fee tier {fee}"))
    }
}

impl From<FeeTier> for u32 {
    fn from(tier: FeeTier) -> Self {
        tier.as_u32()
    }
}

impl std::fmt::Display for FeeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Build single-hop exact-input swap parameters.
///
/// The price limit is always disabled; the minimum output is the only
/// slippage protection.
pub fn exact_input_single(
    token_in: Address,
    token_out: Address,
    fee: FeeTier,
    recipient: Address,
    deadline: u64,
    amount_in: U256,
    amount_out_minimum: U256,
) -> ISwapRouter::ExactInputSingleParams {
    ISwapRouter::ExactInputSingleParams {
        tokenIn: token_in,
        tokenOut: token_out,
        fee: U24::from(fee.as_u32()),
        recipient,
        deadline: U256::from(deadline),
        amountIn: amount_in,
        amountOutMinimum: amount_out_minimum,
        sqrtPriceLimitX96: U160::ZERO,
    }
}

/// Encode `exactInputSingle` calldata.
pub fn encode_exact_input_single(params: ISwapRouter::ExactInputSingleParams) -> Bytes {
    let call = ISwapRouter::exactInputSingleCall { params };
    Bytes::from(call.abi_encode())
}
