//! Contract bindings for the flash liquidator and the protocols it touches.
//!
//! - [`aave_v3`]: Pool flash loans, the L2Pool packed liquidation and the
//!   PoolDataProvider debt views
//! - [`uniswap_v3`]: single-hop exact-input swaps and fee tiers
//! - [`executor`]: the liquidator's own interface
//! - [`common`]: ERC20
//!
//! # Example
//!
//! ```rust,ignore
//! use flashliq_chain::{LiquidatorContract, LiquidationParams};
//!
//! let liquidator = LiquidatorContract::new(deployed);
//! let calldata = liquidator.encode_execute_liquidation(&params);
//! ```

pub mod aave_v3;
pub mod common;
pub mod executor;
pub mod uniswap_v3;

pub use aave_v3::{IL2Pool, IPool, IPoolDataProvider};
pub use common::{IERC20, NATIVE_ASSET};
pub use executor::IFlashLiquidator;
pub use uniswap_v3::{FeeTier, ISwapRouter};

use alloy::primitives::{aliases::U24, Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::payload::LiquidationParams;

/// Calldata builder for a deployed liquidator.
///
/// Encoding only; signing and submission are left to the caller.
pub struct LiquidatorContract {
    /// Contract address
    pub address: Address,
    /// Last encoded calldata, kept for inspection before sending
    calldata_cache: parking_lot::RwLock<Option<Bytes>>,
}

impl LiquidatorContract {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            calldata_cache: parking_lot::RwLock::new(None),
        }
    }

    fn stage<C: SolCall>(&self, call: C) -> Bytes {
        let calldata = Bytes::from(call.abi_encode());
        tracing::debug!(
            contract = %self.address,
            function = C::SIGNATURE,
            calldata_len = calldata.len(),
            "[CONTRACT] Encoded call"
        );
        *self.calldata_cache.write() = Some(calldata.clone());
        calldata
    }

    /// Encode the operator entry point.
    pub fn encode_execute_liquidation(&self, params: &LiquidationParams) -> Bytes {
        self.stage(IFlashLiquidator::executeLiquidationCall {
            user: params.user,
            collateralAsset: params.collateral_asset,
            debtAsset: params.debt_asset,
            debtToCover: params.debt_to_cover,
            receiveAToken: params.receive_a_token,
            collateralAssetId: params.collateral_asset_id,
            debtAssetId: params.debt_asset_id,
        })
    }

    pub fn encode_set_max_slippage(&self, bps: u16) -> Bytes {
        self.stage(IFlashLiquidator::setMaxSlippageCall {
            bps: U256::from(bps),
        })
    }

    pub fn encode_set_swap_deadline_buffer(&self, secs: u64) -> Bytes {
        self.stage(IFlashLiquidator::setSwapDeadlineBufferCall {
            secs: U256::from(secs),
        })
    }

    pub fn encode_set_default_swap_fee(&self, fee: FeeTier) -> Bytes {
        self.stage(IFlashLiquidator::setDefaultSwapFeeCall {
            fee: U24::from(fee.as_u32()),
        })
    }

    pub fn encode_set_min_profit_threshold(&self, amount: U256) -> Bytes {
        self.stage(IFlashLiquidator::setMinProfitThresholdCall { amount })
    }

    /// Encode an emergency withdrawal. `U256::MAX` withdraws the full balance.
    pub fn encode_emergency_withdraw(&self, token: Address, amount: U256, to: Address) -> Bytes {
        self.stage(IFlashLiquidator::emergencyWithdrawCall { token, amount, to })
    }

    pub fn encode_emergency_withdraw_native(&self, to: Address) -> Bytes {
        self.stage(IFlashLiquidator::emergencyWithdrawNativeCall { to })
    }

    pub fn encode_revoke_allowance(&self, token: Address, spender: Address) -> Bytes {
        self.stage(IFlashLiquidator::revokeAllowanceCall { token, spender })
    }

    pub fn encode_transfer_ownership(&self, new_owner: Address) -> Bytes {
        self.stage(IFlashLiquidator::transferOwnershipCall {
            newOwner: new_owner,
        })
    }

    /// Get cached calldata (for inspection/debugging).
    pub fn cached_calldata(&self) -> Option<Bytes> {
        self.calldata_cache.read().clone()
    }
}
