//! Liquidation parameters carried through the flash-loan callback.
//!
//! The liquidator serializes its parameters into the `params` bytes of
//! `IPool.flashLoan`; the pool hands them back untouched in
//! `executeOperation`. Encoding is plain `abi.encode` of
//! [`LiquidationPayload`].

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolType;

use crate::error::CodecError;
use crate::packing::PackedLiquidation;

sol! {
    /// ABI shape of the flash-loan payload.
    #[derive(Debug, PartialEq, Eq)]
    struct LiquidationPayload {
        address user;
        address collateralAsset;
        address debtAsset;
        uint256 debtToCover;
        bool receiveAToken;
        uint16 collateralAssetId;
        uint16 debtAssetId;
    }
}

/// Parameters of a single liquidation.
///
/// `debt_to_cover == U256::MAX` asks the liquidator to size the repayment
/// itself (half of the borrower's total debt in `debt_asset`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidationParams {
    /// Borrower being liquidated
    pub user: Address,
    /// Collateral to seize
    pub collateral_asset: Address,
    /// Debt to repay
    pub debt_asset: Address,
    /// Amount of `debt_asset` to repay
    pub debt_to_cover: U256,
    /// Receive seized collateral as aTokens instead of the underlying
    pub receive_a_token: bool,
    /// Compact reserve index of `collateral_asset`
    pub collateral_asset_id: u16,
    /// Compact reserve index of `debt_asset`
    pub debt_asset_id: u16,
}

impl LiquidationParams {
    /// Sentinel for "compute the repayment automatically".
    pub const AUTO_DEBT_TO_COVER: U256 = U256::MAX;

    /// Whether the repayment amount still has to be resolved.
    pub fn is_auto_sized(&self) -> bool {
        self.debt_to_cover == Self::AUTO_DEBT_TO_COVER
    }

    /// Whether seized collateral must be swapped back into the debt asset.
    pub fn needs_conversion(&self) -> bool {
        self.collateral_asset != self.debt_asset
    }

    /// Copy with a resolved repayment amount.
    pub fn with_debt_to_cover(self, debt_to_cover: U256) -> Self {
        Self {
            debt_to_cover,
            ..self
        }
    }

    /// Packed L2Pool arguments for repaying `debt_amount`.
    pub fn packed(&self, debt_amount: U256) -> Result<PackedLiquidation, CodecError> {
        PackedLiquidation::new(
            self.collateral_asset_id,
            self.debt_asset_id,
            self.user,
            debt_amount,
            self.receive_a_token,
        )
    }

    /// ABI-encode for the flash-loan `params` field.
    pub fn encode(&self) -> Bytes {
        let payload = LiquidationPayload::from(*self);
        Bytes::from(LiquidationPayload::abi_encode(&payload))
    }

    /// Decode from flash-loan `params`.
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let payload = LiquidationPayload::abi_decode(data, true)?;
        Ok(payload.into())
    }
}

impl From<LiquidationParams> for LiquidationPayload {
    fn from(p: LiquidationParams) -> Self {
        Self {
            user: p.user,
            collateralAsset: p.collateral_asset,
            debtAsset: p.debt_asset,
            debtToCover: p.debt_to_cover,
            receiveAToken: p.receive_a_token,
            collateralAssetId: p.collateral_asset_id,
            debtAssetId: p.debt_asset_id,
        }
    }
}

impl From<LiquidationPayload> for LiquidationParams {
    fn from(p: LiquidationPayload) -> Self {
        Self {
            user: p.user,
            collateral_asset: p.collateralAsset,
            debt_asset: p.debtAsset,
            debt_to_cover: p.debtToCover,
            receive_a_token: p.receiveAToken,
            collateral_asset_id: p.collateralAssetId,
            debt_asset_id: p.debtAssetId,
        }
    }
}
