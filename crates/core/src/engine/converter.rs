//! Bounded-slippage conversion of seized collateral into the debt asset.

use alloy::primitives::{Address, U256};
use flashliq_chain::uniswap_v3;
use tracing::{info, warn};

use super::FlashLiquidator;
use crate::error::{EngineError, Result};
use crate::u256_math::apply_basis_points;

impl FlashLiquidator {
    /// Swap `amount_in` of `collateral_asset` for `debt_asset` in one hop.
    ///
    /// Returns the output actually credited to the engine.
    pub(super) fn convert(
        &self,
        collateral_asset: Address,
        debt_asset: Address,
        amount_in: U256,
    ) -> Result<U256> {
        if amount_in.is_zero() {
            return Err(EngineError::InvalidAmount("nothing to convert"));
        }
        if collateral_asset == debt_asset {
            return Err(EngineError::SameAsset {
                asset: collateral_asset,
            });
        }

        let config = self.config();
        let router = self.router.address();

        let amount_out_min = apply_basis_points(amount_in, config.max_slippage_bps)
            .ok_or(EngineError::InvalidAmount("conversion amount overflows"))?;

        let now = self.clock.now();
        let buffer = config.swap_deadline_buffer_secs;
        let deadline = now
            .checked_add(buffer)
            .filter(|deadline| *deadline > now)
            .ok_or(EngineError::InvalidDeadline { now, buffer })?;

        self.ledger
            .approve(collateral_asset, self.identity, router, amount_in)?;

        let swap = uniswap_v3::exact_input_single(
            collateral_asset,
            debt_asset,
            config.default_swap_fee,
            self.identity,
            deadline,
            amount_in,
            amount_out_min,
        );

        let before = self.ledger.balance_of(debt_asset, self.identity)?;
        let reported = self.router.exact_input_single(self.identity, &swap)?;
        let after = self.ledger.balance_of(debt_asset, self.identity)?;
        let received = after.saturating_sub(before);

        if received != reported {
            warn!(reported = %reported, received = %received, "Router output mismatch");
        }
        if received < amount_out_min {
            return Err(EngineError::Slippage {
                received,
                minimum: amount_out_min,
            });
        }

        self.ledger
            .approve(collateral_asset, self.identity, router, U256::ZERO)?;

        info!(
            amount_in = %amount_in,
            amount_out = %received,
            min_out = %amount_out_min,
            fee = %config.default_swap_fee,
            deadline,
            "Collateral converted"
        );
        Ok(received)
    }
}
