//! Issues the packed L2Pool liquidation and measures the seized collateral.

use alloy::primitives::{Address, U256};
use flashliq_chain::LiquidationParams;
use tracing::{debug, info};

use super::FlashLiquidator;
use crate::error::Result;

impl FlashLiquidator {
    /// Repay `debt_amount` of the borrower's debt and return the collateral
    /// received, in the token the pool delivers (aToken or underlying).
    pub(super) fn execute(&self, params: &LiquidationParams, debt_amount: U256) -> Result<U256> {
        let packed = params.packed(debt_amount)?;
        let seized_token = self.seized_token(params)?;

        let pool = self.pool.address();
        let debt_asset = params.debt_asset;
        let before = self.ledger.balance_of(seized_token, self.identity)?;
        let allowance_before = self.ledger.allowance(debt_asset, self.identity, pool)?;
        debug!(
            args1 = %packed.word_a(),
            args2 = %packed.word_b(),
            "Calling packed liquidationCall"
        );
        let call = packed.to_call();
        self.pool.liquidation_call(self.identity, &call)?;
        let after = self.ledger.balance_of(seized_token, self.identity)?;

        // The pool may repay less than requested (close factor, collateral
        // cap). What it pulled is the allowance it consumed.
        let allowance_after = self.ledger.allowance(debt_asset, self.identity, pool)?;
        let repaid = allowance_before.saturating_sub(allowance_after);

        // Same token in both directions: add back what the repayment took.
        let received = if seized_token == debt_asset {
            after.saturating_add(repaid).saturating_sub(before)
        } else {
            after.saturating_sub(before)
        };

        info!(
            user = %params.user,
            debt_requested = %debt_amount,
            debt_repaid = %repaid,
            seized_token = %seized_token,
            collateral_received = %received,
            "Liquidation executed"
        );
        Ok(received)
    }

    fn seized_token(&self, params: &LiquidationParams) -> Result<Address> {
        if params.receive_a_token {
            let tokens = self.registry.reserve_tokens(params.collateral_asset)?;
            Ok(tokens.a_token)
        } else {
            Ok(params.collateral_asset)
        }
    }
}
