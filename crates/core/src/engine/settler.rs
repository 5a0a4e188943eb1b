//! Repayment approval and profit accounting.

use alloy::primitives::U256;
use flashliq_chain::LiquidationParams;
use tracing::{info, warn};

use super::{FlashLiquidator, Phase};
use crate::error::{EngineError, Result};
use crate::events::EngineEvent;

impl FlashLiquidator {
    /// Approve the pool for principal + premium and record the profit.
    ///
    /// Fails with [`EngineError::InsufficientFunds`] before granting any
    /// allowance if the debt-asset balance cannot cover the loan.
    pub(super) fn settle(
        &self,
        params: &LiquidationParams,
        principal: U256,
        premium: U256,
        collateral_received: U256,
    ) -> Result<bool> {
        let owed = principal
            .checked_add(premium)
            .ok_or(EngineError::InvalidAmount("amount owed overflows"))?;

        let balance = self.ledger.balance_of(params.debt_asset, self.identity)?;
        if balance < owed {
            warn!(balance = %balance, owed = %owed, "Cannot repay flash loan");
            return Err(EngineError::InsufficientFunds { balance, owed });
        }

        self.ledger
            .approve(params.debt_asset, self.identity, self.pool.address(), owed)?;
        let profit = balance - owed;

        let threshold = self.config.read().min_profit_threshold;
        if profit < threshold {
            warn!(profit = %profit, threshold = %threshold, "Profit below configured threshold");
        }

        self.events.emit(EngineEvent::LiquidationCompleted {
            user: params.user,
            collateral_asset: params.collateral_asset,
            debt_asset: params.debt_asset,
            debt_covered: principal,
            collateral_received,
            profit,
        });
        self.set_phase(Phase::Settled);

        info!(
            user = %params.user,
            principal = %principal,
            premium = %premium,
            profit = %profit,
            "Liquidation settled"
        );
        Ok(true)
    }
}
