//! Operator entry point: sizes the repayment and requests the flash loan.

use alloy::primitives::{Address, U256};
use flashliq_chain::{aave_v3, LiquidationParams};
use tracing::{info, instrument};

use super::{check_address, FlashLiquidator, Phase};
use crate::error::{EngineError, Result};
use crate::u256_math::half_sum;

impl FlashLiquidator {
    /// Liquidate `params.user` with borrowed funds.
    ///
    /// Owner-only and non-reentrant. `params.debt_to_cover ==
    /// LiquidationParams::AUTO_DEBT_TO_COVER` repays half of the borrower's
    /// total (stable + variable) debt in `params.debt_asset`.
    #[instrument(skip(self, params), fields(user = %params.user))]
    pub fn initiate(&self, caller: Address, params: LiquidationParams) -> Result<()> {
        let _guard = self.latch.enter()?;
        self.owner.require(caller)?;
        validate(&params)?;

        self.set_phase(Phase::LoanRequested);
        let result = self.unit.run(|| self.request_loan(params));
        if result.is_err() {
            self.set_phase(Phase::Reverted);
        }
        result
    }

    fn request_loan(&self, params: LiquidationParams) -> Result<()> {
        let debt_to_cover = self.resolve_debt_to_cover(&params)?;
        let params = params.with_debt_to_cover(debt_to_cover);

        info!(
            user = %params.user,
            collateral = %params.collateral_asset,
            debt = %params.debt_asset,
            debt_to_cover = %debt_to_cover,
            receive_a_token = params.receive_a_token,
            "Requesting flash loan"
        );

        let request = aave_v3::flash_loan_call(
            self.identity,
            params.debt_asset,
            debt_to_cover,
            params.encode(),
        );
        self.pool.flash_loan(self.identity, &request, self)
    }

    /// Resolve the automatic sizing sentinel against the debt registry.
    pub(super) fn resolve_debt_to_cover(&self, params: &LiquidationParams) -> Result<U256> {
        if !params.is_auto_sized() {
            return Ok(params.debt_to_cover);
        }

        let debt = self
            .registry
            .user_reserve_debt(params.debt_asset, params.user)?;
        let amount = half_sum(debt.stable, debt.variable)
            .ok_or(EngineError::InvalidAmount("borrower debt overflows"))?;
        if amount.is_zero() {
            return Err(EngineError::InvalidAmount("borrower has no debt to cover"));
        }
        if amount > U256::from(u128::MAX) {
            return Err(EngineError::InvalidAmount("debt to cover exceeds 128 bits"));
        }

        info!(
            stable = %debt.stable,
            variable = %debt.variable,
            resolved = %amount,
            "Resolved automatic debt to cover"
        );
        Ok(amount)
    }
}

fn validate(params: &LiquidationParams) -> Result<()> {
    check_address("user", params.user)?;
    check_address("collateral_asset", params.collateral_asset)?;
    check_address("debt_asset", params.debt_asset)?;
    if params.debt_to_cover.is_zero() {
        return Err(EngineError::InvalidAmount("debt to cover is zero"));
    }
    Ok(())
}
