//! Flash-loan callback: authenticates the loan and drives the liquidation.

use alloy::primitives::{Address, Bytes, U256};
use flashliq_chain::LiquidationParams;
use tracing::{info, instrument, warn};

use super::{FlashLiquidator, Phase};
use crate::collaborators::FlashLoanReceiver;
use crate::error::{EngineError, Result};

/// The single asset/amount/premium triple of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct LoanLeg {
    pub asset: Address,
    pub amount: U256,
    pub premium: U256,
}

impl LoanLeg {
    fn single(assets: &[Address], amounts: &[U256], premiums: &[U256]) -> Result<Self> {
        match (assets, amounts, premiums) {
            ([asset], [amount], [premium]) => Ok(Self {
                asset: *asset,
                amount: *amount,
                premium: *premium,
            }),
            _ => Err(EngineError::InvalidAmount("expected exactly one loan leg")),
        }
    }
}

impl FlashLiquidator {
    /// Handle `executeOperation` from the lending pool.
    ///
    /// Only the configured pool may call this, and only for loans this engine
    /// initiated. Returns `true` once the pool may pull principal + premium.
    #[instrument(skip_all, fields(caller = %caller, initiator = %initiator))]
    pub fn on_loan_received(
        &self,
        caller: Address,
        assets: &[Address],
        amounts: &[U256],
        premiums: &[U256],
        initiator: Address,
        payload: &[u8],
    ) -> Result<bool> {
        let pool = self.pool.address();
        if caller != pool {
            warn!(caller = %caller, "Rejected callback from unknown caller");
            return Err(EngineError::Caller {
                caller,
                expected: pool,
            });
        }
        if initiator != self.identity {
            warn!(initiator = %initiator, "Rejected callback for foreign loan");
            return Err(EngineError::Initiator {
                initiator,
                expected: self.identity,
            });
        }

        let leg = LoanLeg::single(assets, amounts, premiums)?;
        let params = LiquidationParams::decode(payload)?;
        if leg.asset != params.debt_asset {
            return Err(EngineError::InvalidAddress {
                field: "loan asset",
            });
        }

        self.set_phase(Phase::CallbackReceived);
        info!(
            asset = %leg.asset,
            amount = %leg.amount,
            premium = %leg.premium,
            "Flash loan received"
        );

        self.unit.run(|| self.liquidate_with_loan(&params, leg))
    }

    fn liquidate_with_loan(&self, params: &LiquidationParams, leg: LoanLeg) -> Result<bool> {
        // The pool pulls the repaid debt during liquidationCall.
        self.ledger.approve(
            params.debt_asset,
            self.identity,
            self.pool.address(),
            leg.amount,
        )?;

        let received = self.execute(params, leg.amount)?;
        self.set_phase(Phase::CollateralSeized);

        if params.needs_conversion() && !received.is_zero() {
            if params.receive_a_token {
                warn!(
                    a_token_received = %received,
                    "Collateral kept as aTokens, skipping conversion"
                );
            } else {
                self.convert(params.collateral_asset, params.debt_asset, received)?;
                self.set_phase(Phase::Converted);
            }
        }

        self.settle(params, leg.amount, leg.premium, received)
    }
}

impl FlashLoanReceiver for FlashLiquidator {
    fn address(&self) -> Address {
        self.identity
    }

    fn execute_operation(
        &self,
        caller: Address,
        assets: &[Address],
        amounts: &[U256],
        premiums: &[U256],
        initiator: Address,
        params: &Bytes,
    ) -> Result<bool> {
        self.on_loan_received(caller, assets, amounts, premiums, initiator, params)
    }
}
