//! Owner-only tuning and emergency operations.
//!
//! Every operation takes the reentrancy latch, checks the owner and runs in
//! its own execution unit.

use alloy::primitives::{Address, U256};
use flashliq_chain::NATIVE_ASSET;
use tracing::{info, warn};

use super::{check_address, FlashLiquidator};
use crate::error::{EngineError, Result};
use crate::events::EngineEvent;

impl FlashLiquidator {
    fn protected<T>(&self, caller: Address, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _guard = self.latch.enter()?;
        self.owner.require(caller)?;
        self.unit.run(f)
    }

    /// Set the maximum swap slippage (0 to 2000 bps).
    pub fn set_max_slippage(&self, caller: Address, bps: u16) -> Result<()> {
        self.protected(caller, || {
            self.config.write().set_max_slippage(bps)?;
            info!(max_slippage_bps = bps, "Max slippage updated");
            Ok(())
        })
    }

    /// Set the swap deadline buffer (60 to 3600 seconds).
    pub fn set_swap_deadline_buffer(&self, caller: Address, secs: u64) -> Result<()> {
        self.protected(caller, || {
            self.config.write().set_swap_deadline_buffer(secs)?;
            info!(deadline_buffer_secs = secs, "Swap deadline buffer updated");
            Ok(())
        })
    }

    /// Set the swap fee tier from its raw value (100, 500, 3000 or 10000).
    pub fn set_default_swap_fee(&self, caller: Address, fee: u32) -> Result<()> {
        self.protected(caller, || {
            self.config.write().set_default_swap_fee(fee)?;
            info!(fee, "Default swap fee updated");
            Ok(())
        })
    }

    pub fn set_min_profit_threshold(&self, caller: Address, amount: U256) -> Result<()> {
        self.protected(caller, || {
            self.config.write().set_min_profit_threshold(amount);
            info!(min_profit = %amount, "Min profit threshold updated");
            Ok(())
        })
    }

    /// Send `amount` of `token` to `to`. `U256::MAX` withdraws the full
    /// balance.
    pub fn emergency_withdraw(
        &self,
        caller: Address,
        token: Address,
        amount: U256,
        to: Address,
    ) -> Result<U256> {
        self.protected(caller, || self.withdraw(token, amount, to))
    }

    /// Send the full native balance to `to`.
    pub fn emergency_withdraw_native(&self, caller: Address, to: Address) -> Result<U256> {
        self.protected(caller, || self.withdraw(NATIVE_ASSET, U256::MAX, to))
    }

    /// Reset the engine's allowance of `token` for `spender` to zero.
    pub fn revoke_allowance(
        &self,
        caller: Address,
        token: Address,
        spender: Address,
    ) -> Result<()> {
        self.protected(caller, || {
            check_address("token", token)?;
            check_address("spender", spender)?;
            self.ledger
                .approve(token, self.identity, spender, U256::ZERO)?;
            info!(token = %token, spender = %spender, "Allowance revoked");
            Ok(())
        })
    }

    pub fn transfer_ownership(&self, caller: Address, new_owner: Address) -> Result<()> {
        let _guard = self.latch.enter()?;
        let previous = self.owner.transfer(caller, new_owner)?;
        info!(previous = %previous, new_owner = %new_owner, "Ownership transferred");
        Ok(())
    }

    fn withdraw(&self, token: Address, amount: U256, to: Address) -> Result<U256> {
        check_address("to", to)?;
        let amount = if amount == U256::MAX {
            self.ledger.balance_of(token, self.identity)?
        } else {
            amount
        };
        if amount.is_zero() {
            return Err(EngineError::InvalidAmount("nothing to withdraw"));
        }

        self.ledger.transfer(token, self.identity, to, amount)?;
        let event = EngineEvent::FundsWithdrawn { token, to, amount };
        self.events.emit(event);
        warn!(token = %token, to = %to, amount = %amount, "Emergency withdrawal");
        Ok(amount)
    }
}
