//! In-memory Aave-style lending pool.
//!
//! Positions live in the shared [`InMemoryLedger`] as aToken and debt-token
//! balances, so an execution-unit rollback restores them together with the
//! engine's own balances. Underlying liquidity is held at the pool address.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use flashliq_chain::{aave_v3, IL2Pool, IPool, PackedLiquidation};
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::ledger::InMemoryLedger;
use crate::collaborators::{
    DebtRegistry, FlashLoanReceiver, LendingPool, ReserveDebt, ReserveTokens, TokenLedger,
};
use crate::error::{EngineError, Result};
use crate::u256_math::{self, BPS_DENOMINATOR};

const POOL: &str = "pool";

/// Default Aave V3 flash-loan premium (0.09%).
pub const DEFAULT_FLASH_PREMIUM_BPS: u16 = 9;

/// Share of a borrower's debt repayable in one liquidation (50%).
pub const DEFAULT_CLOSE_FACTOR_BPS: u16 = 5000;

/// Static description of one reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveConfig {
    pub asset: Address,
    pub a_token: Address,
    pub stable_debt_token: Address,
    pub variable_debt_token: Address,
    /// Price in a common quote unit; all assets share decimals in the sim
    pub price: U256,
    pub liquidation_threshold_bps: u16,
    pub liquidation_bonus_bps: u16,
}

pub struct SimLendingPool {
    address: Address,
    ledger: Arc<InMemoryLedger>,
    /// Indexed by reserve id
    reserves: RwLock<Vec<ReserveConfig>>,
    flash_premium_bps: u16,
    close_factor_bps: u16,
    paused: AtomicBool,
    last_flash_loan: Mutex<Option<IPool::flashLoanCall>>,
}

impl SimLendingPool {
    pub fn new(address: Address, ledger: Arc<InMemoryLedger>) -> Self {
        Self {
            address,
            ledger,
            reserves: RwLock::new(Vec::new()),
            flash_premium_bps: DEFAULT_FLASH_PREMIUM_BPS,
            close_factor_bps: DEFAULT_CLOSE_FACTOR_BPS,
            paused: AtomicBool::new(false),
            last_flash_loan: Mutex::new(None),
        }
    }

    pub fn with_flash_premium(mut self, bps: u16) -> Self {
        self.flash_premium_bps = bps;
        self
    }

    pub fn with_close_factor(mut self, bps: u16) -> Self {
        self.close_factor_bps = bps;
        self
    }

    /// Register a reserve and return its compact id.
    pub fn add_reserve(&self, reserve: ReserveConfig) -> u16 {
        let mut reserves = self.reserves.write();
        reserves.push(reserve);
        // Reserve counts stay far below u16::MAX in the sim.
        u16::try_from(reserves.len() - 1).unwrap_or(u16::MAX)
    }

    pub fn set_price(&self, asset: Address, price: U256) -> Result<()> {
        let mut reserves = self.reserves.write();
        let reserve = reserves
            .iter_mut()
            .find(|r| r.asset == asset)
            .ok_or_else(|| EngineError::reverted(POOL, "unknown reserve"))?;
        reserve.price = price;
        Ok(())
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
    }

    /// Add underlying liquidity available for flash loans.
    pub fn fund(&self, asset: Address, amount: U256) -> Result<()> {
        self.ledger.mint(asset, self.address, amount)
    }

    /// Give `user` a deposit and a variable/stable borrow.
    pub fn open_position(
        &self,
        user: Address,
        collateral_asset: Address,
        collateral: U256,
        debt_asset: Address,
        variable_debt: U256,
        stable_debt: U256,
    ) -> Result<()> {
        let coll = self.reserve_by_asset(collateral_asset)?;
        let debt = self.reserve_by_asset(debt_asset)?;

        // Deposit: the underlying backs the minted aTokens.
        self.ledger.mint(coll.asset, self.address, collateral)?;
        self.ledger.mint(coll.a_token, user, collateral)?;

        self.ledger
            .mint(debt.variable_debt_token, user, variable_debt)?;
        self.ledger.mint(debt.stable_debt_token, user, stable_debt)?;
        let borrowed = variable_debt
            .checked_add(stable_debt)
            .ok_or_else(|| EngineError::reverted(POOL, "borrow overflow"))?;
        self.ledger.mint(debt.asset, user, borrowed)
    }

    /// The most recent flash-loan request, as received.
    pub fn last_flash_loan(&self) -> Option<IPool::flashLoanCall> {
        self.last_flash_loan.lock().clone()
    }

    pub fn flash_premium_bps(&self) -> u16 {
        self.flash_premium_bps
    }

    /// Health factor in WAD.
    pub fn health_factor(&self, user: Address) -> Result<U256> {
        let reserves = self.reserves.read().clone();
        let mut collateral = U256::ZERO;
        let mut debt = U256::ZERO;
        for reserve in &reserves {
            let supplied = self.ledger.balance(reserve.a_token, user);
            let value = supplied.checked_mul(reserve.price).ok_or_else(overflow)?;
            let adjusted =
                u256_math::bps_of(value, reserve.liquidation_threshold_bps).ok_or_else(overflow)?;
            collateral = collateral.checked_add(adjusted).ok_or_else(overflow)?;

            let owed = self
                .ledger
                .balance(reserve.variable_debt_token, user)
                .checked_add(self.ledger.balance(reserve.stable_debt_token, user))
                .ok_or_else(overflow)?;
            let value = owed.checked_mul(reserve.price).ok_or_else(overflow)?;
            debt = debt.checked_add(value).ok_or_else(overflow)?;
        }
        u256_math::calculate_hf_wad(collateral, debt).ok_or_else(overflow)
    }

    fn reserve_by_id(&self, id: u16) -> Result<ReserveConfig> {
        self.reserves
            .read()
            .get(usize::from(id))
            .copied()
            .ok_or_else(|| EngineError::reverted(POOL, format!("unknown reserve id {id}")))
    }

    fn reserve_by_asset(&self, asset: Address) -> Result<ReserveConfig> {
        self.reserves
            .read()
            .iter()
            .find(|r| r.asset == asset)
            .copied()
            .ok_or_else(|| EngineError::reverted(POOL, format!("unknown reserve {asset}")))
    }

    fn ensure_active(&self) -> Result<()> {
        if self.paused.load(Ordering::Acquire) {
            return Err(EngineError::reverted(POOL, "pool is paused"));
        }
        Ok(())
    }

    /// Collateral seized for `debt_repaid`, including the bonus.
    fn collateral_for(
        debt_repaid: U256,
        debt: &ReserveConfig,
        coll: &ReserveConfig,
    ) -> Result<U256> {
        let value = debt_repaid.checked_mul(debt.price).ok_or_else(overflow)?;
        let with_bonus = u256_math::apply_basis_points_up(value, coll.liquidation_bonus_bps)
            .ok_or_else(overflow)?;
        with_bonus
            .checked_div(coll.price)
            .ok_or_else(|| EngineError::reverted(POOL, "collateral price is zero"))
    }

    /// Debt repayable for `collateral`, the inverse of [`Self::collateral_for`].
    fn debt_for(collateral: U256, debt: &ReserveConfig, coll: &ReserveConfig) -> Result<U256> {
        let value = collateral
            .checked_mul(coll.price)
            .and_then(|v| v.checked_mul(BPS_DENOMINATOR))
            .ok_or_else(overflow)?;
        let denominator = debt
            .price
            .checked_mul(U256::from(10_000u32 + u32::from(coll.liquidation_bonus_bps)))
            .ok_or_else(overflow)?;
        value
            .checked_div(denominator)
            .ok_or_else(|| EngineError::reverted(POOL, "debt price is zero"))
    }

    fn burn_debt(&self, reserve: &ReserveConfig, user: Address, amount: U256) -> Result<()> {
        let variable = self.ledger.balance(reserve.variable_debt_token, user);
        let from_variable = variable.min(amount);
        self.ledger
            .burn(reserve.variable_debt_token, user, from_variable)?;
        self.ledger
            .burn(reserve.stable_debt_token, user, amount - from_variable)
    }
}

fn overflow() -> EngineError {
    EngineError::reverted(POOL, "math overflow")
}

impl LendingPool for SimLendingPool {
    fn address(&self) -> Address {
        self.address
    }

    fn flash_loan(
        &self,
        caller: Address,
        request: &IPool::flashLoanCall,
        receiver: &dyn FlashLoanReceiver,
    ) -> Result<()> {
        self.ensure_active()?;
        if receiver.address() != request.receiverAddress {
            return Err(EngineError::reverted(POOL, "receiver mismatch"));
        }
        let legs = request.assets.len();
        if legs == 0 || request.amounts.len() != legs || request.interestRateModes.len() != legs {
            return Err(EngineError::reverted(POOL, "inconsistent flashloan parameters"));
        }
        let borrows = |mode: &U256| *mode != aave_v3::INTEREST_RATE_MODE_NONE;
        if request.interestRateModes.iter().any(borrows) {
            return Err(EngineError::reverted(POOL, "only mode 0 flash loans are supported"));
        }

        *self.last_flash_loan.lock() = Some(request.clone());

        let mut premiums = Vec::with_capacity(legs);
        for (asset, amount) in request.assets.iter().zip(&request.amounts) {
            let premium =
                u256_math::bps_of(*amount, self.flash_premium_bps).ok_or_else(overflow)?;
            self.ledger
                .transfer(*asset, self.address, request.receiverAddress, *amount)?;
            premiums.push(premium);
        }

        debug!(receiver = %request.receiverAddress, legs, "Flash loan dispatched");
        let ok = receiver.execute_operation(
            self.address,
            &request.assets,
            &request.amounts,
            &premiums,
            caller,
            &request.params,
        )?;
        if !ok {
            return Err(EngineError::reverted(POOL, "invalid flash loan executor return"));
        }

        let legs = request.assets.iter().zip(&request.amounts).zip(&premiums);
        for ((asset, amount), premium) in legs {
            let owed = amount.checked_add(*premium).ok_or_else(overflow)?;
            self.ledger.transfer_from(
                *asset,
                self.address,
                request.receiverAddress,
                self.address,
                owed,
            )?;
        }
        Ok(())
    }

    fn liquidation_call(&self, caller: Address, call: &IL2Pool::liquidationCallCall) -> Result<()> {
        self.ensure_active()?;
        let packed = PackedLiquidation::from_call(call)?;
        let coll = self.reserve_by_id(packed.collateral_asset_id)?;
        let debt = self.reserve_by_id(packed.debt_asset_id)?;
        let user = packed.user;

        let hf = self.health_factor(user)?;
        if !u256_math::is_liquidatable_wad(hf) {
            return Err(EngineError::reverted(POOL, "health factor not below threshold"));
        }

        let user_debt = self.user_reserve_debt(debt.asset, user)?;
        let total_debt = user_debt
            .stable
            .checked_add(user_debt.variable)
            .ok_or_else(overflow)?;
        if total_debt.is_zero() {
            return Err(EngineError::reverted(POOL, "specified currency not borrowed by user"));
        }

        let max_repayable =
            u256_math::bps_of(total_debt, self.close_factor_bps).ok_or_else(overflow)?;
        let mut repaid = packed.debt_amount().min(max_repayable);
        let mut seized = Self::collateral_for(repaid, &debt, &coll)?;

        let available = self.ledger.balance(coll.a_token, user);
        if available.is_zero() {
            return Err(EngineError::reverted(POOL, "collateral cannot be liquidated"));
        }
        if seized > available {
            seized = available;
            repaid = Self::debt_for(seized, &debt, &coll)?;
        }

        self.ledger
            .transfer_from(debt.asset, self.address, caller, self.address, repaid)?;
        self.burn_debt(&debt, user, repaid)?;

        if packed.receive_a_token {
            self.ledger.transfer(coll.a_token, user, caller, seized)?;
        } else {
            self.ledger.burn(coll.a_token, user, seized)?;
            self.ledger
                .transfer(coll.asset, self.address, caller, seized)?;
        }

        debug!(
            user = %user,
            repaid = %repaid,
            seized = %seized,
            receive_a_token = packed.receive_a_token,
            "Position liquidated"
        );
        Ok(())
    }
}

/// The sim serves the data-provider views from the pool address.
impl DebtRegistry for SimLendingPool {
    fn address(&self) -> Address {
        self.address
    }

    fn user_reserve_debt(&self, asset: Address, user: Address) -> Result<ReserveDebt> {
        let reserve = self.reserve_by_asset(asset)?;
        Ok(ReserveDebt {
            stable: self.ledger.balance(reserve.stable_debt_token, user),
            variable: self.ledger.balance(reserve.variable_debt_token, user),
        })
    }

    fn reserve_tokens(&self, asset: Address) -> Result<ReserveTokens> {
        let reserve = self.reserve_by_asset(asset)?;
        Ok(ReserveTokens {
            a_token: reserve.a_token,
            stable_debt_token: reserve.stable_debt_token,
            variable_debt_token: reserve.variable_debt_token,
        })
    }
}
