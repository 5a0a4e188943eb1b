//! External parties the engine calls during a liquidation.
//!
//! Each trait mirrors one on-chain contract. Calls carry the identity of the
//! caller explicitly, since the collaborators authorize by `msg.sender`.
//! Implementations report rejections as
//! [`EngineError::Reverted`](crate::EngineError::Reverted) or
//! [`EngineError::ExternalTransfer`](crate::EngineError::ExternalTransfer).

use alloy::primitives::{Address, Bytes, U256};
use flashliq_chain::{IL2Pool, IPool, ISwapRouter};

use crate::error::Result;
use crate::events::EngineEvent;

/// Aave-style lending pool.
pub trait LendingPool: Send + Sync {
    fn address(&self) -> Address;

    /// `IPool.flashLoan`. Transfers the assets to the receiver, calls
    /// `receiver.execute_operation` with `caller` as the initiator, then pulls
    /// `amount + premium` back using the receiver's allowance.
    fn flash_loan(
        &self,
        caller: Address,
        request: &IPool::flashLoanCall,
        receiver: &dyn FlashLoanReceiver,
    ) -> Result<()>;

    /// `IL2Pool.liquidationCall(bytes32,bytes32)`.
    fn liquidation_call(&self, caller: Address, call: &IL2Pool::liquidationCallCall) -> Result<()>;
}

/// Borrower's debt on one reserve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReserveDebt {
    pub stable: U256,
    pub variable: U256,
}

/// Tokens a reserve is represented by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveTokens {
    pub a_token: Address,
    pub stable_debt_token: Address,
    pub variable_debt_token: Address,
}

/// Per-user reserve views (`IPoolDataProvider`).
pub trait DebtRegistry: Send + Sync {
    fn address(&self) -> Address;

    fn user_reserve_debt(&self, asset: Address, user: Address) -> Result<ReserveDebt>;

    fn reserve_tokens(&self, asset: Address) -> Result<ReserveTokens>;
}

/// Uniswap-v3 style router.
pub trait SwapRouter: Send + Sync {
    fn address(&self) -> Address;

    /// `ISwapRouter.exactInputSingle`. Pulls `amountIn` from `caller` and
    /// returns the realized output.
    fn exact_input_single(
        &self,
        caller: Address,
        params: &ISwapRouter::ExactInputSingleParams,
    ) -> Result<U256>;
}

/// ERC20 balances and allowances for every token.
pub trait TokenLedger: Send + Sync {
    fn balance_of(&self, token: Address, account: Address) -> Result<U256>;

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;

    fn approve(&self, token: Address, owner: Address, spender: Address, amount: U256) -> Result<()>;

    fn transfer(&self, token: Address, from: Address, to: Address, amount: U256) -> Result<()>;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming
    /// allowance.
    fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()>;
}

/// Unix time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
    }
}

/// Receives events once their unit commits.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &EngineEvent);
}

/// Flash-loan callback (`IFlashLoanReceiver.executeOperation`).
pub trait FlashLoanReceiver: Send + Sync {
    fn address(&self) -> Address;

    fn execute_operation(
        &self,
        caller: Address,
        assets: &[Address],
        amounts: &[U256],
        premiums: &[U256],
        initiator: Address,
        params: &Bytes,
    ) -> Result<bool>;
}
