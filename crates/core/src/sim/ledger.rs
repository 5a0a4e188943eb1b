//! In-memory ERC20 ledger with an undo journal.

use std::collections::HashMap;

use alloy::primitives::{Address, U256};
use parking_lot::Mutex;

use crate::collaborators::TokenLedger;
use crate::error::{EngineError, Result};
use crate::unit::Journaled;

type BalanceKey = (Address, Address);
type AllowanceKey = (Address, Address, Address);

#[derive(Debug)]
enum Undo {
    Balance { key: BalanceKey, previous: U256 },
    Allowance { key: AllowanceKey, previous: U256 },
}

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<BalanceKey, U256>,
    allowances: HashMap<AllowanceKey, U256>,
    journal: Vec<Undo>,
}

impl LedgerState {
    fn balance(&self, token: Address, account: Address) -> U256 {
        self.balances
            .get(&(token, account))
            .copied()
            .unwrap_or_default()
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn set_balance(&mut self, token: Address, account: Address, value: U256) {
        let key = (token, account);
        let previous = self.balances.insert(key, value).unwrap_or_default();
        self.journal.push(Undo::Balance { key, previous });
    }

    fn set_allowance(&mut self, token: Address, owner: Address, spender: Address, value: U256) {
        let key = (token, owner, spender);
        let previous = self.allowances.insert(key, value).unwrap_or_default();
        self.journal.push(Undo::Allowance { key, previous });
    }

    fn move_balance(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        let from_balance = self.balance(token, from);
        if from_balance < amount {
            return Err(EngineError::transfer(token, "transfer amount exceeds balance"));
        }
        if from == to {
            return Ok(());
        }
        let to_balance = self
            .balance(token, to)
            .checked_add(amount)
            .ok_or_else(|| EngineError::transfer(token, "balance overflow"))?;
        self.set_balance(token, from, from_balance - amount);
        self.set_balance(token, to, to_balance);
        Ok(())
    }
}

/// Every token's balances and allowances in one journaled store.
///
/// A `U256::MAX` allowance is treated as infinite and never decremented.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&self, token: Address, to: Address, amount: U256) -> Result<()> {
        let mut state = self.state.lock();
        let balance = state
            .balance(token, to)
            .checked_add(amount)
            .ok_or_else(|| EngineError::transfer(token, "mint overflow"))?;
        state.set_balance(token, to, balance);
        Ok(())
    }

    pub fn burn(&self, token: Address, from: Address, amount: U256) -> Result<()> {
        let mut state = self.state.lock();
        let balance = state.balance(token, from);
        if balance < amount {
            return Err(EngineError::transfer(token, "burn amount exceeds balance"));
        }
        state.set_balance(token, from, balance - amount);
        Ok(())
    }

    /// Balance without the `Result` wrapper, for assertions and views.
    pub fn balance(&self, token: Address, account: Address) -> U256 {
        self.state.lock().balance(token, account)
    }

    /// Number of undo entries not yet committed.
    pub fn journal_len(&self) -> usize {
        self.state.lock().journal.len()
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, token: Address, account: Address) -> Result<U256> {
        Ok(self.balance(token, account))
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        Ok(self.state.lock().allowance(token, owner, spender))
    }

    fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<()> {
        if spender.is_zero() {
            return Err(EngineError::transfer(token, "approve to the zero address"));
        }
        let mut state = self.state.lock();
        state.set_allowance(token, owner, spender, amount);
        Ok(())
    }

    fn transfer(&self, token: Address, from: Address, to: Address, amount: U256) -> Result<()> {
        if to.is_zero() {
            return Err(EngineError::transfer(token, "transfer to the zero address"));
        }
        self.state.lock().move_balance(token, from, to, amount)
    }

    fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        if to.is_zero() {
            return Err(EngineError::transfer(token, "transfer to the zero address"));
        }
        let mut state = self.state.lock();
        let allowance = state.allowance(token, from, spender);
        if allowance < amount {
            return Err(EngineError::transfer(token, "insufficient allowance"));
        }
        state.move_balance(token, from, to, amount)?;
        if allowance != U256::MAX {
            state.set_allowance(token, from, spender, allowance - amount);
        }
        Ok(())
    }
}

impl Journaled for InMemoryLedger {
    fn checkpoint(&self) -> usize {
        self.state.lock().journal.len()
    }

    fn revert_to(&self, checkpoint: usize) {
        let mut state = self.state.lock();
        while state.journal.len() > checkpoint {
            match state.journal.pop() {
                Some(Undo::Balance { key, previous }) => {
                    state.balances.insert(key, previous);
                }
                Some(Undo::Allowance { key, previous }) => {
                    state.allowances.insert(key, previous);
                }
                None => break,
            }
        }
    }

    fn commit(&self, checkpoint: usize) {
        self.state.lock().journal.truncate(checkpoint);
    }

    fn release(&self) {
        self.state.lock().journal.clear();
    }
}
