//! Fixed-rate single-hop swap router.

use std::collections::HashMap;
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use flashliq_chain::{FeeTier, ISwapRouter};
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::ledger::InMemoryLedger;
use crate::collaborators::{Clock, SwapRouter, TokenLedger};
use crate::error::{EngineError, Result};
use crate::u256_math::mul_div;

const ROUTER: &str = "router";

/// Exchange rate `amount_out = amount_in * numerator / denominator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    pub numerator: U256,
    pub denominator: U256,
}

impl Rate {
    pub fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator: U256::from(numerator),
            denominator: U256::from(denominator),
        }
    }
}

/// Pays out of its own balance at the ledger, at per-pair fixed rates.
pub struct SimSwapRouter {
    address: Address,
    ledger: Arc<InMemoryLedger>,
    clock: Arc<dyn Clock>,
    rates: RwLock<HashMap<(Address, Address), Rate>>,
    last_swap: Mutex<Option<ISwapRouter::ExactInputSingleParams>>,
}

impl SimSwapRouter {
    pub fn new(address: Address, ledger: Arc<InMemoryLedger>, clock: Arc<dyn Clock>) -> Self {
        Self {
            address,
            ledger,
            clock,
            rates: RwLock::new(HashMap::new()),
            last_swap: Mutex::new(None),
        }
    }

    pub fn set_rate(&self, token_in: Address, token_out: Address, rate: Rate) {
        self.rates.write().insert((token_in, token_out), rate);
    }

    /// Seed output liquidity.
    pub fn fund(&self, token: Address, amount: U256) -> Result<()> {
        self.ledger.mint(token, self.address, amount)
    }

    pub fn last_swap(&self) -> Option<ISwapRouter::ExactInputSingleParams> {
        self.last_swap.lock().clone()
    }

    pub fn quote(&self, token_in: Address, token_out: Address, amount_in: U256) -> Result<U256> {
        let rate = self
            .rates
            .read()
            .get(&(token_in, token_out))
            .copied()
            .ok_or_else(|| EngineError::reverted(ROUTER, "no pool for pair"))?;
        mul_div(amount_in, rate.numerator, rate.denominator)
            .ok_or_else(|| EngineError::reverted(ROUTER, "quote overflow"))
    }
}

impl SwapRouter for SimSwapRouter {
    fn address(&self) -> Address {
        self.address
    }

    fn exact_input_single(
        &self,
        caller: Address,
        params: &ISwapRouter::ExactInputSingleParams,
    ) -> Result<U256> {
        if params.deadline < U256::from(self.clock.now()) {
            return Err(EngineError::reverted(ROUTER, "Transaction too old"));
        }
        FeeTier::try_from(params.fee.to::<u32>()).map_err(|e| EngineError::reverted(ROUTER, e))?;

        let amount_out = self.quote(params.tokenIn, params.tokenOut, params.amountIn)?;
        if amount_out < params.amountOutMinimum {
            return Err(EngineError::reverted(ROUTER, "Too little received"));
        }

        self.ledger.transfer_from(
            params.tokenIn,
            self.address,
            caller,
            self.address,
            params.amountIn,
        )?;
        self.ledger
            .transfer(params.tokenOut, self.address, params.recipient, amount_out)?;
        *self.last_swap.lock() = Some(params.clone());

        debug!(amount_in = %params.amountIn, amount_out = %amount_out, "Swap filled");
        Ok(amount_out)
    }
}
