//! Access control for engine entry points.

use std::sync::atomic::{AtomicBool, Ordering};

use alloy::primitives::Address;
use parking_lot::RwLock;

use crate::error::{EngineError, Result};

/// Non-reentrancy latch shared by every protected entry point.
#[derive(Debug, Default)]
pub struct ReentrancyLatch {
    entered: AtomicBool,
}

impl ReentrancyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the latch, failing with [`EngineError::Reentrancy`] if it is held.
    ///
    /// The returned guard releases the latch when dropped, including on
    /// early returns and unwinding.
    pub fn enter(&self) -> Result<LatchGuard<'_>> {
        self.entered
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| EngineError::Reentrancy)?;
        Ok(LatchGuard { latch: self })
    }

    pub fn is_entered(&self) -> bool {
        self.entered.load(Ordering::Acquire)
    }
}

#[must_use = "the latch is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LatchGuard<'a> {
    latch: &'a ReentrancyLatch,
}

impl Drop for LatchGuard<'_> {
    fn drop(&mut self) {
        self.latch.entered.store(false, Ordering::Release);
    }
}

/// Single-principal authorization.
#[derive(Debug)]
pub struct OwnerGate {
    owner: RwLock<Address>,
}

impl OwnerGate {
    pub fn new(owner: Address) -> Self {
        Self {
            owner: RwLock::new(owner),
        }
    }

    pub fn owner(&self) -> Address {
        *self.owner.read()
    }

    pub fn require(&self, caller: Address) -> Result<()> {
        if caller != self.owner() {
            return Err(EngineError::Authorization { caller });
        }
        Ok(())
    }

    /// Replace the owner. Returns the previous owner.
    pub fn transfer(&self, caller: Address, new_owner: Address) -> Result<Address> {
        self.require(caller)?;
        if new_owner.is_zero() {
            return Err(EngineError::InvalidAddress { field: "new_owner" });
        }
        Ok(std::mem::replace(&mut *self.owner.write(), new_owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_rejects_nested_entry() {
        let latch = ReentrancyLatch::new();
        let guard = latch.enter().unwrap();
        assert!(latch.is_entered());
        assert_eq!(latch.enter().unwrap_err(), EngineError::Reentrancy);

        drop(guard);
        assert!(!latch.is_entered());
        assert!(latch.enter().is_ok());
    }

    #[test]
    fn test_latch_released_on_error_path() {
        let latch = ReentrancyLatch::new();
        let failing = || -> Result<()> {
            let _guard = latch.enter()?;
            Err(EngineError::InvalidAmount("boom"))
        };
        assert!(failing().is_err());
        assert!(!latch.is_entered());
    }

    #[test]
    fn test_latch_released_on_panic() {
        let latch = ReentrancyLatch::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = latch.enter().unwrap();
            panic!("collaborator blew up");
        }));
        assert!(result.is_err());
        assert!(!latch.is_entered());
    }

    #[test]
    fn test_owner_gate() {
        let owner = Address::repeat_byte(1);
        let other = Address::repeat_byte(2);
        let gate = OwnerGate::new(owner);

        assert!(gate.require(owner).is_ok());
        assert_eq!(
            gate.require(other).unwrap_err(),
            EngineError::Authorization { caller: other }
        );

        assert!(gate.transfer(other, other).is_err());
        assert!(matches!(
            gate.transfer(owner, Address::ZERO),
            Err(EngineError::InvalidAddress { .. })
        ));
        assert_eq!(gate.transfer(owner, other).unwrap(), owner);
        assert_eq!(gate.owner(), other);
        assert!(gate.require(owner).is_err());
    }
}
