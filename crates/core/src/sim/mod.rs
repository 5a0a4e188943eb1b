//! In-memory collaborators.
//!
//! A lending pool, a swap router and a token ledger that share one journaled
//! store, so a whole liquidation can be driven and rolled back without a
//! chain. Used by the engine tests and for dry runs against a deployment
//! config.

mod clock;
mod ledger;
mod pool;
mod router;

pub use clock::{ManualClock, RecordingSink};
pub use ledger::InMemoryLedger;
pub use pool::{ReserveConfig, SimLendingPool, DEFAULT_CLOSE_FACTOR_BPS, DEFAULT_FLASH_PREMIUM_BPS};
pub use router::{Rate, SimSwapRouter};
