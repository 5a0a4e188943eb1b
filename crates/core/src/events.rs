//! Engine events and the buffered log that publishes them on commit.

use std::sync::Arc;

use alloy::primitives::{Address, LogData, U256};
use alloy::sol_types::SolEvent;
use flashliq_chain::IFlashLiquidator;
use parking_lot::Mutex;

use crate::collaborators::EventSink;
use crate::unit::Journaled;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A liquidation unit settled.
    LiquidationCompleted {
        user: Address,
        collateral_asset: Address,
        debt_asset: Address,
        debt_covered: U256,
        collateral_received: U256,
        profit: U256,
    },
    /// Owner pulled funds out of the engine.
    FundsWithdrawn {
        token: Address,
        to: Address,
        amount: U256,
    },
}

impl EngineEvent {
    /// ABI log form, as the deployed liquidator would emit it.
    pub fn to_log_data(&self) -> LogData {
        match *self {
            Self::LiquidationCompleted {
                user,
                collateral_asset,
                debt_asset,
                debt_covered,
                collateral_received,
                profit,
            } => IFlashLiquidator::LiquidationExecuted {
                user,
                collateralAsset: collateral_asset,
                debtAsset: debt_asset,
                debtCovered: debt_covered,
                collateralReceived: collateral_received,
                profit,
            }
            .encode_log_data(),
            Self::FundsWithdrawn { token, to, amount } => {
                IFlashLiquidator::EmergencyWithdraw { token, to, amount }.encode_log_data()
            }
        }
    }
}

/// Events raised inside an execution unit. Nothing reaches the sink until the
/// outermost unit commits.
pub struct EventLog {
    pending: Mutex<Vec<EngineEvent>>,
    sink: Arc<dyn EventSink>,
}

impl EventLog {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
            sink,
        }
    }

    pub fn emit(&self, event: EngineEvent) {
        self.pending.lock().push(event);
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }
}

impl Journaled for EventLog {
    fn checkpoint(&self) -> usize {
        self.pending.lock().len()
    }

    fn revert_to(&self, checkpoint: usize) {
        self.pending.lock().truncate(checkpoint);
    }

    fn commit(&self, checkpoint: usize) {
        let ready: Vec<EngineEvent> = {
            let mut pending = self.pending.lock();
            let start = checkpoint.min(pending.len());
            pending.drain(start..).collect()
        };
        for event in &ready {
            self.sink.publish(event);
        }
    }
}

/// Sink that writes every event as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: &EngineEvent) {
        match event {
            EngineEvent::LiquidationCompleted {
                user,
                collateral_asset,
                debt_asset,
                debt_covered,
                collateral_received,
                profit,
            } => tracing::info!(
                user = %user,
                collateral = %collateral_asset,
                debt = %debt_asset,
                debt_covered = %debt_covered,
                collateral_received = %collateral_received,
                profit = %profit,
                "[EVENT] LiquidationExecuted"
            ),
            EngineEvent::FundsWithdrawn { token, to, amount } => tracing::info!(
                token = %token,
                to = %to,
                amount = %amount,
                "[EVENT] EmergencyWithdraw"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RecordingSink;

    fn completed() -> EngineEvent {
        EngineEvent::LiquidationCompleted {
            user: Address::repeat_byte(1),
            collateral_asset: Address::repeat_byte(2),
            debt_asset: Address::repeat_byte(3),
            debt_covered: U256::from(1_000_000u64),
            collateral_received: U256::from(1_050_000u64),
            profit: U256::from(1_600u64),
        }
    }

    #[test]
    fn test_log_data_topics() {
        let log = completed().to_log_data();
        let topics = log.topics();
        // signature + three indexed addresses
        assert_eq!(topics.len(), 4);
        assert_eq!(
            topics[0],
            IFlashLiquidator::LiquidationExecuted::SIGNATURE_HASH
        );
        assert_eq!(&topics[1][12..], Address::repeat_byte(1).as_slice());
        // three non-indexed uint256
        assert_eq!(log.data.len(), 3 * 32);
    }

    #[test]
    fn test_publish_only_on_commit() {
        let sink = Arc::new(RecordingSink::default());
        let log = EventLog::new(sink.clone());

        let cp = log.checkpoint();
        log.emit(completed());
        assert!(sink.events().is_empty());

        log.revert_to(cp);
        assert_eq!(log.pending(), 0);

        let cp = log.checkpoint();
        log.emit(completed());
        log.commit(cp);
        assert_eq!(sink.events(), vec![completed()]);
        assert_eq!(log.pending(), 0);
    }
}
