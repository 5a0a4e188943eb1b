use alloy::primitives::{Address, U256};
use flashliq_chain::CodecError;
use thiserror::Error;

/// Errors that abort a liquidation unit or an administrative call.
///
/// Any error leaves balances, allowances and published events exactly as they
/// were before the unit started.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum EngineError {
    /// Caller is not the owner
    #[error("unauthorized caller {caller}")]
    Authorization { caller: Address },

    /// A protected entry point was re-entered
    #[error("reentrant call")]
    Reentrancy,

    /// Loan callback did not come from the configured lending pool
    #[error("callback from {caller}, expected pool {expected}")]
    Caller { caller: Address, expected: Address },

    /// Loan was not initiated by this engine
    #[error("loan initiated by {initiator}, expected {expected}")]
    Initiator {
        initiator: Address,
        expected: Address,
    },

    #[error("invalid address for {field}")]
    InvalidAddress { field: &'static str },

    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    #[error("collateral and debt asset are both {asset}")]
    SameAsset { asset: Address },

    #[error("swap returned {received}, minimum {minimum}")]
    Slippage { received: U256, minimum: U256 },

    /// Balance after conversion does not cover principal plus premium
    #[error("balance {balance} below amount owed {owed}")]
    InsufficientFunds { balance: U256, owed: U256 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("swap deadline overflows: now {now} + buffer {buffer}")]
    InvalidDeadline { now: u64, buffer: u64 },

    /// Token transfer, approval or balance read failed
    #[error("token {token}: {reason}")]
    ExternalTransfer { token: Address, reason: String },

    /// A collaborator rejected the call
    #[error("{collaborator} reverted: {reason}")]
    Reverted {
        collaborator: &'static str,
        reason: String,
    },

    #[error("decode: {0}")]
    Decode(String),
}

impl EngineError {
    pub fn transfer(token: Address, reason: impl Into<String>) -> Self {
        Self::ExternalTransfer {
            token,
            reason: reason.into(),
        }
    }

    pub fn reverted(collaborator: &'static str, reason: impl Into<String>) -> Self {
        Self::Reverted {
            collaborator,
            reason: reason.into(),
        }
    }
}

impl From<CodecError> for EngineError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::AmountOverflow(_) => Self::InvalidAmount("debt to cover exceeds 128 bits"),
            other => Self::Decode(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_errors_map() {
        let overflow: EngineError = CodecError::AmountOverflow(U256::MAX).into();
        assert!(matches!(overflow, EngineError::InvalidAmount(_)));

        let reserved: EngineError = CodecError::ReservedBits { word: "A" }.into();
        assert!(matches!(reserved, EngineError::Decode(_)));
        assert!(reserved.to_string().contains("reserved"));
    }

    #[test]
    fn test_display() {
        let err = EngineError::InsufficientFunds {
            balance: U256::from(1u8),
            owed: U256::from(2u8),
        };
        assert_eq!(err.to_string(), "balance 1 below amount owed 2");
        assert_eq!(EngineError::Reentrancy.to_string(), "reentrant call");
    }
}
