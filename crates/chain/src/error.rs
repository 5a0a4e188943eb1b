use alloy::primitives::U256;

/// Errors produced while encoding or decoding liquidator call data.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Debt amount does not fit in the 128-bit field of the packed word.
    #[error("debt amount {0} does not fit in 128 bits")]
    AmountOverflow(U256),

    /// A packed word carries non-zero bits outside its defined fields.
    #[error("packed word {word} has non-zero reserved bits")]
    ReservedBits { word: &'static str },

    /// ABI decoding failed.
    #[error("abi decode: {0}")]
    Abi(#[from] alloy::sol_types::Error),
}
