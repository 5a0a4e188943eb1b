//! Compact argument packing for the L2Pool liquidation primitive.
//!
//! The liquidation is issued as `liquidationCall(bytes32 args1, bytes32 args2)`
//! instead of five ABI words. Layout (bit 255 is the most significant):
//!
//! ```text
//! Word A: [255:240] collateral reserve id
//!         [239:224] debt reserve id
//!         [159:0]   user address
//! Word B: [255:128] debt to cover
//!         [0]       receive aToken flag
//! ```
//!
//! Every other bit is zero. Reserve ids are the pool's compact asset indices,
//! not addresses.

use alloy::primitives::{Address, B256, U256};

use crate::contracts::IL2Pool;
use crate::error::CodecError;

// Byte ranges inside the big-endian 32-byte words.
const COLLATERAL_ID: std::ops::Range<usize> = 0..2;
const DEBT_ID: std::ops::Range<usize> = 2..4;
const WORD_A_RESERVED: std::ops::Range<usize> = 4..12;
const USER: std::ops::Range<usize> = 12..32;
const AMOUNT: std::ops::Range<usize> = 0..16;
const WORD_B_RESERVED: std::ops::Range<usize> = 16..31;
const FLAG_BYTE: usize = 31;

/// Numeric fields of a liquidation in their packed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedLiquidation {
    pub collateral_asset_id: u16,
    pub debt_asset_id: u16,
    pub user: Address,
    pub debt_to_cover: u128,
    pub receive_a_token: bool,
}

impl PackedLiquidation {
    /// Build packed arguments, rejecting amounts wider than 128 bits.
    ///
    /// The `U256::MAX` "cover everything" sentinel must be resolved to a
    /// concrete amount before packing.
    pub fn new(
        collateral_asset_id: u16,
        debt_asset_id: u16,
        user: Address,
        debt_to_cover: U256,
        receive_a_token: bool,
    ) -> Result<Self, CodecError> {
        let debt_to_cover =
            u128::try_from(debt_to_cover).map_err(|_| CodecError::AmountOverflow(debt_to_cover))?;

        Ok(Self {
            collateral_asset_id,
            debt_asset_id,
            user,
            debt_to_cover,
            receive_a_token,
        })
    }

    /// Encode Word A (reserve ids + user).
    pub fn word_a(&self) -> B256 {
        let mut word = [0u8; 32];
        word[COLLATERAL_ID].copy_from_slice(&self.collateral_asset_id.to_be_bytes());
        word[DEBT_ID].copy_from_slice(&self.debt_asset_id.to_be_bytes());
        word[USER].copy_from_slice(self.user.as_slice());
        B256::from(word)
    }

    /// Encode Word B (debt amount + aToken flag).
    pub fn word_b(&self) -> B256 {
        let mut word = [0u8; 32];
        word[AMOUNT].copy_from_slice(&self.debt_to_cover.to_be_bytes());
        word[FLAG_BYTE] = u8::from(self.receive_a_token);
        B256::from(word)
    }

    /// Encode both words.
    pub fn words(&self) -> (B256, B256) {
        (self.word_a(), self.word_b())
    }

    /// Decode a pair of packed words.
    ///
    /// Fails if any reserved bit is set, so `unpack(pack(x)) == x` and the
    /// mapping is one-to-one.
    pub fn unpack(word_a: B256, word_b: B256) -> Result<Self, CodecError> {
        if word_a[WORD_A_RESERVED].iter().any(|b| *b != 0) {
            return Err(CodecError::ReservedBits { word: "A" });
        }
        if word_b[WORD_B_RESERVED].iter().any(|b| *b != 0) || word_b[FLAG_BYTE] > 1 {
            return Err(CodecError::ReservedBits { word: "B" });
        }

        let mut amount = [0u8; 16];
        amount.copy_from_slice(&word_b[AMOUNT]);

        Ok(Self {
            collateral_asset_id: u16::from_be_bytes([word_a[0], word_a[1]]),
            debt_asset_id: u16::from_be_bytes([word_a[2], word_a[3]]),
            user: Address::from_slice(&word_a[USER]),
            debt_to_cover: u128::from_be_bytes(amount),
            receive_a_token: word_b[FLAG_BYTE] == 1,
        })
    }

    /// Debt amount widened back to `U256`.
    pub fn debt_amount(&self) -> U256 {
        U256::from(self.debt_to_cover)
    }

    /// Build the L2Pool call carrying these words.
    pub fn to_call(&self) -> IL2Pool::liquidationCallCall {
        let (args1, args2) = self.words();
        IL2Pool::liquidationCallCall { args1, args2 }
    }

    /// Decode the words carried by an L2Pool call.
    pub fn from_call(call: &IL2Pool::liquidationCallCall) -> Result<Self, CodecError> {
        Self::unpack(call.args1, call.args2)
    }
}
