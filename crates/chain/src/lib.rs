//! Flash-loan liquidator chain interface layer.
//!
//! This crate provides:
//! - ABI bindings for the Pool, L2Pool, PoolDataProvider, SwapRouter and ERC20
//! - The liquidator contract's own interface (entry points, admin, events)
//! - Compact `bytes32` packing for the L2Pool liquidation primitive
//! - The liquidation payload carried through the flash-loan callback
//! - A calldata builder for driving a deployed liquidator
//!
//! Nothing here talks to a node: every function is a pure encoder/decoder.

pub mod contracts;
mod error;
pub mod packing;
pub mod payload;

pub use contracts::{
    aave_v3, common, executor, uniswap_v3, FeeTier, IFlashLiquidator, IL2Pool, IPool,
    IPoolDataProvider, ISwapRouter, LiquidatorContract, IERC20, NATIVE_ASSET,
};
pub use error::CodecError;
pub use packing::PackedLiquidation;
pub use payload::{LiquidationParams, LiquidationPayload};
