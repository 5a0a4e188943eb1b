//! AAVE V3 contract interfaces.
//!
//! This module provides ABI bindings for the parts of AAVE V3 the
//! liquidator touches: flash loans on the Pool, the calldata-compact
//! liquidation entry point on the L2Pool, and the per-user reserve view of
//! the PoolDataProvider.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::packing::PackedLiquidation;

// AAVE V3 Pool interface
sol! {
    /// Aave V3 Pool interface (subset for flash loans)
    #[derive(Debug, PartialEq, Eq)]
    interface IPool {
        event FlashLoan(address indexed target, address initiator, address indexed asset, uint256 amount, uint8 interestRateMode, uint256 premium, uint16 indexed referralCode);
        event LiquidationCall(address indexed collateralAsset, address indexed debtAsset, address indexed user, uint256 debtToCover, uint256 liquidatedCollateralAmount, address liquidator, bool receiveAToken);

        /// Multi-asset flash loan; the receiver is called back with
        /// `executeOperation` and must approve `amount + premium` per asset.
        function flashLoan(
            address receiverAddress,
            address[] calldata assets,
            uint256[] calldata amounts,
            uint256[] calldata interestRateModes,
            address onBehalfOf,
            bytes calldata params,
            uint16 referralCode
        ) external;

        function FLASHLOAN_PREMIUM_TOTAL() external view returns (uint128);
    }
}

// L2Pool calldata-optimized entry points
sol! {
    /// Aave V3 L2Pool liquidation taking two packed words
    #[derive(Debug, PartialEq, Eq)]
    interface IL2Pool {
        function liquidationCall(bytes32 args1, bytes32 args2) external;
    }
}

// Protocol data provider (debt registry)
sol! {
    /// Aave V3 PoolDataProvider views
    #[derive(Debug, PartialEq, Eq)]
    interface IPoolDataProvider {
        function getUserReserveData(address asset, address user) external view returns (
            uint256 currentATokenBalance,
            uint256 currentStableDebt,
            uint256 currentVariableDebt,
            uint256 principalStableDebt,
            uint256 scaledVariableDebt,
            uint256 stableBorrowRate,
            uint256 liquidityRate,
            uint40 stableRateLastUpdated,
            bool usageAsCollateralEnabled
        );

        function getReserveTokensAddresses(address asset) external view returns (
            address aTokenAddress,
            address stableDebtTokenAddress,
            address variableDebtTokenAddress
        );
    }
}

/// Interest rate mode for a pure flash loan (no debt position opened).
pub const INTEREST_RATE_MODE_NONE: U256 = U256::ZERO;

/// Referral code sent with every flash loan.
pub const REFERRAL_CODE: u16 = 0;

/// Build a single-asset flash loan request.
///
/// `receiver` is used both as the callback target and as `onBehalfOf`.
/// The mode is always [`INTEREST_RATE_MODE_NONE`], so the loan must be
/// repaid inside the callback.
pub fn flash_loan_call(
    receiver: Address,
    asset: Address,
    amount: U256,
    params: Bytes,
) -> IPool::flashLoanCall {
    IPool::flashLoanCall {
        receiverAddress: receiver,
        assets: vec![asset],
        amounts: vec![amount],
        interestRateModes: vec![INTEREST_RATE_MODE_NONE],
        onBehalfOf: receiver,
        params,
        referralCode: REFERRAL_CODE,
    }
}

/// Encode flash loan calldata.
pub fn encode_flash_loan(call: &IPool::flashLoanCall) -> Bytes {
    Bytes::from(call.abi_encode())
}

/// Encode packed L2Pool liquidation calldata.
pub fn encode_packed_liquidation(packed: &PackedLiquidation) -> Bytes {
    Bytes::from(packed.to_call().abi_encode())
}

/// Encode a `getUserReserveData` view call.
pub fn encode_user_reserve_data(asset: Address, user: Address) -> Bytes {
    let call = IPoolDataProvider::getUserReserveDataCall { asset, user };
    Bytes::from(call.abi_encode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_loan_call_single_leg() {
        let receiver = Address::repeat_byte(0xAA);
        let asset = Address::repeat_byte(0xDE);
        let call = flash_loan_call(
            receiver,
            asset,
            U256::from(1000u64),
            Bytes::from(vec![1, 2, 3]),
        );

        assert_eq!(call.assets, vec![asset]);
        assert_eq!(call.amounts, vec![U256::from(1000u64)]);
        assert_eq!(call.interestRateModes, vec![U256::ZERO]);
        assert_eq!(call.receiverAddress, receiver);
        assert_eq!(call.onBehalfOf, receiver);
        assert_eq!(call.referralCode, 0);
    }

    #[test]
    fn test_encode_flash_loan_selector() {
        let call = flash_loan_call(Address::ZERO, Address::ZERO, U256::from(1u8), Bytes::new());
        let calldata = encode_flash_loan(&call);
        assert_eq!(&calldata[..4], &IPool::flashLoanCall::SELECTOR);
        assert_eq!(IPool::flashLoanCall::SELECTOR, [0xab, 0x9c, 0x4b, 0x5d]);

        let decoded = IPool::flashLoanCall::abi_decode(&calldata, true).unwrap();
        assert_eq!(decoded, call);
    }

    #[test]
    fn test_encode_packed_liquidation_is_two_words() {
        let packed =
            PackedLiquidation::new(1, 2, Address::repeat_byte(1), U256::from(10u8), true).unwrap();
        let calldata = encode_packed_liquidation(&packed);

        // selector + two bytes32
        assert_eq!(calldata.len(), 4 + 64);
        assert_eq!(
            IL2Pool::liquidationCallCall::SELECTOR,
            [0xfd, 0x21, 0xec, 0xff]
        );
        assert_eq!(&calldata[4..36], packed.word_a().as_slice());
        assert_eq!(&calldata[36..68], packed.word_b().as_slice());
    }

    #[test]
    fn test_encode_user_reserve_data() {
        let calldata = encode_user_reserve_data(Address::repeat_byte(2), Address::repeat_byte(3));
        assert_eq!(calldata.len(), 4 + 64);
    }
}
