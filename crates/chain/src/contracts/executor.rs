//! Flash liquidator contract interface.
//!
//! The liquidator exposes one operator entry point, the Aave flash-loan
//! callback, a handful of owner-only tuning setters and emergency exits.
//!
//! ```text
//! executeLiquidation ─► IPool.flashLoan ─► executeOperation
//!                                            ├─ IL2Pool.liquidationCall
//!                                            ├─ ISwapRouter.exactInputSingle (if assets differ)
//!                                            └─ approve(pool, amount + premium)
//! ```

use alloy::sol;

sol! {
    /// Flash-loan liquidator
    #[derive(Debug, PartialEq, Eq)]
    interface IFlashLiquidator {
        event LiquidationExecuted(
            address indexed user,
            address indexed collateralAsset,
            address indexed debtAsset,
            uint256 debtCovered,
            uint256 collateralReceived,
            uint256 profit
        );
        event EmergencyWithdraw(address indexed token, address indexed to, uint256 amount);

        /// Operator entry point. `debtToCover == type(uint256).max` sizes the
        /// repayment at half of the borrower's debt.
        function executeLiquidation(
            address user,
            address collateralAsset,
            address debtAsset,
            uint256 debtToCover,
            bool receiveAToken,
            uint16 collateralAssetId,
            uint16 debtAssetId
        ) external;

        /// Aave flash-loan callback.
        function executeOperation(
            address[] calldata assets,
            uint256[] calldata amounts,
            uint256[] calldata premiums,
            address initiator,
            bytes calldata params
        ) external returns (bool);

        function setMaxSlippage(uint256 bps) external;
        function setSwapDeadlineBuffer(uint256 secs) external;
        function setDefaultSwapFee(uint24 fee) external;
        function setMinProfitThreshold(uint256 amount) external;

        function emergencyWithdraw(address token, uint256 amount, address to) external;
        function emergencyWithdrawNative(address to) external;
        function revokeAllowance(address token, address spender) external;
        function transferOwnership(address newOwner) external;

        function owner() external view returns (address);
        function maxSlippageBps() external view returns (uint256);
        function swapDeadlineBuffer() external view returns (uint256);
        function defaultSwapFee() external view returns (uint24);
        function minProfitThreshold() external view returns (uint256);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};
    use alloy::sol_types::{SolCall, SolEvent};

    #[test]
    fn test_event_signatures() {
        assert_eq!(
            IFlashLiquidator::LiquidationExecuted::SIGNATURE,
            "LiquidationExecuted(address,address,address,uint256,uint256,uint256)"
        );
        assert_eq!(
            IFlashLiquidator::EmergencyWithdraw::SIGNATURE,
            "EmergencyWithdraw(address,address,uint256)"
        );
    }

    #[test]
    fn test_callback_selector_matches_aave_receiver() {
        // IFlashLoanReceiver.executeOperation
        assert_eq!(
            IFlashLiquidator::executeOperationCall::SIGNATURE,
            "executeOperation(address[],uint256[],uint256[],address,bytes)"
        );
        assert_eq!(
            IFlashLiquidator::executeOperationCall::SELECTOR,
            [0x92, 0x0f, 0x5c, 0x84]
        );
    }

    #[test]
    fn test_execute_liquidation_is_static() {
        let call = IFlashLiquidator::executeLiquidationCall {
            user: Address::repeat_byte(1),
            collateralAsset: Address::repeat_byte(2),
            debtAsset: Address::repeat_byte(3),
            debtToCover: U256::MAX,
            receiveAToken: false,
            collateralAssetId: 0,
            debtAssetId: 1,
        };
        assert_eq!(call.abi_encode().len(), 4 + 7 * 32);
    }
}
