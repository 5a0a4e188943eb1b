//! Common contract interfaces shared across protocols.
//!
//! ERC20 bindings and the pseudo-address used for the chain's native
//! currency.

use alloy::primitives::{address, Address};
use alloy::sol;

// ERC20 interface for token interactions
sol! {
    /// Standard ERC20 interface (subset for liquidation needs)
    #[derive(Debug, PartialEq, Eq)]
    interface IERC20 {
        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);

        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
    }
}

/// Conventional placeholder address for the native currency (ETH, HYPE, ...).
pub const NATIVE_ASSET: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolEvent;

    #[test]
    fn test_erc20_event_signatures() {
        assert_eq!(
            IERC20::Transfer::SIGNATURE,
            "Transfer(address,address,uint256)"
        );
        assert_eq!(
            IERC20::Approval::SIGNATURE,
            "Approval(address,address,uint256)"
        );
        assert!(!IERC20::Transfer::SIGNATURE_HASH.is_zero());
    }

    #[test]
    fn test_native_asset_is_not_zero() {
        assert!(!NATIVE_ASSET.is_zero());
        assert_eq!(NATIVE_ASSET, Address::repeat_byte(0xEE));
    }
}
