//! Checked U256 arithmetic for liquidation accounting.
//!
//! Every helper returns `None` on overflow instead of wrapping; callers map
//! that to the error that fits their context.

use alloy::primitives::U256;

/// WAD constant: 1e18 for 18-decimal fixed-point arithmetic
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000u64, 0, 0, 0]);

/// Basis points denominator (10000 = 100%)
pub const BPS_DENOMINATOR: U256 = U256::from_limbs([10000u64, 0, 0, 0]);

/// Apply basis points reduction (e.g., for slippage).
/// Returns: floor(value * (10000 - basis_points) / 10000)
///
/// Example: apply_basis_points(1000, 100) = 990 (1% reduction)
#[inline(always)]
pub fn apply_basis_points(value: U256, basis_points: u16) -> Option<U256> {
    let factor = U256::from(10000u16.saturating_sub(basis_points));
    mul_div(value, factor, BPS_DENOMINATOR)
}

/// Apply basis points increase (e.g., for a liquidation bonus).
/// Returns: floor(value * (10000 + basis_points) / 10000)
#[inline(always)]
pub fn apply_basis_points_up(value: U256, basis_points: u16) -> Option<U256> {
    let factor = U256::from(10000u32 + u32::from(basis_points));
    mul_div(value, factor, BPS_DENOMINATOR)
}

/// Fraction of `value` in basis points: floor(value * bps / 10000).
#[inline(always)]
pub fn bps_of(value: U256, basis_points: u16) -> Option<U256> {
    mul_div(value, U256::from(basis_points), BPS_DENOMINATOR)
}

/// floor(a * b / denominator), `None` on overflow or zero denominator.
#[inline(always)]
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Option<U256> {
    a.checked_mul(b)?.checked_div(denominator)
}

/// Half of the sum, rounded down. `None` if the sum overflows.
#[inline(always)]
pub fn half_sum(a: U256, b: U256) -> Option<U256> {
    Some(a.checked_add(b)? >> 1)
}

/// Calculate health factor in WAD (18 decimals).
/// HF = (total_collateral_adjusted * 10^18) / total_debt
///
/// Returns U256::MAX if debt is zero.
#[inline(always)]
pub fn calculate_hf_wad(collateral_adjusted: U256, debt: U256) -> Option<U256> {
    if debt.is_zero() {
        return Some(U256::MAX);
    }
    mul_div(collateral_adjusted, WAD, debt)
}

/// Check if health factor indicates liquidatable position (HF < 1.0).
#[inline(always)]
pub fn is_liquidatable_wad(hf_wad: U256) -> bool {
    hf_wad < WAD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_basis_points() {
        // 1% reduction (100 bps)
        let value = U256::from(1000u64);
        assert_eq!(apply_basis_points(value, 100), Some(U256::from(990u64)));

        // 10% reduction (1000 bps)
        assert_eq!(apply_basis_points(value, 1000), Some(U256::from(900u64)));

        // 0% reduction
        assert_eq!(apply_basis_points(value, 0), Some(value));
    }

    #[test]
    fn test_min_output_for_five_percent() {
        let min_out = apply_basis_points(U256::from(1_000_000u64), 500);
        assert_eq!(min_out, Some(U256::from(950_000u64)));
    }

    #[test]
    fn test_apply_basis_points_rounds_down() {
        // 999 * 9700 / 10000 = 969.03
        assert_eq!(
            apply_basis_points(U256::from(999u64), 300),
            Some(U256::from(969u64))
        );
    }

    #[test]
    fn test_apply_basis_points_overflow() {
        assert_eq!(apply_basis_points(U256::MAX, 100), None);
        // A zero factor never overflows.
        assert_eq!(apply_basis_points(U256::MAX, 10000), Some(U256::ZERO));
    }

    #[test]
    fn test_apply_basis_points_up() {
        // 5% bonus
        assert_eq!(
            apply_basis_points_up(U256::from(1_000_000u64), 500),
            Some(U256::from(1_050_000u64))
        );
    }

    #[test]
    fn test_bps_of() {
        // Aave flash premium 0.09%
        assert_eq!(
            bps_of(U256::from(1_000_000u64), 9),
            Some(U256::from(900u64))
        );
        assert_eq!(bps_of(U256::from(10u64), 5000), Some(U256::from(5u64)));
    }

    #[test]
    fn test_half_sum() {
        assert_eq!(
            half_sum(U256::from(3u64), U256::from(4u64)),
            Some(U256::from(3u64))
        );
        assert_eq!(half_sum(U256::ZERO, U256::from(1u64)), Some(U256::ZERO));
        assert_eq!(half_sum(U256::MAX, U256::from(1u64)), None);
    }

    #[test]
    fn test_calculate_hf_wad() {
        // Collateral: 1000 adjusted, Debt: 500
        // HF = 1000 / 500 = 2.0
        let collateral = U256::from(1000u64) * WAD;
        let debt = U256::from(500u64) * WAD;

        let hf = calculate_hf_wad(collateral, debt);
        assert_eq!(hf, Some(U256::from(2u64) * WAD));
        assert_eq!(calculate_hf_wad(collateral, U256::ZERO), Some(U256::MAX));
    }

    #[test]
    fn test_is_liquidatable() {
        // HF = 0.9 (liquidatable)
        let hf_low = (WAD * U256::from(9u64)) / U256::from(10u64);
        assert!(is_liquidatable_wad(hf_low));

        // HF = 1.1 (not liquidatable)
        let hf_high = (WAD * U256::from(11u64)) / U256::from(10u64);
        assert!(!is_liquidatable_wad(hf_high));

        // HF = 1.0 (not liquidatable, boundary)
        assert!(!is_liquidatable_wad(WAD));
    }
}
