//! Engine tuning parameters with profile support.
//!
//! Provides the slippage, deadline, fee-tier and profit settings the
//! liquidation chain reads, with named profiles (default, conservative,
//! aggressive) and the same range checks the admin setters apply.

use alloy::primitives::U256;
use flashliq_chain::FeeTier;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{EngineError, Result};

/// Upper bound for `max_slippage_bps` (20%).
pub const MAX_SLIPPAGE_BPS: u16 = 2000;

/// Allowed range for `swap_deadline_buffer_secs`.
pub const MIN_DEADLINE_BUFFER_SECS: u64 = 60;
pub const MAX_DEADLINE_BUFFER_SECS: u64 = 3600;

/// Runtime configuration of the liquidation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Profile name (for logging/identification)
    #[serde(default = "default_profile_name")]
    pub profile: String,

    /// Maximum accepted swap slippage in basis points
    #[serde(default = "default_max_slippage")]
    pub max_slippage_bps: u16,

    /// Seconds added to the current time to form the swap deadline
    #[serde(default = "default_deadline_buffer")]
    pub swap_deadline_buffer_secs: u64,

    /// Uniswap V3 pool fee used for collateral conversion
    #[serde(default)]
    pub default_swap_fee: FeeTier,

    /// Minimum profit in debt-asset units. Stored and reported only.
    #[serde(default)]
    pub min_profit_threshold: U256,
}

fn default_profile_name() -> String {
    "default".to_string()
}
fn default_max_slippage() -> u16 {
    300
}
fn default_deadline_buffer() -> u64 {
    300
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile: default_profile_name(),
            max_slippage_bps: default_max_slippage(),
            swap_deadline_buffer_secs: default_deadline_buffer(),
            default_swap_fee: FeeTier::default(),
            min_profit_threshold: U256::ZERO,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Tight slippage and a short deadline, for stable pairs.
    pub fn conservative() -> Self {
        Self {
            profile: "conservative".to_string(),
            max_slippage_bps: 100,
            swap_deadline_buffer_secs: 120,
            default_swap_fee: FeeTier::Low,
            min_profit_threshold: U256::ZERO,
        }
    }

    /// Wide slippage and a long deadline, for volatile collateral.
    pub fn aggressive() -> Self {
        Self {
            profile: "aggressive".to_string(),
            max_slippage_bps: 1000,
            swap_deadline_buffer_secs: 600,
            default_swap_fee: FeeTier::Medium,
            min_profit_threshold: U256::ZERO,
        }
    }

    /// Load a named profile.
    pub fn load_profile(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default()),
            "conservative" | "safe" => Some(Self::conservative()),
            "aggressive" | "aggro" => Some(Self::aggressive()),
            _ => None,
        }
    }

    /// Get profile from environment variable ENGINE_PROFILE, or default.
    /// Supported values: default, conservative, aggressive
    pub fn from_env() -> Self {
        let profile = std::env::var("ENGINE_PROFILE").unwrap_or_else(|_| "default".to_string());
        Self::load_profile(&profile).unwrap_or_default()
    }

    pub fn swap_deadline_buffer(&self) -> Duration {
        Duration::from_secs(self.swap_deadline_buffer_secs)
    }

    pub fn set_max_slippage(&mut self, bps: u16) -> Result<()> {
        check_slippage(bps)?;
        self.max_slippage_bps = bps;
        Ok(())
    }

    pub fn set_swap_deadline_buffer(&mut self, secs: u64) -> Result<()> {
        check_deadline_buffer(secs)?;
        self.swap_deadline_buffer_secs = secs;
        Ok(())
    }

    /// Set the fee tier from its raw value (100, 500, 3000 or 10000).
    pub fn set_default_swap_fee(&mut self, fee: u32) -> Result<()> {
        self.default_swap_fee = FeeTier::from_u32(fee)
            .ok_or_else(|| EngineError::InvalidConfig(format!("unsupported fee tier {fee}")))?;
        Ok(())
    }

    pub fn set_min_profit_threshold(&mut self, amount: U256) {
        self.min_profit_threshold = amount;
    }

    /// Check every field against the setter ranges.
    pub fn validate(&self) -> Result<()> {
        check_slippage(self.max_slippage_bps)?;
        check_deadline_buffer(self.swap_deadline_buffer_secs)
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        tracing::info!(
            profile = %self.profile,
            max_slippage_bps = self.max_slippage_bps,
            deadline_buffer_secs = self.swap_deadline_buffer_secs,
            swap_fee = %self.default_swap_fee,
            min_profit = %self.min_profit_threshold,
            "Engine configuration loaded"
        );
    }
}

fn check_slippage(bps: u16) -> Result<()> {
    if bps > MAX_SLIPPAGE_BPS {
        return Err(EngineError::InvalidConfig(format!(
            "max slippage {bps} bps above {MAX_SLIPPAGE_BPS}"
        )));
    }
    Ok(())
}

fn check_deadline_buffer(secs: u64) -> Result<()> {
    if !(MIN_DEADLINE_BUFFER_SECS..=MAX_DEADLINE_BUFFER_SECS).contains(&secs) {
        return Err(EngineError::InvalidConfig(format!(
            "deadline buffer {secs}s outside [{MIN_DEADLINE_BUFFER_SECS}, {MAX_DEADLINE_BUFFER_SECS}]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.max_slippage_bps, 300);
        assert_eq!(config.swap_deadline_buffer_secs, 300);
        assert_eq!(config.default_swap_fee, FeeTier::Medium);
        assert!(config.min_profit_threshold.is_zero());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profiles_are_valid() {
        for name in ["default", "conservative", "aggressive"] {
            let config = EngineConfig::load_profile(name).unwrap();
            assert!(config.validate().is_ok(), "{name}");
        }
        assert_eq!(
            EngineConfig::load_profile("safe").unwrap().profile,
            "conservative"
        );
        assert!(EngineConfig::load_profile("yolo").is_none());
    }

    #[test]
    fn test_setters_reject_out_of_range() {
        let mut config = EngineConfig::default();

        assert!(config.set_max_slippage(2000).is_ok());
        assert!(config.set_max_slippage(0).is_ok());
        assert!(matches!(
            config.set_max_slippage(2001),
            Err(EngineError::InvalidConfig(_))
        ));
        assert_eq!(config.max_slippage_bps, 0);

        assert!(config.set_swap_deadline_buffer(59).is_err());
        assert!(config.set_swap_deadline_buffer(3601).is_err());
        assert!(config.set_swap_deadline_buffer(60).is_ok());
        assert!(config.set_swap_deadline_buffer(3600).is_ok());
        assert_eq!(config.swap_deadline_buffer(), Duration::from_secs(3600));

        assert!(config.set_default_swap_fee(2500).is_err());
        assert!(config.set_default_swap_fee(10000).is_ok());
        assert_eq!(config.default_swap_fee, FeeTier::High);

        config.set_min_profit_threshold(U256::MAX);
        assert_eq!(config.min_profit_threshold, U256::MAX);
    }

    #[test]
    fn test_serialization() {
        let config = EngineConfig::conservative();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("profile = \"conservative\""));
        assert!(toml_str.contains("default_swap_fee = 500"));

        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: EngineConfig = toml::from_str("max_slippage_bps = 50").unwrap();
        assert_eq!(parsed.max_slippage_bps, 50);
        assert_eq!(parsed.swap_deadline_buffer_secs, 300);
        assert_eq!(parsed.default_swap_fee, FeeTier::Medium);

        assert!(toml::from_str::<EngineConfig>("default_swap_fee = 42").is_err());
    }
}
