//! Backend Configuration
//!
//! Configuration for the job engine and the constraint evaluator.
//! Loaded from a JSON document by the (external) configuration
//! loader; environment overrides use the OTV_ prefix. Every cron
//! default can be overridden per job.

use serde::{Deserialize, Serialize};
use std::env;

use crate::constants;
use crate::error::{ConfigError, ConfigResult};

/// Network the backend runs against, derived from the SS58 prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Kusama,
    Polkadot,
    Testnet,
}

impl Network {
    /// Map an SS58 address prefix to a network (2 = Kusama, 0 = Polkadot)
    pub fn from_prefix(prefix: u16) -> Self {
        match prefix {
            2 => Self::Kusama,
            0 => Self::Polkadot,
            _ => Self::Testnet,
        }
    }

    pub fn prefix(&self) -> u16 {
        match self {
            Self::Kusama => 2,
            Self::Polkadot => 0,
            Self::Testnet => 42,
        }
    }

    /// Number of eras that make up four days on this network
    pub fn four_days_of_eras(&self) -> u32 {
        match self {
            // Kusama eras are six hours, Polkadot eras a full day
            Self::Kusama => 16,
            Self::Polkadot => 4,
            Self::Testnet => 4,
        }
    }

    /// Oldest unclaimed era age (in eras) before a candidate is flagged
    pub fn unclaimed_era_threshold(&self) -> u32 {
        self.four_days_of_eras()
    }

    /// Era age below which rewards are claimed on the fleet's behalf
    pub fn reward_claim_threshold(&self) -> u32 {
        self.four_days_of_eras()
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::Kusama
    }
}

/// Global options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// SS58 address prefix of the target chain
    #[serde(default = "default_network_prefix")]
    pub network_prefix: u16,
}

fn default_network_prefix() -> u16 {
    2
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            network_prefix: default_network_prefix(),
        }
    }
}

impl GlobalConfig {
    pub fn network(&self) -> Network {
        Network::from_prefix(self.network_prefix)
    }
}

/// Per-job cron overrides; a `None` falls back to the default table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CronConfig {
    pub monitor: Option<String>,
    pub clear_offline: Option<String>,
    pub validity: Option<String>,
    pub score: Option<String>,
    pub era_stats: Option<String>,
    pub execution: Option<String>,
    pub reward_claiming: Option<String>,
    pub cancel: Option<String>,
    pub stale: Option<String>,
    pub era_points: Option<String>,
    pub active_validator: Option<String>,
    pub inclusion: Option<String>,
    pub session_key: Option<String>,
    pub unclaimed_eras: Option<String>,
    pub validator_pref: Option<String>,
    pub ext_nominations: Option<String>,
}

impl CronConfig {
    /// Resolve an override against its default
    pub fn effective<'a>(override_expr: &'a Option<String>, default: &'a str) -> &'a str {
        override_expr.as_deref().unwrap_or(default)
    }

    pub fn monitor(&self) -> &str {
        Self::effective(&self.monitor, constants::MONITOR_CRON)
    }

    pub fn clear_offline(&self) -> &str {
        Self::effective(&self.clear_offline, constants::CLEAR_OFFLINE_CRON)
    }

    pub fn validity(&self) -> &str {
        Self::effective(&self.validity, constants::VALIDITY_CRON)
    }

    pub fn score(&self) -> &str {
        Self::effective(&self.score, constants::SCORE_CRON)
    }

    pub fn era_stats(&self) -> &str {
        Self::effective(&self.era_stats, constants::ERA_STATS_CRON)
    }

    pub fn execution(&self) -> &str {
        Self::effective(&self.execution, constants::EXECUTION_CRON)
    }

    pub fn reward_claiming(&self) -> &str {
        Self::effective(&self.reward_claiming, constants::REWARD_CLAIMING_CRON)
    }

    pub fn cancel(&self) -> &str {
        Self::effective(&self.cancel, constants::CANCEL_CRON)
    }

    pub fn stale(&self) -> &str {
        Self::effective(&self.stale, constants::STALE_CRON)
    }

    pub fn era_points(&self) -> &str {
        Self::effective(&self.era_points, constants::ERA_POINTS_CRON)
    }

    pub fn active_validator(&self) -> &str {
        Self::effective(&self.active_validator, constants::ACTIVE_VALIDATOR_CRON)
    }

    pub fn inclusion(&self) -> &str {
        Self::effective(&self.inclusion, constants::INCLUSION_CRON)
    }

    pub fn session_key(&self) -> &str {
        Self::effective(&self.session_key, constants::SESSION_KEY_CRON)
    }

    pub fn unclaimed_eras(&self) -> &str {
        Self::effective(&self.unclaimed_eras, constants::UNCLAIMED_ERAS_CRON)
    }

    pub fn validator_pref(&self) -> &str {
        Self::effective(&self.validator_pref, constants::VALIDATOR_PREF_CRON)
    }

    pub fn ext_nominations(&self) -> &str {
        Self::effective(&self.ext_nominations, constants::EXT_NOMINATIONS_CRON)
    }
}

/// Proxy execution options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Blocks between recording a delayed nomination and executing it
    #[serde(default = "default_time_delay_blocks")]
    pub time_delay_blocks: u64,
}

fn default_time_delay_blocks() -> u64 {
    constants::DEFAULT_TIME_DELAY_BLOCKS
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            time_delay_blocks: default_time_delay_blocks(),
        }
    }
}

/// Component weights for the scoring pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub inclusion: f64,
    pub span_inclusion: f64,
    pub discovered: f64,
    pub nominated: f64,
    pub rank: f64,
    pub unclaimed: f64,
    pub bonded: f64,
    pub faults: f64,
    pub offline: f64,
    pub ext_nominations: f64,
    /// Upper bound of the random tie-breaking multiplier band
    pub randomness: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            inclusion: 40.0,
            span_inclusion: 40.0,
            discovered: 5.0,
            nominated: 30.0,
            rank: 5.0,
            unclaimed: 10.0,
            bonded: 13.0,
            faults: 5.0,
            offline: 2.0,
            ext_nominations: 0.0,
            randomness: 0.15,
        }
    }
}

/// Validity thresholds and scoring weights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintsConfig {
    /// Maximum commission in percent
    pub commission_cap: f64,
    /// Minimum self bond in the smallest chain unit
    pub min_self_stake: u128,
    /// Minimum time since discovery, in milliseconds
    pub min_connection_time_ms: i64,
    /// Maximum accumulated offline time per week, in milliseconds
    pub max_accumulated_offline_ms: i64,
    /// Minimum rank on the sibling-chain program
    pub min_kusama_rank: i64,
    /// Skip the sibling-chain rank check entirely
    pub skip_kusama_rank: bool,
    /// Grace window after a release before old versions go invalid
    pub client_upgrade_grace_ms: i64,
    pub score: ScoreWeights,
}

impl Default for ConstraintsConfig {
    fn default() -> Self {
        Self {
            commission_cap: 10.0,
            min_self_stake: 10_000 * 1_000_000_000_000,
            min_connection_time_ms: constants::WEEK_MS,
            // 2% of a week of allowed downtime
            max_accumulated_offline_ms: constants::WEEK_MS / 50,
            min_kusama_rank: 25,
            skip_kusama_rank: false,
            client_upgrade_grace_ms: constants::CLIENT_UPGRADE_GRACE_MS,
            score: ScoreWeights::default(),
        }
    }
}

/// Top-level configuration of the backend core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub global: GlobalConfig,
    pub cron: CronConfig,
    pub proxy: ProxyConfig,
    pub constraints: ConstraintsConfig,
}

impl Config {
    /// Apply OTV_ environment overrides on top of defaults
    ///
    /// Environment variables:
    /// - OTV_NETWORK_PREFIX: SS58 prefix of the target chain
    /// - OTV_TIME_DELAY_BLOCKS: proxy execution delay in blocks
    /// - OTV_COMMISSION_CAP: maximum commission percent
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(prefix) = env::var("OTV_NETWORK_PREFIX")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.global.network_prefix = prefix;
        }
        if let Some(delay) = env::var("OTV_TIME_DELAY_BLOCKS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.proxy.time_delay_blocks = delay;
        }
        if let Some(cap) = env::var("OTV_COMMISSION_CAP")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.constraints.commission_cap = cap;
        }

        config
    }

    /// Validate value ranges that serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=100.0).contains(&self.constraints.commission_cap) {
            return Err(ConfigError::InvalidValue {
                field: "constraints.commission_cap".into(),
                reason: "must be a percentage between 0 and 100".into(),
            });
        }
        if self.constraints.score.randomness < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "constraints.score.randomness".into(),
                reason: "must be non-negative".into(),
            });
        }
        if self.proxy.time_delay_blocks == 0 {
            return Err(ConfigError::InvalidValue {
                field: "proxy.time_delay_blocks".into(),
                reason: "must be at least one block".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_from_prefix() {
        assert_eq!(Network::from_prefix(2), Network::Kusama);
        assert_eq!(Network::from_prefix(0), Network::Polkadot);
        assert_eq!(Network::from_prefix(42), Network::Testnet);
        assert_eq!(Network::from_prefix(7), Network::Testnet);
    }

    #[test]
    fn test_unclaimed_threshold_per_network() {
        assert_eq!(Network::Kusama.unclaimed_era_threshold(), 16);
        assert_eq!(Network::Polkadot.unclaimed_era_threshold(), 4);
    }

    #[test]
    fn test_cron_override_falls_back_to_default() {
        let cron = CronConfig::default();
        assert_eq!(cron.validity(), constants::VALIDITY_CRON);

        let cron = CronConfig {
            validity: Some("0 */2 * * * *".to_string()),
            ..Default::default()
        };
        assert_eq!(cron.validity(), "0 */2 * * * *");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_commission_cap() {
        let mut config = Config::default();
        config.constraints.commission_cap = 150.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_deserializes_partial_document() {
        let json = r#"{
            "global": { "network_prefix": 0 },
            "cron": { "validity": "0 */5 * * * *" }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.global.network(), Network::Polkadot);
        assert_eq!(config.cron.validity(), "0 */5 * * * *");
        assert_eq!(config.proxy.time_delay_blocks, 10_850);
    }
}
