//! Program Constants
//!
//! Centralized constants for the validator program backend. Default
//! cron schedules, era windows and threshold values live here; each
//! cron default can be overridden per job through [`crate::config::CronConfig`].

// ============================================================================
// Default cron schedules (seconds-bearing 6-field form)
// ============================================================================

/// Release monitor - every 15 minutes
pub const MONITOR_CRON: &str = "0 */15 * * * *";

/// Weekly reset of accumulated offline time - Sunday midnight
pub const CLEAR_OFFLINE_CRON: &str = "0 0 0 * * SUN";

/// Validity evaluation - every 10 minutes
pub const VALIDITY_CRON: &str = "0 0-59/10 * * * *";

/// Score computation - every 10 minutes, offset from validity
pub const SCORE_CRON: &str = "0 5-59/10 * * * *";

/// Era statistics - hourly
pub const ERA_STATS_CRON: &str = "0 0 * * * *";

/// Delayed transaction execution - every 15 minutes
pub const EXECUTION_CRON: &str = "0 0-59/15 * * * *";

/// Reward claiming - every 45 minutes
pub const REWARD_CLAIMING_CRON: &str = "0 0-59/45 * * * *";

/// Stale announcement cancellation - every 25 minutes
pub const CANCEL_CRON: &str = "0 0-59/25 * * * *";

/// Stale nomination check - every 30 minutes
pub const STALE_CRON: &str = "0 0-59/30 * * * *";

/// Era points backfill - every 15 minutes
pub const ERA_POINTS_CRON: &str = "0 0-59/15 * * * *";

/// Active validator set refresh - every 15 minutes
pub const ACTIVE_VALIDATOR_CRON: &str = "0 0-59/15 * * * *";

/// Inclusion rate computation - every 20 minutes
pub const INCLUSION_CRON: &str = "0 0-59/20 * * * *";

/// Session key refresh - every 15 minutes
pub const SESSION_KEY_CRON: &str = "0 0-59/15 * * * *";

/// Unclaimed era scan - every 45 minutes
pub const UNCLAIMED_ERAS_CRON: &str = "0 0-59/45 * * * *";

/// Validator preference refresh - every 5 minutes
pub const VALIDATOR_PREF_CRON: &str = "0 0-59/5 * * * *";

/// External nominations scan - every 30 minutes
pub const EXT_NOMINATIONS_CRON: &str = "0 0-59/30 * * * *";

// ============================================================================
// Era windows
// ============================================================================

/// Number of past eras the inclusion rate is computed over
pub const INCLUSION_ERA_WINDOW: u32 = 84;

/// Number of past eras the span inclusion rate is computed over
pub const SPAN_INCLUSION_ERA_WINDOW: u32 = 28;

/// Total era points above which an era row is considered filled
pub const ERA_FILL_THRESHOLD: u64 = 70_000;

// ============================================================================
// Time values
// ============================================================================

/// One week in milliseconds
pub const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Grace window after a release during which an old client version
/// is still considered up to date (16 hours)
pub const CLIENT_UPGRADE_GRACE_MS: i64 = 16 * 60 * 60 * 1000;

/// Default number of blocks between recording a delayed nomination
/// and executing it (roughly 18 hours)
pub const DEFAULT_TIME_DELAY_BLOCKS: u64 = 10_850;

// ============================================================================
// Chain scaling
// ============================================================================

/// Divisor turning raw parts-per-billion commission into percent
pub const COMMISSION_SCALE: f64 = 10_000_000.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_era_windows_ordering() {
        assert!(SPAN_INCLUSION_ERA_WINDOW < INCLUSION_ERA_WINDOW);
    }

    #[test]
    fn test_commission_scale() {
        // 50_000_000 raw parts-per-billion is a 5% commission
        assert_eq!(50_000_000.0 / COMMISSION_SCALE, 5.0);
    }

    #[test]
    fn test_cron_defaults_nonempty() {
        for cron in [
            MONITOR_CRON,
            CLEAR_OFFLINE_CRON,
            VALIDITY_CRON,
            SCORE_CRON,
            ERA_STATS_CRON,
            EXECUTION_CRON,
            REWARD_CLAIMING_CRON,
            CANCEL_CRON,
            STALE_CRON,
            ERA_POINTS_CRON,
            ACTIVE_VALIDATOR_CRON,
            INCLUSION_CRON,
            SESSION_KEY_CRON,
            UNCLAIMED_ERAS_CRON,
            VALIDATOR_PREF_CRON,
            EXT_NOMINATIONS_CRON,
        ] {
            assert_eq!(cron.split_whitespace().count(), 6);
        }
    }
}
