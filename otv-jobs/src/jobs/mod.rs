//! Job Catalog
//!
//! One module per periodic job. Every body follows the same failure
//! policy: a chain or store error for one candidate is logged and the
//! loop moves on; only errors that make the whole tick meaningless
//! propagate to the scheduler, which logs them and waits for the next
//! tick.

pub mod active_validator;
pub mod cancel;
pub mod clear_offline;
pub mod era_points;
pub mod era_stats;
pub mod execution;
pub mod ext_nominations;
pub mod inclusion;
pub mod monitor;
pub mod reward_claim;
pub mod score;
pub mod session_key;
pub mod stale;
pub mod unclaimed_eras;
pub mod validator_pref;
pub mod validity;
