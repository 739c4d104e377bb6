//! Persisted Data Model
//!
//! All records stored by the backend. Keys are stable identifiers:
//! candidate name, stash address, era number, (era, address),
//! (number, controller).

pub mod candidate;
pub mod era;
pub mod invalidity;
pub mod nomination;
pub mod score;
pub mod tx;

pub use candidate::{Candidate, ChainIdentity, FaultEvent, RankEvent, RewardDestination};
pub use era::{EraPointsRecord, EraStats, TotalEraPoints, ValidatorEraPoints};
pub use invalidity::{InvalidityEntry, InvaliditySet, InvalidityType};
pub use nomination::{Nomination, Nominator};
pub use score::{ComponentStats, ValidatorScore, ValidatorScoreMetadata};
pub use tx::{ChainMetadata, DelayedTx, Release};
