//! Repository implementations for data access.
//!
//! Every mutating operation runs in one database transaction.

pub mod asset;
pub mod depreciation;
pub mod error;
pub mod movement;
pub mod period;
pub mod period_balance;
pub mod schedule;

pub use asset::{AssetRepository, CreateAssetInput};
pub use depreciation::{
    ClosePeriodResult, DEFAULT_CLOSE_CHUNK_SIZE, DepreciationRepository, RecalculateResult,
};
pub use error::LedgerRepoError;
pub use movement::{AssetMovementRecord, MovementRepository, PostMovementInput, PostMovementResult};
pub use period::{CreatePeriodInput, PeriodRepository};
pub use period_balance::{PeriodBalanceRepository, SeedResult};
pub use schedule::ScheduleRepository;
