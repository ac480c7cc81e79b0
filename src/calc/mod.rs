pub mod accrual;
pub mod anchor;
pub mod balance;
pub mod candidates;
pub mod optimizer;
pub mod ranking;
pub mod timeline;

pub use balance::{BalanceProjection, balance_as_of, booked_from};
pub use optimizer::{OptimizationPreferences, OptimizationResult, OptimizerInput, optimize};
pub use ranking::RankingMode;
