pub mod accrual_rule;
pub mod holiday;
pub mod leave;
pub mod persistence;
pub mod settings;

pub use accrual_rule::{AccrualFrequency, AccrualRule, AccrualRuleData};
pub use holiday::{Holiday, HolidayData};
pub use leave::{LeaveData, LeaveEntry};
pub use persistence::Persistable;
pub use settings::{LeaveSettings, OptimizerConfig, TrackingUnit};
