use crate::calc::OptimizationPreferences;
use crate::data::persistence::Persistable;
use crate::error::{DataError, parse_date};
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrackingUnit {
    #[default]
    Days,
    Hours,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LeaveSettings {
    /// Balance on `pto_start_date`, in `unit`.
    pub initial_balance: f64,
    pub pto_start_date: Option<String>,
    pub unit: TrackingUnit,
    pub hours_per_day: f64,
    pub carry_over_limit: Option<f64>,
    /// Only the month and day matter; the reset repeats every year.
    pub renewal_date: Option<String>,
    pub max_balance: Option<f64>,
    /// 0 = Sunday .. 6 = Saturday
    pub weekend_days: Vec<u32>,
}

impl Default for LeaveSettings {
    fn default() -> Self {
        LeaveSettings {
            initial_balance: 0.0,
            pto_start_date: None,
            unit: TrackingUnit::Days,
            hours_per_day: 8.0,
            carry_over_limit: None,
            renewal_date: None,
            max_balance: None,
            weekend_days: vec![0, 6],
        }
    }
}

impl LeaveSettings {
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.pto_start_date
            .as_deref()
            .and_then(|s| parse_date("pto_start_date", s).ok())
    }

    pub fn renewal(&self) -> Option<NaiveDate> {
        self.renewal_date
            .as_deref()
            .and_then(|s| parse_date("renewal_date", s).ok())
    }

    /// Converts an amount in the tracking unit to days.
    pub fn to_days(&self, amount: f64) -> f64 {
        match self.unit {
            TrackingUnit::Days => amount,
            TrackingUnit::Hours if self.hours_per_day > 0.0 => amount / self.hours_per_day,
            TrackingUnit::Hours => 0.0,
        }
    }

    pub fn unit_label(&self) -> &'static str {
        match self.unit {
            TrackingUnit::Days => "days",
            TrackingUnit::Hours => "hours",
        }
    }

    /// Reports the first malformed field. Computations still run on invalid
    /// settings and simply ignore what they cannot parse.
    pub fn validate(&self) -> Result<(), DataError> {
        if let Some(raw) = &self.pto_start_date {
            parse_date("pto_start_date", raw)?;
        }
        if let Some(raw) = &self.renewal_date {
            parse_date("renewal_date", raw)?;
        }
        if let Some(&day) = self.weekend_days.iter().find(|d| **d > 6) {
            return Err(DataError::InvalidWeekday(day));
        }
        let bad_day_length = self.hours_per_day.is_nan() || self.hours_per_day <= 0.0;
        if self.unit == TrackingUnit::Hours && bad_day_length {
            return Err(DataError::invalid_value(
                "hours_per_day",
                "must be positive when tracking hours",
            ));
        }
        if let Some(limit) = self.carry_over_limit {
            if limit < 0.0 {
                return Err(DataError::invalid_value("carry_over_limit", "must not be negative"));
            }
        }
        Ok(())
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
/// `OptimizerConfig` reads the same file for its `optimizer` key; both work
/// independently because serde ignores unknown fields by default.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: LeaveSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl LeaveSettings {
    pub fn load() -> Result<Self> {
        Ok(SettingsWrapper::load()?.settings)
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct OptimizerConfig {
    #[serde(default)]
    pub optimizer: OptimizationPreferences,
}

impl Persistable for OptimizerConfig {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn is_json() -> bool {
        false
    }
}
