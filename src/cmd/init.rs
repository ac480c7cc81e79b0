use crate::calc::OptimizationPreferences;
use crate::data::{
    AccrualFrequency, AccrualRule, AccrualRuleData, Holiday, HolidayData, LeaveData, LeaveEntry,
    LeaveSettings, Persistable,
};
use anyhow::Result;
use log::info;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Combined struct for serializing config.yaml in one pass.
/// `LeaveSettings` and `OptimizerConfig` both read config.yaml independently,
/// but writing them separately would overwrite each other, so they are combined here.
#[derive(Serialize)]
struct ConfigFile {
    settings: LeaveSettings,
    optimizer: OptimizationPreferences,
}

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    fs::create_dir_all(&dir)?;
    run_in_dir(&dir)?;
    info!("initialized data files in {}", dir.display());
    println!("Data files initialized successfully.");
    Ok(())
}

/// Writes all default data files into `dir`. Exposed for unit testing.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    write_config(dir)?;
    sample_holidays().save_to(dir)?;
    sample_leave().save_to(dir)?;
    sample_rules().save_to(dir)?;
    Ok(())
}

fn write_config(dir: &Path) -> Result<()> {
    let config = ConfigFile {
        settings: LeaveSettings {
            initial_balance: 5.0,
            pto_start_date: Some("2026-01-01".to_string()),
            carry_over_limit: Some(5.0),
            renewal_date: Some("2026-01-01".to_string()),
            ..LeaveSettings::default()
        },
        optimizer: OptimizationPreferences::default(),
    };
    let yaml = serde_norway::to_string(&config)?;
    fs::write(dir.join("config.yaml"), yaml)?;
    Ok(())
}

fn sample_holidays() -> HolidayData {
    let mut data = HolidayData::default();
    data.add(Holiday::yearly("New Year's Day", "2026-01-01"));
    data.add(Holiday::new("Martin Luther King Jr. Day", "2026-01-19"));
    data.add(Holiday::new("Presidents' Day", "2026-02-16"));
    data.add(Holiday::new("Memorial Day", "2026-05-25"));
    data.add(Holiday::yearly("Juneteenth", "2026-06-19"));
    data.add(Holiday::new("Independence Day", "2026-07-03"));
    data.add(Holiday::new("Labor Day", "2026-09-07"));
    data.add(Holiday::yearly("Veterans Day", "2026-11-11"));
    data.add(Holiday::new("Thanksgiving Day", "2026-11-26"));
    data.add(Holiday::new("Day After Thanksgiving", "2026-11-27"));
    data.add(Holiday::yearly("Christmas Day", "2026-12-25"));
    data.add(Holiday::new("Martin Luther King Jr. Day", "2027-01-18"));
    data.add(Holiday::new("Presidents' Day", "2027-02-15"));
    data.add(Holiday::new("Memorial Day", "2027-05-31"));
    data.add(Holiday::new("Independence Day", "2027-07-05"));
    data.add(Holiday::new("Labor Day", "2027-09-06"));
    data.add(Holiday::new("Thanksgiving Day", "2027-11-25"));
    data.add(Holiday::new("Day After Thanksgiving", "2027-11-26"));
    data
}

fn sample_leave() -> LeaveData {
    let mut data = LeaveData::default();
    data.add(LeaveEntry {
        note: Some("Dentist".to_string()),
        ..LeaveEntry::new("2026-03-13", 1.0)
    });
    data
}

fn sample_rules() -> AccrualRuleData {
    let mut data = AccrualRuleData::default();
    data.add(AccrualRule {
        day_of_period: Some(15),
        ..AccrualRule::new("Monthly PTO", 1.25, AccrualFrequency::Monthly, "2026-01-01")
    });
    data
}
