use crate::calc::{BalanceProjection, balance_as_of};
use crate::data::{AccrualRuleData, LeaveData, LeaveSettings, Persistable};
use anyhow::Result;
use chrono::{Local, Months, NaiveDate};
use log::warn;

pub fn run(date: Option<NaiveDate>, forecast_months: u32) -> Result<()> {
    let settings = LeaveSettings::load()?;
    if let Err(err) = settings.validate() {
        warn!("config.yaml: {err}");
    }
    let rules = AccrualRuleData::load()?;
    let leave = LeaveData::load()?;
    let target = date.unwrap_or_else(|| Local::now().date_naive());

    let projection = balance_as_of(target, &settings, &rules.rules, &leave.entries);
    let forecast = forecast(target, forecast_months, &settings, &rules, &leave);
    write_balance(target, &projection, &forecast, &settings, &mut std::io::stdout())
}

/// Balance on the same day of each following month.
pub(crate) fn forecast(
    from: NaiveDate,
    months: u32,
    settings: &LeaveSettings,
    rules: &AccrualRuleData,
    leave: &LeaveData,
) -> Vec<(NaiveDate, f64)> {
    (1..=months)
        .filter_map(|m| from.checked_add_months(Months::new(m)))
        .map(|date| {
            let p = balance_as_of(date, settings, &rules.rules, &leave.entries);
            (date, p.balance)
        })
        .collect()
}

pub(crate) fn write_balance<W: std::io::Write>(
    target: NaiveDate,
    p: &BalanceProjection,
    forecast: &[(NaiveDate, f64)],
    settings: &LeaveSettings,
    out: &mut W,
) -> Result<()> {
    let unit = settings.unit_label();
    writeln!(out, "Balance as of {}", target.format("%Y-%m-%d"))?;
    writeln!(out, "---")?;
    writeln!(out, "{:<22} {:.2} {}", "Starting Balance:", p.initial, unit)?;
    writeln!(out, "{:<22} {:.2} {}", "Accrued:", p.accrued, unit)?;
    writeln!(out, "{:<22} {:.2} {}", "Used:", p.used, unit)?;
    if p.carry_over_loss > 0.0 {
        writeln!(out, "{:<22} {:.2} {}", "Lost at Renewal:", p.carry_over_loss, unit)?;
    }
    writeln!(out, "---")?;
    writeln!(out, "{:<22} {:.2} {}", "Balance:", p.balance, unit)?;
    if settings.unit == crate::data::TrackingUnit::Hours {
        writeln!(out, "{:<22} {:.2} days", "", settings.to_days(p.balance))?;
    }
    if p.truncated {
        writeln!(
            out,
            "Warning: an accrual rule hit the iteration limit; accrued amount is partial."
        )?;
    }

    if !forecast.is_empty() {
        writeln!(out, "---")?;
        writeln!(out, "  {:<14} {}", "Date", "Balance")?;
        for (date, balance) in forecast {
            writeln!(out, "  {:<14} {:.2}", date.format("%Y-%m-%d").to_string(), balance)?;
        }
    }
    Ok(())
}
