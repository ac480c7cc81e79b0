use crate::data::{HolidayData, LeaveData, LeaveSettings, Persistable, TrackingUnit};
use crate::error::DataError;
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use log::info;
use std::collections::HashSet;

pub fn run() -> Result<()> {
    let leave_data = LeaveData::load()?;
    write_leave(&leave_data, &mut std::io::stdout())
}

/// Books every working day in [from, to] and saves leave.yaml.
pub fn book(
    from: NaiveDate,
    to: Option<NaiveDate>,
    amount: Option<f64>,
    note: Option<&str>,
) -> Result<()> {
    let settings = LeaveSettings::load()?;
    let holidays = HolidayData::load()?;
    let mut leave = LeaveData::load()?;
    let to = to.unwrap_or(from);

    let added = book_into(&mut leave, &settings, &holidays, from, to, amount, note)?;
    leave.save()?;
    info!("booked {added} day(s) from {from} to {to}");
    println!("Booked {added} day(s).");
    Ok(())
}

/// Amount defaults to one working day in the configured unit.
pub(crate) fn book_into(
    leave: &mut LeaveData,
    settings: &LeaveSettings,
    holidays: &HolidayData,
    from: NaiveDate,
    to: NaiveDate,
    amount: Option<f64>,
    note: Option<&str>,
) -> Result<usize> {
    if to < from {
        return Err(DataError::invalid_value("to", "must not be before the start date").into());
    }
    let amount = amount.unwrap_or(match settings.unit {
        TrackingUnit::Days => 1.0,
        TrackingUnit::Hours => settings.hours_per_day,
    });
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DataError::invalid_value("amount", "must be a positive number").into());
    }

    let weekend: HashSet<u32> = settings.weekend_days.iter().copied().collect();
    let closed: HashSet<NaiveDate> = holidays.dates_in_range(from, to).into_iter().collect();
    Ok(leave.add_range(from, to, amount, note, |day| {
        !weekend.contains(&day.weekday().num_days_from_sunday()) && !closed.contains(&day)
    }))
}

pub(crate) fn write_leave<W: std::io::Write>(data: &LeaveData, out: &mut W) -> Result<()> {
    writeln!(out, "Booked Leave")?;
    writeln!(out, "---")?;
    writeln!(
        out,
        "  {:<4} {:<14} {:<8} {:<10} {}",
        "#", "Date", "Amount", "Status", "Note"
    )?;
    for (i, e) in data.entries.iter().enumerate() {
        writeln!(
            out,
            "  {:<4} {:<14} {:<8.2} {:<10} {}",
            i + 1,
            e.date,
            e.amount,
            if e.cancelled { "Cancelled" } else { "Booked" },
            e.note.as_deref().unwrap_or("")
        )?;
    }
    let booked: f64 = data
        .entries
        .iter()
        .filter(|e| e.is_effective())
        .fold(0.0, |acc, e| acc + e.amount);
    writeln!(out, "---")?;
    writeln!(out, "Total: {} entry(ies), {:.2} booked", data.entries.len(), booked)?;
    Ok(())
}
