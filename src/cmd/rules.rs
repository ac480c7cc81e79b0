use crate::data::{AccrualRuleData, Persistable};
use anyhow::Result;

pub fn run() -> Result<()> {
    let rule_data = AccrualRuleData::load()?;
    write_rules(&rule_data, &mut std::io::stdout())
}

pub(crate) fn write_rules<W: std::io::Write>(data: &AccrualRuleData, out: &mut W) -> Result<()> {
    writeln!(out, "Accrual Rules")?;
    writeln!(out, "---")?;
    writeln!(
        out,
        "  {:<24} {:<8} {:<10} {:<6} {:<12} {:<12} {}",
        "Name", "Amount", "Frequency", "Day", "Start", "End", "Active"
    )?;
    for r in &data.rules {
        writeln!(
            out,
            "  {:<24} {:<8.2} {:<10} {:<6} {:<12} {:<12} {}",
            r.name,
            r.amount,
            r.frequency.to_string(),
            r.day_of_period.map_or("-".to_string(), |d| d.to_string()),
            r.start_date,
            r.end_date.as_deref().unwrap_or("-"),
            if r.active { "Yes" } else { "No" }
        )?;
    }
    writeln!(out, "---")?;
    writeln!(
        out,
        "Total: {} rule(s), {} active",
        data.rules.len(),
        data.active().count()
    )?;
    Ok(())
}
