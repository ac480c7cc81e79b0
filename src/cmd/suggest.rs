use crate::calc::{
    OptimizationPreferences, OptimizationResult, OptimizerInput, RankingMode, balance_as_of,
    booked_from, optimize,
};
use crate::data::{
    AccrualRuleData, HolidayData, LeaveData, LeaveSettings, OptimizerConfig, Persistable,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::{info, warn};

/// One-off overrides for the optimizer preferences in config.yaml.
#[derive(Debug, Default, Clone)]
pub struct SuggestOptions {
    /// Leave days to plan with instead of the projected balance.
    pub budget: Option<f64>,
    pub mode: Option<RankingMode>,
    pub max_suggestions: Option<u32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl SuggestOptions {
    fn apply(&self, prefs: &mut OptimizationPreferences) {
        if let Some(mode) = self.mode {
            prefs.ranking_mode = Some(mode);
        }
        if let Some(max) = self.max_suggestions {
            prefs.max_suggestions = f64::from(max);
        }
        if self.from.is_some() {
            prefs.earliest_start = self.from;
        }
        if self.to.is_some() {
            prefs.latest_end = self.to;
        }
    }
}

pub fn run(opts: &SuggestOptions) -> Result<()> {
    let settings = LeaveSettings::load()?;
    if let Err(err) = settings.validate() {
        warn!("config.yaml: {err}");
    }
    let mut prefs = OptimizerConfig::load()?.optimizer;
    opts.apply(&mut prefs);

    let holidays = HolidayData::load()?;
    let leave = LeaveData::load()?;
    let rules = AccrualRuleData::load()?;
    let today = Local::now().date_naive();

    let input = build_input(&settings, prefs, &holidays, &leave, &rules, opts.budget, today);
    info!(
        "planning with {:.2} days, {} holidays, {} booked days",
        input.available_pto,
        input.holidays.len(),
        input.booked.len()
    );
    let result = optimize(&input);
    write_suggestions(&result, input.available_pto, &mut std::io::stdout())
}

/// Collects everything the optimizer needs. The budget defaults to today's balance in days,
/// less leave already booked from today on.
pub(crate) fn build_input(
    settings: &LeaveSettings,
    preferences: OptimizationPreferences,
    holidays: &HolidayData,
    leave: &LeaveData,
    rules: &AccrualRuleData,
    budget: Option<f64>,
    today: NaiveDate,
) -> OptimizerInput {
    let available_pto = budget.unwrap_or_else(|| {
        let projection = balance_as_of(today, settings, &rules.rules, &leave.entries);
        if projection.truncated {
            warn!("accrual projection was truncated; balance may be understated");
        }
        let committed = booked_from(&leave.entries, today);
        settings.to_days(projection.balance - committed)
    });
    let window = preferences.sanitize(today);

    OptimizerInput {
        available_pto,
        weekend_days: settings.weekend_days.clone(),
        holidays: holidays.dates_in_range(window.earliest_start, window.latest_end),
        booked: leave.booked_dates(),
        preferences,
        today,
    }
}

pub(crate) fn write_suggestions<W: std::io::Write>(
    result: &OptimizationResult,
    available: f64,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Break Suggestions")?;
    writeln!(out, "{:<22} {:.2} days", "Available:", available)?;
    writeln!(out, "---")?;

    if result.breaks.is_empty() {
        writeln!(out, "No breaks to suggest.")?;
    } else {
        writeln!(
            out,
            "  {:<4} {:<12} {:<12} {:<6} {:<9} {:<11} {}",
            "#", "Start", "End", "Leave", "Days Off", "Efficiency", "Anchors"
        )?;
        for (i, b) in result.breaks.iter().enumerate() {
            writeln!(
                out,
                "  {:<4} {:<12} {:<12} {:<6} {:<9} {:<11.2} {} / {}",
                i + 1,
                b.start.format("%Y-%m-%d"),
                b.end.format("%Y-%m-%d"),
                b.pto_required,
                b.total_days_off,
                b.efficiency,
                b.before.anchor_type.label(),
                b.after.anchor_type.label()
            )?;
        }
        writeln!(out, "---")?;
        writeln!(out, "Suggested leave days ({}):", result.suggested_days.len())?;
        for day in &result.suggested_days {
            writeln!(out, "  {}", day.format("%Y-%m-%d %a"))?;
        }
    }

    writeln!(out, "---")?;
    writeln!(out, "{:<22} {}", "Leave Used:", result.total_pto_used)?;
    writeln!(out, "{:<22} {}", "Days Off:", result.total_days_off)?;
    writeln!(out, "{:<22} {:.2}", "Average Efficiency:", result.average_efficiency)?;
    writeln!(out, "{:<22} {}", "Leave Remaining:", result.remaining_pto)?;
    Ok(())
}
