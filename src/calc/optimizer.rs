use crate::calc::candidates::{CandidateLimits, SuggestedBreak, generate_candidates};
use crate::calc::ranking::{RankingMode, rank_candidates, select_breaks};
use crate::calc::timeline::build_timeline;
use chrono::{Days, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Length of the planning window when no latest end date is configured.
pub const DEFAULT_WINDOW_DAYS: u64 = 365;

/// Optimizer settings as stored under the `optimizer` key of config.yaml.
/// Numbers are kept as floats here and floored by [`OptimizationPreferences::sanitize`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct OptimizationPreferences {
    pub earliest_start: Option<NaiveDate>,
    pub latest_end: Option<NaiveDate>,
    pub max_pto_to_use: f64,
    pub max_pto_per_break: f64,
    pub min_consecutive_days_off: f64,
    pub max_suggestions: f64,
    pub min_spacing_between_breaks: f64,
    pub ranking_mode: Option<RankingMode>,
    pub extend_existing_pto: bool,
}

impl Default for OptimizationPreferences {
    fn default() -> Self {
        OptimizationPreferences {
            earliest_start: None,
            latest_end: None,
            max_pto_to_use: 10.0,
            max_pto_per_break: 5.0,
            min_consecutive_days_off: 3.0,
            max_suggestions: 5.0,
            min_spacing_between_breaks: 0.0,
            ranking_mode: None,
            extend_existing_pto: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SanitizedPreferences {
    pub earliest_start: NaiveDate,
    pub latest_end: NaiveDate,
    pub max_pto_to_use: u32,
    pub max_pto_per_break: u32,
    pub min_consecutive_days_off: u32,
    pub max_suggestions: u32,
    pub min_spacing_between_breaks: u32,
    pub ranking_mode: RankingMode,
    pub extend_existing_pto: bool,
}

impl SanitizedPreferences {
    /// True when the window is inverted or a cap leaves nothing to suggest.
    pub fn is_degenerate(&self, budget: u32) -> bool {
        self.earliest_start > self.latest_end
            || budget == 0
            || self.max_pto_per_break == 0
            || self.max_suggestions == 0
    }
}

/// Floors a float and clamps it into `0..=u32::MAX`; NaN becomes 0.
fn whole(value: f64) -> u32 {
    value.max(0.0).floor() as u32
}

impl OptimizationPreferences {
    pub fn sanitize(&self, today: NaiveDate) -> SanitizedPreferences {
        let (start, end) = match (self.earliest_start, self.latest_end) {
            (Some(s), Some(e)) if s > e => (Some(e), Some(s)),
            other => other,
        };
        let earliest_start = start.map_or(today, |s| s.max(today));
        let latest_end = end.unwrap_or_else(|| {
            earliest_start
                .checked_add_days(Days::new(DEFAULT_WINDOW_DAYS))
                .unwrap_or(earliest_start)
        });

        SanitizedPreferences {
            earliest_start,
            latest_end,
            max_pto_to_use: whole(self.max_pto_to_use),
            max_pto_per_break: whole(self.max_pto_per_break),
            min_consecutive_days_off: whole(self.min_consecutive_days_off),
            max_suggestions: whole(self.max_suggestions),
            min_spacing_between_breaks: whole(self.min_spacing_between_breaks),
            ranking_mode: self.ranking_mode.unwrap_or_default(),
            extend_existing_pto: self.extend_existing_pto,
        }
    }
}

/// Everything one optimizer run needs. Nothing is read from outside this struct.
#[derive(Clone, Debug)]
pub struct OptimizerInput {
    pub available_pto: f64,
    /// 0 = Sunday .. 6 = Saturday
    pub weekend_days: Vec<u32>,
    pub holidays: Vec<NaiveDate>,
    pub booked: Vec<NaiveDate>,
    pub preferences: OptimizationPreferences,
    pub today: NaiveDate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OptimizationResult {
    /// Deduplicated, ascending.
    pub suggested_days: Vec<NaiveDate>,
    pub breaks: Vec<SuggestedBreak>,
    pub total_pto_used: u32,
    pub total_days_off: u32,
    pub average_efficiency: f64,
    pub remaining_pto: u32,
}

impl OptimizationResult {
    pub fn empty(budget: u32) -> Self {
        OptimizationResult {
            suggested_days: Vec::new(),
            breaks: Vec::new(),
            total_pto_used: 0,
            total_days_off: 0,
            average_efficiency: 0.0,
            remaining_pto: budget,
        }
    }

    fn from_selection(breaks: Vec<SuggestedBreak>, budget: u32) -> Self {
        let suggested_days: Vec<NaiveDate> = breaks
            .iter()
            .flat_map(|b| b.pto_days.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let total_pto_used: u32 = breaks.iter().map(|b| b.pto_required).sum();
        let total_days_off: u32 = breaks.iter().map(|b| b.total_days_off).sum();
        let average_efficiency = if total_pto_used > 0 {
            total_days_off as f64 / total_pto_used as f64
        } else {
            0.0
        };

        OptimizationResult {
            suggested_days,
            breaks,
            total_pto_used,
            total_days_off,
            average_efficiency,
            remaining_pto: budget.saturating_sub(total_pto_used),
        }
    }
}

/// Leave days the optimizer may spend: `min(floor(available), max_pto_to_use)`, never negative.
pub fn clamped_budget(available_pto: f64, max_pto_to_use: u32) -> u32 {
    whole(available_pto).min(max_pto_to_use)
}

pub fn optimize(input: &OptimizerInput) -> OptimizationResult {
    let prefs = input.preferences.sanitize(input.today);
    let budget = clamped_budget(input.available_pto, prefs.max_pto_to_use);
    if prefs.is_degenerate(budget) {
        debug!(
            "nothing to suggest: window {}..{}, budget {}",
            prefs.earliest_start, prefs.latest_end, budget
        );
        return OptimizationResult::empty(budget);
    }

    let weekend_days: HashSet<u32> = input.weekend_days.iter().copied().collect();
    let holidays: HashSet<NaiveDate> = input.holidays.iter().copied().collect();
    let booked: HashSet<NaiveDate> = input.booked.iter().copied().collect();

    let segments = build_timeline(
        prefs.earliest_start,
        prefs.latest_end,
        &weekend_days,
        &holidays,
        &booked,
    );
    let limits = CandidateLimits {
        max_pto_per_break: prefs.max_pto_per_break,
        min_consecutive_days_off: prefs.min_consecutive_days_off,
        extend_existing: prefs.extend_existing_pto,
    };
    let mut candidates =
        generate_candidates(&segments, prefs.earliest_start, prefs.latest_end, &limits);
    rank_candidates(&mut candidates, prefs.ranking_mode);

    let selected = select_breaks(
        &candidates,
        budget,
        prefs.max_suggestions,
        prefs.min_spacing_between_breaks,
    );
    debug!(
        "{} segments, {} candidates, {} selected ({} mode)",
        segments.len(),
        candidates.len(),
        selected.len(),
        prefs.ranking_mode
    );

    OptimizationResult::from_selection(selected, budget)
}
