use crate::calc::candidates::SuggestedBreak;
use crate::error::DataError;
use chrono::Days;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RankingMode {
    /// Most days off per leave day spent.
    #[default]
    Efficiency,
    Longest,
    LeastPto,
    Earliest,
}

impl fmt::Display for RankingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingMode::Efficiency => write!(f, "efficiency"),
            RankingMode::Longest => write!(f, "longest"),
            RankingMode::LeastPto => write!(f, "least-pto"),
            RankingMode::Earliest => write!(f, "earliest"),
        }
    }
}

impl FromStr for RankingMode {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "efficiency" => Ok(RankingMode::Efficiency),
            "longest" => Ok(RankingMode::Longest),
            "least-pto" | "least_pto" => Ok(RankingMode::LeastPto),
            "earliest" => Ok(RankingMode::Earliest),
            _ => Err(DataError::UnknownRankingMode(s.to_string())),
        }
    }
}

fn by_efficiency_desc(a: &SuggestedBreak, b: &SuggestedBreak) -> Ordering {
    b.efficiency.total_cmp(&a.efficiency)
}

fn by_days_off_desc(a: &SuggestedBreak, b: &SuggestedBreak) -> Ordering {
    b.total_days_off.cmp(&a.total_days_off)
}

fn by_pto_asc(a: &SuggestedBreak, b: &SuggestedBreak) -> Ordering {
    a.pto_required.cmp(&b.pto_required)
}

fn by_start_asc(a: &SuggestedBreak, b: &SuggestedBreak) -> Ordering {
    a.start.cmp(&b.start)
}

pub fn compare_breaks(a: &SuggestedBreak, b: &SuggestedBreak, mode: RankingMode) -> Ordering {
    match mode {
        RankingMode::Efficiency => by_efficiency_desc(a, b)
            .then_with(|| by_days_off_desc(a, b))
            .then_with(|| by_pto_asc(a, b))
            .then_with(|| by_start_asc(a, b)),
        RankingMode::Longest => by_days_off_desc(a, b)
            .then_with(|| by_pto_asc(a, b))
            .then_with(|| by_start_asc(a, b)),
        RankingMode::LeastPto => by_pto_asc(a, b)
            .then_with(|| by_efficiency_desc(a, b))
            .then_with(|| by_start_asc(a, b)),
        RankingMode::Earliest => by_start_asc(a, b)
            .then_with(|| by_days_off_desc(a, b))
            .then_with(|| by_pto_asc(a, b)),
    }
}

pub fn rank_candidates(candidates: &mut [SuggestedBreak], mode: RankingMode) {
    // Stable sort keeps generation (chronological) order for full ties.
    candidates.sort_by(|a, b| compare_breaks(a, b, mode));
}

/// True when the later of the two breaks starts before `earlier.end + min_spacing + 1`.
pub fn breaks_conflict(a: &SuggestedBreak, b: &SuggestedBreak, min_spacing: u32) -> bool {
    let (earlier, later) = if a.start <= b.start { (a, b) } else { (b, a) };
    match earlier.end.checked_add_days(Days::new(u64::from(min_spacing) + 1)) {
        Some(free_from) => later.start < free_from,
        None => true,
    }
}

/// Greedy single pass over `ranked`; no backtracking.
pub fn select_breaks(
    ranked: &[SuggestedBreak],
    budget: u32,
    max_suggestions: u32,
    min_spacing: u32,
) -> Vec<SuggestedBreak> {
    let mut remaining = budget;
    let mut selected: Vec<SuggestedBreak> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for candidate in ranked {
        if selected.len() as u32 >= max_suggestions {
            break;
        }
        if candidate.pto_required > remaining || seen.contains(&candidate.key()) {
            continue;
        }
        if selected
            .iter()
            .any(|chosen| breaks_conflict(chosen, candidate, min_spacing))
        {
            continue;
        }
        remaining -= candidate.pto_required;
        seen.insert(candidate.key());
        selected.push(candidate.clone());
    }
    selected
}
