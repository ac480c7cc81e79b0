use crate::calc::anchor::{Anchor, Direction, resolve_anchor};
use crate::calc::timeline::Segment;
use chrono::NaiveDate;

/// A proposed (or selected) stretch of leave plus the days off around it.
#[derive(Clone, Debug, PartialEq)]
pub struct SuggestedBreak {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Working days inside the break that need leave.
    pub pto_days: Vec<NaiveDate>,
    pub pto_required: u32,
    pub total_days_off: u32,
    pub efficiency: f64,
    pub before: Anchor,
    pub after: Anchor,
}

impl SuggestedBreak {
    /// Two breaks with the same span and leave cost are the same candidate.
    pub fn key(&self) -> String {
        format!(
            "{}_{}_{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d"),
            self.pto_required
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateLimits {
    pub max_pto_per_break: u32,
    pub min_consecutive_days_off: u32,
    pub extend_existing: bool,
}

/// Builds at most one candidate per working segment.
pub fn generate_candidates(
    segments: &[Segment],
    range_start: NaiveDate,
    range_end: NaiveDate,
    limits: &CandidateLimits,
) -> Vec<SuggestedBreak> {
    segments
        .iter()
        .enumerate()
        .filter(|(_, seg)| seg.is_working())
        .filter_map(|(index, seg)| {
            candidate_for(segments, index, seg, range_start, range_end, limits)
        })
        .collect()
}

fn candidate_for(
    segments: &[Segment],
    index: usize,
    seg: &Segment,
    range_start: NaiveDate,
    range_end: NaiveDate,
    limits: &CandidateLimits,
) -> Option<SuggestedBreak> {
    if seg.is_empty() {
        return None;
    }
    let pto_required = seg.len() as u32;
    if pto_required > limits.max_pto_per_break {
        return None;
    }

    let before = resolve_anchor(
        segments,
        index,
        Direction::Before,
        range_start,
        range_end,
        limits.extend_existing,
    );
    let after = resolve_anchor(
        segments,
        index,
        Direction::After,
        range_start,
        range_end,
        limits.extend_existing,
    );

    let total_days_off = pto_required + before.counted_days() + after.counted_days();
    if total_days_off < limits.min_consecutive_days_off {
        return None;
    }

    let start = if before.counts_toward_run { before.start } else { seg.start };
    let end = if after.counts_toward_run { after.end } else { seg.end };

    Some(SuggestedBreak {
        start,
        end,
        pto_days: seg.days.clone(),
        pto_required,
        total_days_off,
        efficiency: total_days_off as f64 / pto_required as f64,
        before,
        after,
    })
}
