use crate::calc::timeline::{AnchorSource, Segment, SegmentKind};
use chrono::NaiveDate;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Before,
    After,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorType {
    Weekend,
    Holiday,
    /// Weekend and holiday days in the same run.
    Mixed,
    Existing,
    BoundaryStart,
    BoundaryEnd,
}

impl AnchorType {
    pub fn label(&self) -> &'static str {
        match self {
            AnchorType::Weekend => "weekend",
            AnchorType::Holiday => "holiday",
            AnchorType::Mixed => "mixed",
            AnchorType::Existing => "existing",
            AnchorType::BoundaryStart => "boundary-start",
            AnchorType::BoundaryEnd => "boundary-end",
        }
    }
}

/// The non-working run (or range edge) next to a working gap.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchor {
    pub anchor_type: AnchorType,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<NaiveDate>,
    pub sources: BTreeSet<AnchorSource>,
    pub counts_toward_run: bool,
}

impl Anchor {
    pub fn day_count(&self) -> u32 {
        self.days.len() as u32
    }

    /// Days this anchor adds to a break's days-off total.
    pub fn counted_days(&self) -> u32 {
        if self.counts_toward_run {
            self.day_count()
        } else {
            0
        }
    }

    fn boundary(direction: Direction, range_start: NaiveDate, range_end: NaiveDate) -> Self {
        let (anchor_type, date) = match direction {
            Direction::Before => (AnchorType::BoundaryStart, range_start),
            Direction::After => (AnchorType::BoundaryEnd, range_end),
        };
        Anchor {
            anchor_type,
            start: date,
            end: date,
            days: Vec::new(),
            sources: BTreeSet::new(),
            counts_toward_run: false,
        }
    }
}

/// Scans outward from `index` and returns the first non-working segment.
pub fn find_neighbor(segments: &[Segment], index: usize, direction: Direction) -> Option<&Segment> {
    match direction {
        Direction::Before => segments[..index.min(segments.len())]
            .iter()
            .rev()
            .find(|s| s.kind == SegmentKind::NonWorking),
        Direction::After => segments
            .iter()
            .skip(index + 1)
            .find(|s| s.kind == SegmentKind::NonWorking),
    }
}

pub fn anchor_type_for(sources: &BTreeSet<AnchorSource>) -> AnchorType {
    let weekend = sources.contains(&AnchorSource::Weekend);
    let holiday = sources.contains(&AnchorSource::Holiday);
    match (weekend, holiday) {
        (true, true) => AnchorType::Mixed,
        (true, false) => AnchorType::Weekend,
        (false, true) => AnchorType::Holiday,
        (false, false) => AnchorType::Existing,
    }
}

/// Weekend and holiday runs always count; booked leave counts only when
/// `extend_existing` is set.
pub fn counts_toward_run(sources: &BTreeSet<AnchorSource>, extend_existing: bool) -> bool {
    sources.contains(&AnchorSource::Weekend)
        || sources.contains(&AnchorSource::Holiday)
        || (extend_existing && sources.contains(&AnchorSource::Existing))
}

pub fn resolve_anchor(
    segments: &[Segment],
    index: usize,
    direction: Direction,
    range_start: NaiveDate,
    range_end: NaiveDate,
    extend_existing: bool,
) -> Anchor {
    match find_neighbor(segments, index, direction) {
        Some(seg) => Anchor {
            anchor_type: anchor_type_for(&seg.sources),
            start: seg.start,
            end: seg.end,
            days: seg.days.clone(),
            sources: seg.sources.clone(),
            counts_toward_run: counts_toward_run(&seg.sources, extend_existing),
        },
        None => Anchor::boundary(direction, range_start, range_end),
    }
}
