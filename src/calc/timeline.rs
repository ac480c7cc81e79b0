use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeSet, HashSet};

/// Why a day is not a working day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnchorSource {
    Weekend,
    Holiday,
    Existing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    Working,
    NonWorking,
}

/// A maximal run of consecutive days of one kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<NaiveDate>,
    /// Union of the sources of every member day. Always empty for working segments.
    pub sources: BTreeSet<AnchorSource>,
}

impl Segment {
    fn open(kind: SegmentKind, date: NaiveDate) -> Self {
        Segment {
            kind,
            start: date,
            end: date,
            days: Vec::new(),
            sources: BTreeSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn is_working(&self) -> bool {
        self.kind == SegmentKind::Working
    }
}

/// Returns the reasons `date` is a day off. An empty set means a working day.
/// Weekend numbers use 0 = Sunday through 6 = Saturday.
pub fn classify_day(
    date: NaiveDate,
    weekend_days: &HashSet<u32>,
    holidays: &HashSet<NaiveDate>,
    booked: &HashSet<NaiveDate>,
) -> BTreeSet<AnchorSource> {
    let mut sources = BTreeSet::new();
    if weekend_days.contains(&date.weekday().num_days_from_sunday()) {
        sources.insert(AnchorSource::Weekend);
    }
    if holidays.contains(&date) {
        sources.insert(AnchorSource::Holiday);
    }
    if booked.contains(&date) {
        sources.insert(AnchorSource::Existing);
    }
    sources
}

/// Walks [start, end] inclusive and groups consecutive days of the same kind.
pub fn build_timeline(
    start: NaiveDate,
    end: NaiveDate,
    weekend_days: &HashSet<u32>,
    holidays: &HashSet<NaiveDate>,
    booked: &HashSet<NaiveDate>,
) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut open: Option<Segment> = None;

    let mut current = start;
    while current <= end {
        let sources = classify_day(current, weekend_days, holidays, booked);
        let kind = if sources.is_empty() {
            SegmentKind::Working
        } else {
            SegmentKind::NonWorking
        };

        let mut segment = match open.take() {
            Some(seg) if seg.kind == kind => seg,
            Some(seg) => {
                segments.push(seg);
                Segment::open(kind, current)
            }
            None => Segment::open(kind, current),
        };
        segment.end = current;
        segment.days.push(current);
        segment.sources.extend(sources);
        open = Some(segment);

        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    if let Some(seg) = open {
        segments.push(seg);
    }
    segments
}
