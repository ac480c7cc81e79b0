use crate::data::persistence::Persistable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day (or part of a day) of booked leave.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LeaveEntry {
    pub date: String,
    /// Amount in the configured tracking unit.
    pub amount: f64,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LeaveEntry {
    pub fn new(date: &str, amount: f64) -> Self {
        LeaveEntry {
            date: date.to_string(),
            amount,
            cancelled: false,
            note: None,
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// Counts against the balance: not cancelled, with a usable date and amount.
    pub fn is_effective(&self) -> bool {
        !self.cancelled && self.amount.is_finite() && self.parsed_date().is_some()
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct LeaveData {
    pub entries: Vec<LeaveEntry>,
}

impl Persistable for LeaveData {
    fn filename() -> &'static str {
        "leave.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl LeaveData {
    pub fn add(&mut self, entry: LeaveEntry) {
        self.entries.push(entry);
        self.entries.sort_by(|a, b| a.date.cmp(&b.date));
    }

    /// Books every day in [start, end] that `is_workday` accepts.
    pub fn add_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        amount: f64,
        note: Option<&str>,
        is_workday: impl Fn(NaiveDate) -> bool,
    ) -> usize {
        let mut added = 0;
        let mut current = start;
        while current <= end {
            if is_workday(current) {
                self.add(LeaveEntry {
                    note: note.map(str::to_string),
                    ..LeaveEntry::new(&current.format("%Y-%m-%d").to_string(), amount)
                });
                added += 1;
            }
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        added
    }

    /// Dates of non-cancelled entries, ascending and unique.
    pub fn booked_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .entries
            .iter()
            .filter(|e| e.is_effective())
            .filter_map(LeaveEntry::parsed_date)
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_leave_entry_new_sets_fields() {
        let e = LeaveEntry::new("2025-05-12", 1.0);
        assert_eq!(e.date, "2025-05-12");
        assert_eq!(e.amount, 1.0);
        assert!(!e.cancelled);
        assert_eq!(e.parsed_date(), Some(d(2025, 5, 12)));
    }

    #[test]
    fn test_add_keeps_entries_sorted() {
        let mut data = LeaveData::default();
        data.add(LeaveEntry::new("2025-06-02", 1.0));
        data.add(LeaveEntry::new("2025-01-15", 1.0));
        assert_eq!(data.entries[0].date, "2025-01-15");
    }

    #[test]
    fn test_add_range_skips_non_workdays() {
        let mut data = LeaveData::default();
        // Fri 2025-01-10 through Tue 2025-01-14
        let added = data.add_range(d(2025, 1, 10), d(2025, 1, 14), 1.0, None, |day| {
            !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
        });
        assert_eq!(added, 3);
        assert_eq!(
            data.booked_dates(),
            vec![d(2025, 1, 10), d(2025, 1, 13), d(2025, 1, 14)]
        );
    }

    #[test]
    fn test_booked_dates_excludes_cancelled_and_invalid() {
        let mut data = LeaveData::default();
        data.add(LeaveEntry::new("2025-03-03", 1.0));
        data.add(LeaveEntry {
            cancelled: true,
            ..LeaveEntry::new("2025-03-04", 1.0)
        });
        data.add(LeaveEntry::new("not-a-date", 1.0));
        data.add(LeaveEntry::new("2025-03-03", 0.5));
        assert_eq!(data.booked_dates(), vec![d(2025, 3, 3)]);
    }

    #[test]
    fn test_nan_amount_is_not_effective() {
        assert!(!LeaveEntry::new("2025-03-03", f64::NAN).is_effective());
    }

    #[test]
    fn test_yaml_defaults_for_optional_fields() {
        let yaml = "entries:\n  - date: '2025-02-14'\n    amount: 4\n";
        let data: LeaveData = serde_norway::from_str(yaml).unwrap();
        assert_eq!(data.entries.len(), 1);
        assert!(!data.entries[0].cancelled);
        assert!(data.entries[0].note.is_none());
    }

    #[test]
    fn test_default_leave_data_is_empty() {
        let data = LeaveData::default();
        assert!(data.entries.is_empty());
        assert!(data.booked_dates().is_empty());
    }
}
