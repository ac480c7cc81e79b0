use crate::data::persistence::Persistable;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Holiday {
    pub name: String,
    pub date: String,
    /// Observed on the same month/day every year.
    #[serde(default)]
    pub repeats_yearly: bool,
}

impl Holiday {
    pub fn new(name: &str, date: &str) -> Self {
        Holiday {
            name: name.to_string(),
            date: date.to_string(),
            repeats_yearly: false,
        }
    }

    pub fn yearly(name: &str, date: &str) -> Self {
        Holiday {
            repeats_yearly: true,
            ..Holiday::new(name, date)
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// Every date in [start, end] this holiday falls on.
    fn occurrences(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let Some(date) = self.parsed_date() else {
            return Vec::new();
        };
        if !self.repeats_yearly {
            return if date >= start && date <= end { vec![date] } else { Vec::new() };
        }
        (start.year()..=end.year())
            .filter_map(|year| NaiveDate::from_ymd_opt(year, date.month(), date.day()))
            .filter(|d| *d >= start && *d <= end && d.year() >= date.year())
            .collect()
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct HolidayData {
    pub holidays: Vec<Holiday>,
}

impl Persistable for HolidayData {
    fn filename() -> &'static str {
        "holidays.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl HolidayData {
    pub fn add(&mut self, holiday: Holiday) {
        self.holidays.push(holiday);
    }

    /// Holiday dates inside [start, end], with yearly holidays expanded.
    /// A yearly Feb 29 holiday only lands in leap years.
    pub fn dates_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        self.holidays
            .iter()
            .flat_map(|h| h.occurrences(start, end))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
