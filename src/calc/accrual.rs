use crate::data::{AccrualFrequency, AccrualRule};
use chrono::{Datelike, Days, NaiveDate};
use log::warn;

/// Upper bound on occurrences walked per rule and call.
pub const MAX_ACCRUAL_ITERATIONS: u32 = 10_000;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AccrualTotal {
    pub amount: f64,
    pub occurrences: u32,
    /// Set when the walk stopped at `MAX_ACCRUAL_ITERATIONS`; `amount` is then partial.
    pub truncated: bool,
}

impl AccrualTotal {
    pub fn merge(self, other: AccrualTotal) -> AccrualTotal {
        AccrualTotal {
            amount: self.amount + other.amount,
            occurrences: self.occurrences + other.occurrences,
            truncated: self.truncated || other.truncated,
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    (28..=31)
        .rev()
        .find(|day| NaiveDate::from_ymd_opt(year, month, *day).is_some())
        .unwrap_or(28)
}

/// The date for `day` in the given month, pulled back to the month's last day.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, days_in_month(year, month)))
}

fn day_of_year(year: i32, ordinal: u32) -> Option<NaiveDate> {
    let len = if NaiveDate::from_yo_opt(year, 366).is_some() { 366 } else { 365 };
    NaiveDate::from_yo_opt(year, ordinal.clamp(1, len))
}

fn next_month(date: NaiveDate) -> (i32, u32) {
    if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    }
}

/// When a rule pays out, relative to its effective date.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccrualSchedule {
    pub frequency: AccrualFrequency,
    pub day_of_period: Option<u32>,
    pub effective: NaiveDate,
}

impl AccrualSchedule {
    pub fn for_rule(rule: &AccrualRule) -> Option<Self> {
        Some(AccrualSchedule {
            frequency: rule.frequency,
            day_of_period: rule.day_of_period,
            effective: rule.effective_date()?,
        })
    }

    fn weekly_target(&self) -> u32 {
        self.day_of_period
            .filter(|d| *d < 7)
            .unwrap_or_else(|| self.effective.weekday().num_days_from_sunday())
    }

    fn monthly_target(&self) -> u32 {
        self.day_of_period.unwrap_or_else(|| self.effective.day())
    }

    fn yearly_in(&self, year: i32) -> Option<NaiveDate> {
        match self.day_of_period {
            Some(ordinal) => day_of_year(year, ordinal),
            None => clamped_date(year, self.effective.month(), self.effective.day()),
        }
    }

    /// First occurrence on or after the effective date.
    pub fn first_occurrence(&self) -> Option<NaiveDate> {
        let eff = self.effective;
        match self.frequency {
            AccrualFrequency::Daily => Some(eff),
            AccrualFrequency::Weekly | AccrualFrequency::Biweekly => {
                let current = eff.weekday().num_days_from_sunday();
                let offset = (self.weekly_target() + 7 - current) % 7;
                eff.checked_add_days(Days::new(u64::from(offset)))
            }
            AccrualFrequency::Monthly => {
                let candidate = clamped_date(eff.year(), eff.month(), self.monthly_target())?;
                if candidate >= eff {
                    Some(candidate)
                } else {
                    let (year, month) = next_month(eff);
                    clamped_date(year, month, self.monthly_target())
                }
            }
            AccrualFrequency::Yearly => {
                let candidate = self.yearly_in(eff.year())?;
                if candidate >= eff {
                    Some(candidate)
                } else {
                    self.yearly_in(eff.year() + 1)
                }
            }
        }
    }

    pub fn next_occurrence(&self, current: NaiveDate) -> Option<NaiveDate> {
        match self.frequency {
            AccrualFrequency::Daily => current.succ_opt(),
            AccrualFrequency::Weekly => current.checked_add_days(Days::new(7)),
            AccrualFrequency::Biweekly => current.checked_add_days(Days::new(14)),
            AccrualFrequency::Monthly => {
                let (year, month) = next_month(current);
                clamped_date(year, month, self.monthly_target())
            }
            AccrualFrequency::Yearly => self.yearly_in(current.year() + 1),
        }
    }
}

/// Sums every occurrence of `rule` in [effective date, min(until, end date)].
pub fn accrued_through(rule: &AccrualRule, until: NaiveDate) -> AccrualTotal {
    let mut total = AccrualTotal::default();
    if !rule.active || !rule.amount.is_finite() {
        return total;
    }
    let Some(schedule) = AccrualSchedule::for_rule(rule) else {
        return total;
    };
    let limit = match rule.end() {
        Some(end) => end.min(until),
        None => until,
    };

    let mut iterations = 0u32;
    let mut next = schedule.first_occurrence();
    while let Some(date) = next {
        if date > limit {
            break;
        }
        if iterations >= MAX_ACCRUAL_ITERATIONS {
            warn!(
                "accrual rule '{}' stopped after {} iterations at {}",
                rule.name, MAX_ACCRUAL_ITERATIONS, date
            );
            total.truncated = true;
            break;
        }
        iterations += 1;
        if date >= schedule.effective {
            total.amount += rule.amount;
            total.occurrences += 1;
        }
        next = schedule.next_occurrence(date).filter(|n| *n > date);
    }
    total
}

pub fn accrued_by_rules<'a>(
    rules: impl IntoIterator<Item = &'a AccrualRule>,
    until: NaiveDate,
) -> AccrualTotal {
    rules
        .into_iter()
        .map(|rule| accrued_through(rule, until))
        .fold(AccrualTotal::default(), AccrualTotal::merge)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rule(frequency: AccrualFrequency, amount: f64, start: &str) -> AccrualRule {
        AccrualRule::new("test", amount, frequency, start)
    }

    #[test]
    fn test_monthly_scenario() {
        let r = rule(AccrualFrequency::Monthly, 1.25, "2024-01-15");
        let total = accrued_through(&r, d(2024, 4, 15));
        assert_eq!(total.occurrences, 4);
        assert!((total.amount - 5.0).abs() < 1e-9);
        assert!(!total.truncated);
    }

    #[test]
    fn test_monthly_clamps_to_month_end() {
        let mut r = rule(AccrualFrequency::Monthly, 1.0, "2024-01-01");
        r.day_of_period = Some(31);
        let s = AccrualSchedule::for_rule(&r).unwrap();
        let first = s.first_occurrence().unwrap();
        assert_eq!(first, d(2024, 1, 31));
        let second = s.next_occurrence(first).unwrap();
        assert_eq!(second, d(2024, 2, 29));
        // Returns to the 31st after a short month.
        assert_eq!(s.next_occurrence(second).unwrap(), d(2024, 3, 31));
    }

    #[test]
    fn test_monthly_target_before_effective_rolls_forward() {
        let mut r = rule(AccrualFrequency::Monthly, 1.0, "2024-01-20");
        r.day_of_period = Some(1);
        let s = AccrualSchedule::for_rule(&r).unwrap();
        assert_eq!(s.first_occurrence(), Some(d(2024, 2, 1)));
    }

    #[test]
    fn test_weekly_aligns_to_target_weekday() {
        // 2024-01-03 is a Wednesday; target Friday (5)
        let mut r = rule(AccrualFrequency::Weekly, 1.0, "2024-01-03");
        r.day_of_period = Some(5);
        let s = AccrualSchedule::for_rule(&r).unwrap();
        assert_eq!(s.first_occurrence(), Some(d(2024, 1, 5)));
        assert_eq!(s.next_occurrence(d(2024, 1, 5)), Some(d(2024, 1, 12)));
    }

    #[test]
    fn test_biweekly_uses_effective_weekday_when_unset() {
        let r = rule(AccrualFrequency::Biweekly, 3.0, "2024-01-05");
        let total = accrued_through(&r, d(2024, 2, 16));
        // Jan 5, Jan 19, Feb 2, Feb 16
        assert_eq!(total.occurrences, 4);
        assert!((total.amount - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_yearly_by_day_of_year() {
        let mut r = rule(AccrualFrequency::Yearly, 20.0, "2024-03-01");
        r.day_of_period = Some(1);
        let s = AccrualSchedule::for_rule(&r).unwrap();
        assert_eq!(s.first_occurrence(), Some(d(2025, 1, 1)));
        let total = accrued_through(&r, d(2026, 6, 1));
        assert_eq!(total.occurrences, 2);
    }

    #[test]
    fn test_yearly_leap_day_clamps() {
        let r = rule(AccrualFrequency::Yearly, 1.0, "2024-02-29");
        let s = AccrualSchedule::for_rule(&r).unwrap();
        assert_eq!(s.next_occurrence(d(2024, 2, 29)), Some(d(2025, 2, 28)));
        assert_eq!(s.next_occurrence(d(2027, 2, 28)), Some(d(2028, 2, 29)));
    }

    #[test]
    fn test_daily_respects_end_date() {
        let mut r = rule(AccrualFrequency::Daily, 0.5, "2024-01-01");
        r.end_date = Some("2024-01-10".to_string());
        let total = accrued_through(&r, d(2024, 12, 31));
        assert_eq!(total.occurrences, 10);
        assert!((total.amount - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_target_before_effective_accrues_nothing() {
        let r = rule(AccrualFrequency::Monthly, 1.0, "2024-06-01");
        assert_eq!(accrued_through(&r, d(2024, 5, 31)), AccrualTotal::default());
    }

    #[test]
    fn test_inactive_or_unparseable_rules_accrue_nothing() {
        let mut inactive = rule(AccrualFrequency::Daily, 1.0, "2024-01-01");
        inactive.active = false;
        assert_eq!(accrued_through(&inactive, d(2024, 2, 1)).occurrences, 0);

        let broken = rule(AccrualFrequency::Daily, 1.0, "soon");
        assert_eq!(accrued_through(&broken, d(2024, 2, 1)).occurrences, 0);
    }

    #[test]
    fn test_iteration_cap_truncates() {
        let r = rule(AccrualFrequency::Daily, 1.0, "1990-01-01");
        let total = accrued_through(&r, d(2025, 1, 1));
        assert!(total.truncated);
        assert_eq!(total.occurrences, MAX_ACCRUAL_ITERATIONS);
        assert!((total.amount - MAX_ACCRUAL_ITERATIONS as f64).abs() < 1e-9);
    }

    #[test]
    fn test_accrued_by_rules_merges() {
        let rules = vec![
            rule(AccrualFrequency::Monthly, 1.0, "2024-01-01"),
            rule(AccrualFrequency::Yearly, 5.0, "2024-01-01"),
        ];
        let total = accrued_by_rules(&rules, d(2024, 3, 1));
        assert_eq!(total.occurrences, 4);
        assert!((total.amount - 8.0).abs() < 1e-9);
    }
}
