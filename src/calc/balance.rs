use crate::calc::accrual::{accrued_by_rules, clamped_date};
use crate::data::{AccrualRule, LeaveEntry, LeaveSettings};
use chrono::{Datelike, NaiveDate};

/// Balance breakdown as of one date, in the configured tracking unit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BalanceProjection {
    pub initial: f64,
    pub accrued: f64,
    pub used: f64,
    /// Forfeited at renewal boundaries because it exceeded the carry-over limit.
    pub carry_over_loss: f64,
    pub balance: f64,
    /// An accrual rule hit the iteration cap; `accrued` is partial.
    pub truncated: bool,
}

/// Leave booked strictly before `before`, ignoring cancelled entries.
pub fn used_before(entries: &[LeaveEntry], before: NaiveDate) -> f64 {
    entries
        .iter()
        .filter(|e| e.is_effective())
        .filter(|e| e.parsed_date().is_some_and(|d| d < before))
        .fold(0.0, |acc, e| acc + e.amount)
}

/// Leave booked on or after `from`, ignoring cancelled entries.
pub fn booked_from(entries: &[LeaveEntry], from: NaiveDate) -> f64 {
    entries
        .iter()
        .filter(|e| e.is_effective())
        .filter(|e| e.parsed_date().is_some_and(|d| d >= from))
        .fold(0.0, |acc, e| acc + e.amount)
}

/// Every anniversary of `renewal` in (start, target].
pub fn renewal_boundaries(
    start: NaiveDate,
    target: NaiveDate,
    renewal: NaiveDate,
) -> Vec<NaiveDate> {
    if start >= target {
        return Vec::new();
    }
    (start.year()..=target.year())
        .filter_map(|year| clamped_date(year, renewal.month(), renewal.day()))
        .filter(|b| *b > start && *b <= target)
        .collect()
}

fn carry_over_loss(
    target: NaiveDate,
    settings: &LeaveSettings,
    rules: &[AccrualRule],
    entries: &[LeaveEntry],
) -> f64 {
    let (Some(limit), Some(renewal), Some(start)) = (
        settings.carry_over_limit,
        settings.renewal(),
        settings.start_date(),
    ) else {
        return 0.0;
    };

    let mut loss = 0.0;
    for boundary in renewal_boundaries(start, target, renewal) {
        let accrued = boundary
            .pred_opt()
            .map_or(0.0, |eve| accrued_by_rules(rules, eve).amount);
        let before_reset =
            settings.initial_balance + accrued - used_before(entries, boundary) - loss;
        if before_reset > limit {
            loss += before_reset - limit;
        }
    }
    loss
}

pub fn balance_as_of(
    target: NaiveDate,
    settings: &LeaveSettings,
    rules: &[AccrualRule],
    entries: &[LeaveEntry],
) -> BalanceProjection {
    let accrual = accrued_by_rules(rules, target);
    let used = used_before(entries, target);
    let loss = carry_over_loss(target, settings, rules, entries);

    let mut balance = settings.initial_balance + accrual.amount - used - loss;
    if let Some(max) = settings.max_balance {
        balance = balance.min(max);
    }

    BalanceProjection {
        initial: settings.initial_balance,
        accrued: accrual.amount,
        used,
        carry_over_loss: loss,
        balance,
        truncated: accrual.truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AccrualFrequency, TrackingUnit};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn settings(initial: f64) -> LeaveSettings {
        LeaveSettings {
            initial_balance: initial,
            pto_start_date: Some("2024-01-01".to_string()),
            ..LeaveSettings::default()
        }
    }

    #[test]
    fn test_initial_plus_accrued_minus_used() {
        let rules = vec![AccrualRule::new(
            "Monthly",
            1.25,
            AccrualFrequency::Monthly,
            "2024-01-15",
        )];
        let entries = vec![
            LeaveEntry::new("2024-02-01", 1.0),
            LeaveEntry::new("2024-04-15", 1.0), // on the target date: not yet used
        ];
        let p = balance_as_of(d(2024, 4, 15), &settings(2.0), &rules, &entries);
        assert!((p.accrued - 5.0).abs() < 1e-9);
        assert!((p.used - 1.0).abs() < 1e-9);
        assert!((p.balance - 6.0).abs() < 1e-9);
        assert!(!p.truncated);
    }

    #[test]
    fn test_used_before_empty_is_positive_zero() {
        let used = used_before(&[], d(2025, 1, 1));
        assert_eq!(format!("{used:.2}"), "0.00");
        assert!(used.is_sign_positive());
    }

    #[test]
    fn test_booked_from_counts_today_and_later() {
        let entries = vec![
            LeaveEntry::new("2024-12-31", 1.0),
            LeaveEntry::new("2025-01-01", 1.0),
            LeaveEntry::new("2025-03-03", 1.0),
            LeaveEntry {
                cancelled: true,
                ..LeaveEntry::new("2025-03-04", 1.0)
            },
        ];
        assert_eq!(booked_from(&entries, d(2025, 1, 1)), 2.0);
        assert_eq!(used_before(&entries, d(2025, 1, 1)), 1.0);
    }

    #[test]
    fn test_cancelled_entries_are_ignored() {
        let entries = vec![
            LeaveEntry::new("2024-02-01", 1.0),
            LeaveEntry {
                cancelled: true,
                ..LeaveEntry::new("2024-02-02", 1.0)
            },
        ];
        assert!((used_before(&entries, d(2024, 3, 1)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_balance_can_go_negative() {
        let entries: Vec<LeaveEntry> = (5..=9)
            .map(|day| LeaveEntry::new(&format!("2024-02-0{day}"), 1.0))
            .collect();
        let p = balance_as_of(d(2024, 3, 1), &settings(2.0), &[], &entries);
        assert!((p.balance + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_carry_over_scenario() {
        let s = LeaveSettings {
            carry_over_limit: Some(5.0),
            renewal_date: Some("2024-06-01".to_string()),
            ..settings(10.0)
        };
        let p = balance_as_of(d(2025, 6, 1), &s, &[], &[]);
        assert!((p.carry_over_loss - 5.0).abs() < 1e-9);
        assert!((p.balance - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_carry_over_only_counts_before_reset() {
        // 10 days carried into the first reset, 12 accrued the year after.
        let s = LeaveSettings {
            carry_over_limit: Some(5.0),
            renewal_date: Some("2025-01-01".to_string()),
            ..settings(10.0)
        };
        let rules = vec![AccrualRule::new("Monthly", 1.0, AccrualFrequency::Monthly, "2025-01-15")];
        let p = balance_as_of(d(2025, 12, 31), &s, &rules, &[]);
        assert!((p.carry_over_loss - 5.0).abs() < 1e-9);
        assert!((p.balance - 17.0).abs() < 1e-9);

        // At the next reset the 17 on hand is cut back to 5.
        let p = balance_as_of(d(2026, 1, 1), &s, &rules, &[]);
        assert!((p.carry_over_loss - 17.0).abs() < 1e-9);
        assert!((p.balance - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_carry_over_without_limit() {
        let s = LeaveSettings {
            renewal_date: Some("2024-06-01".to_string()),
            ..settings(10.0)
        };
        let p = balance_as_of(d(2025, 6, 1), &s, &[], &[]);
        assert_eq!(p.carry_over_loss, 0.0);
        assert_eq!(p.balance, 10.0);
    }

    #[test]
    fn test_max_balance_caps() {
        let s = LeaveSettings {
            max_balance: Some(8.0),
            ..settings(10.0)
        };
        assert_eq!(balance_as_of(d(2024, 6, 1), &s, &[], &[]).balance, 8.0);
    }

    #[test]
    fn test_renewal_boundaries_window() {
        let b = renewal_boundaries(d(2024, 6, 1), d(2026, 6, 1), d(2020, 6, 1));
        assert_eq!(b, vec![d(2025, 6, 1), d(2026, 6, 1)]);
        assert!(renewal_boundaries(d(2026, 1, 1), d(2025, 1, 1), d(2020, 6, 1)).is_empty());
        let leap = renewal_boundaries(d(2024, 1, 1), d(2025, 12, 31), d(2024, 2, 29));
        assert_eq!(leap, vec![d(2024, 2, 29), d(2025, 2, 28)]);
    }

    #[test]
    fn test_hour_tracking_converts_to_days() {
        let s = LeaveSettings {
            unit: TrackingUnit::Hours,
            hours_per_day: 8.0,
            ..settings(20.0)
        };
        let p = balance_as_of(d(2024, 6, 1), &s, &[], &[LeaveEntry::new("2024-03-01", 8.0)]);
        assert_eq!(p.balance, 12.0);
        assert_eq!(s.to_days(p.balance), 1.5);
    }
}
