use crate::data::persistence::Persistable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccrualFrequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl std::fmt::Display for AccrualFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccrualFrequency::Daily => write!(f, "daily"),
            AccrualFrequency::Weekly => write!(f, "weekly"),
            AccrualFrequency::Biweekly => write!(f, "biweekly"),
            AccrualFrequency::Monthly => write!(f, "monthly"),
            AccrualFrequency::Yearly => write!(f, "yearly"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AccrualRule {
    pub name: String,
    /// Amount credited per occurrence, in the configured tracking unit.
    pub amount: f64,
    pub frequency: AccrualFrequency,
    /// Weekday (0 = Sunday) for weekly rules, day of month for monthly rules,
    /// day of year for yearly rules. Unset means "same as the start date".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_period: Option<u32>,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl AccrualRule {
    pub fn new(name: &str, amount: f64, frequency: AccrualFrequency, start_date: &str) -> Self {
        AccrualRule {
            name: name.to_string(),
            amount,
            frequency,
            day_of_period: None,
            start_date: start_date.to_string(),
            end_date: None,
            active: true,
        }
    }

    pub fn effective_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d").ok()
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct AccrualRuleData {
    pub rules: Vec<AccrualRule>,
}

impl Persistable for AccrualRuleData {
    fn filename() -> &'static str {
        "accrual_rules.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl AccrualRuleData {
    pub fn add(&mut self, rule: AccrualRule) {
        self.rules.push(rule);
    }

    pub fn active(&self) -> impl Iterator<Item = &AccrualRule> {
        self.rules.iter().filter(|r| r.active)
    }
}
