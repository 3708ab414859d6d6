use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::error::{Result, ValidationError};
use crate::models::{Contribution, Goal};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// One goal row as read from the ledger, before validation.
#[derive(Debug, Clone, Default)]
pub struct GoalRecord<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub target_amount: &'a str,
    pub deadline_date: &'a str,
    pub created_at: &'a str,
    pub category_id: Option<&'a str>,
}

impl GoalRecord<'_> {
    pub fn validate(&self) -> Result<Goal> {
        let invalid = ValidationError::InvalidGoalData;

        let id = parse_id(self.id).map_err(|e| invalid(format!("id {e}")))?;
        let name = self.name.trim();
        if name.is_empty() {
            return Err(invalid(format!("goal {id} has an empty name")));
        }

        let target_amount = parse_amount(self.target_amount)
            .map_err(|e| invalid(format!("goal {id} target amount {e}")))?;
        if target_amount <= Decimal::ZERO {
            return Err(invalid(format!(
                "goal {id} target amount must be positive, got {target_amount}"
            )));
        }

        let deadline_date = parse_date(self.deadline_date).ok_or_else(|| {
            invalid(format!("goal {id} deadline '{}' is not a date", self.deadline_date))
        })?;
        let created_at = parse_timestamp(self.created_at).ok_or_else(|| {
            invalid(format!("goal {id} created_at '{}' is not a timestamp", self.created_at))
        })?;

        let category_id = match self.category_id.map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                Some(parse_id(raw).map_err(|e| invalid(format!("goal {id} category {e}")))?)
            }
        };

        Ok(Goal {
            id,
            name: name.to_string(),
            target_amount,
            deadline_date,
            created_at,
            category_id,
        })
    }
}

/// One contribution row as read from the ledger, before validation.
#[derive(Debug, Clone, Default)]
pub struct ContributionRecord<'a> {
    pub id: &'a str,
    pub goal_id: &'a str,
    pub amount: &'a str,
    pub contribution_date: &'a str,
}

impl ContributionRecord<'_> {
    pub fn validate(&self) -> Result<Contribution> {
        let invalid = ValidationError::InvalidContributionData;

        let id = parse_id(self.id).map_err(|e| invalid(format!("id {e}")))?;
        let goal_id =
            parse_id(self.goal_id).map_err(|e| invalid(format!("contribution {id} goal id {e}")))?;

        let amount = parse_amount(self.amount)
            .map_err(|e| invalid(format!("contribution {id} amount {e}")))?;
        if amount <= Decimal::ZERO {
            return Err(invalid(format!(
                "contribution {id} amount must be positive, got {amount}"
            )));
        }

        let contribution_date = parse_date(self.contribution_date).ok_or_else(|| {
            invalid(format!(
                "contribution {id} date '{}' is not a date",
                self.contribution_date
            ))
        })?;

        Ok(Contribution {
            id,
            goal_id,
            amount,
            contribution_date,
        })
    }
}

fn parse_id(s: &str) -> std::result::Result<i64, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("is missing".into());
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| format!("'{trimmed}' is not an integer"))
}

/// Parse a money amount, tolerating a currency sign and thousands separators.
/// Non-numeric values such as `NaN` or `inf` are rejected.
fn parse_amount(s: &str) -> std::result::Result<Decimal, String> {
    let cleaned = s.replace(['$', ',', '"'], "").trim().to_string();
    if cleaned.is_empty() {
        return Err("is missing".into());
    }
    Decimal::from_str(&cleaned).map_err(|_| format!("'{}' is not a number", s.trim()))
}

/// Parse a calendar date in ISO or one of the common US/EU layouts.
/// A full timestamp is accepted and truncated to its date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| parse_timestamp(trimmed).map(|ts| ts.date_naive()))
}

/// Parse an RFC 3339 timestamp, a naive `YYYY-MM-DD HH:MM:SS` (read as UTC),
/// or a bare ISO date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Some(ts) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
