#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use super::*;

fn goal_record() -> GoalRecord<'static> {
    GoalRecord {
        id: "12",
        name: "  Emergency fund ",
        target_amount: "$1,500.00",
        deadline_date: "2025-06-30",
        created_at: "2025-01-10T08:15:00Z",
        category_id: Some("4"),
    }
}

fn contribution_record() -> ContributionRecord<'static> {
    ContributionRecord {
        id: "3",
        goal_id: "12",
        amount: "250.25",
        contribution_date: "02/14/2025",
    }
}

fn assert_goal_error(record: GoalRecord<'_>) {
    let result = record.validate();
    assert!(
        matches!(result, Err(ValidationError::InvalidGoalData(_))),
        "expected InvalidGoalData, got {result:?}"
    );
}

fn assert_contribution_error(record: ContributionRecord<'_>) {
    let result = record.validate();
    assert!(
        matches!(result, Err(ValidationError::InvalidContributionData(_))),
        "expected InvalidContributionData, got {result:?}"
    );
}

// ── GoalRecord ────────────────────────────────────────────────

#[test]
fn test_goal_valid() {
    let goal = goal_record().validate().unwrap();
    assert_eq!(goal.id, 12);
    assert_eq!(goal.name, "Emergency fund");
    assert_eq!(goal.target_amount, dec!(1500.00));
    assert_eq!(goal.deadline_date, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
    assert_eq!(goal.created_at, Utc.with_ymd_and_hms(2025, 1, 10, 8, 15, 0).unwrap());
    assert_eq!(goal.category_id, Some(4));
}

#[test]
fn test_goal_optional_category() {
    let goal = GoalRecord {
        category_id: Some(" "),
        ..goal_record()
    }
    .validate()
    .unwrap();
    assert!(goal.category_id.is_none());

    let goal = GoalRecord {
        category_id: None,
        ..goal_record()
    }
    .validate()
    .unwrap();
    assert!(goal.category_id.is_none());
}

#[test]
fn test_goal_rejects_non_positive_target() {
    assert_goal_error(GoalRecord {
        target_amount: "0",
        ..goal_record()
    });
    assert_goal_error(GoalRecord {
        target_amount: "-20",
        ..goal_record()
    });
}

#[test]
fn test_goal_rejects_non_numeric_target() {
    for raw in ["NaN", "inf", "abc", ""] {
        assert_goal_error(GoalRecord {
            target_amount: raw,
            ..goal_record()
        });
    }
}

#[test]
fn test_goal_rejects_bad_dates() {
    assert_goal_error(GoalRecord {
        deadline_date: "someday",
        ..goal_record()
    });
    assert_goal_error(GoalRecord {
        created_at: "",
        ..goal_record()
    });
}

#[test]
fn test_goal_rejects_empty_name_and_bad_id() {
    assert_goal_error(GoalRecord {
        name: "   ",
        ..goal_record()
    });
    assert_goal_error(GoalRecord {
        id: "twelve",
        ..goal_record()
    });
    assert_goal_error(GoalRecord {
        category_id: Some("food"),
        ..goal_record()
    });
}

#[test]
fn test_goal_deadline_before_creation_is_accepted() {
    // Not enforced retroactively; the status engine treats it as at risk.
    let goal = GoalRecord {
        deadline_date: "2024-12-01",
        ..goal_record()
    }
    .validate()
    .unwrap();
    assert!(goal.deadline_instant() < goal.created_at);
}

#[test]
fn test_goal_error_message() {
    let err = GoalRecord {
        target_amount: "0",
        ..goal_record()
    }
    .validate()
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid goal data: goal 12 target amount must be positive, got 0"
    );
}

// ── ContributionRecord ────────────────────────────────────────

#[test]
fn test_contribution_valid() {
    let c = contribution_record().validate().unwrap();
    assert_eq!(c.id, 3);
    assert_eq!(c.goal_id, 12);
    assert_eq!(c.amount, dec!(250.25));
    assert_eq!(c.contribution_date, NaiveDate::from_ymd_opt(2025, 2, 14).unwrap());
}

#[test]
fn test_contribution_rejects_negative_and_zero() {
    assert_contribution_error(ContributionRecord {
        amount: "-5",
        ..contribution_record()
    });
    assert_contribution_error(ContributionRecord {
        amount: "0.00",
        ..contribution_record()
    });
}

#[test]
fn test_contribution_rejects_non_numeric() {
    assert_contribution_error(ContributionRecord {
        amount: "NaN",
        ..contribution_record()
    });
    assert_contribution_error(ContributionRecord {
        amount: "",
        ..contribution_record()
    });
}

#[test]
fn test_contribution_amount_range() {
    let c = ContributionRecord {
        amount: "50,000,000,000,000,000,000,000,000,000",
        ..contribution_record()
    }
    .validate()
    .unwrap();
    assert_eq!(c.amount.to_string(), "50000000000000000000000000000");

    // Beyond what a Decimal can hold.
    assert_contribution_error(ContributionRecord {
        amount: "1000000000000000000000000000000",
        ..contribution_record()
    });
    assert_goal_error(GoalRecord {
        target_amount: "1000000000000000000000000000000",
        ..goal_record()
    });
}

#[test]
fn test_contribution_rejects_bad_refs_and_date() {
    assert_contribution_error(ContributionRecord {
        goal_id: "",
        ..contribution_record()
    });
    assert_contribution_error(ContributionRecord {
        contribution_date: "31/31/2025",
        ..contribution_record()
    });
}

// ── parse_date / parse_timestamp ──────────────────────────────

#[test]
fn test_parse_date_formats() {
    let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    assert_eq!(parse_date("2024-01-15"), Some(expected));
    assert_eq!(parse_date("01/15/2024"), Some(expected));
    assert_eq!(parse_date("01-15-2024"), Some(expected));
    assert_eq!(parse_date(" 2024-01-15 "), Some(expected));
}

#[test]
fn test_parse_date_truncates_timestamp() {
    assert_eq!(
        parse_date("2024-01-15T23:30:00-05:00"),
        NaiveDate::from_ymd_opt(2024, 1, 16)
    );
}

#[test]
fn test_parse_date_invalid() {
    assert!(parse_date("").is_none());
    assert!(parse_date("not a date").is_none());
}

#[test]
fn test_parse_timestamp_formats() {
    let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    assert_eq!(parse_timestamp("2024-03-01T12:00:00Z"), Some(expected));
    assert_eq!(parse_timestamp("2024-03-01T14:00:00+02:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-03-01 12:00:00"), Some(expected));
    assert_eq!(
        parse_timestamp("2024-03-01"),
        Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
    );
}

#[test]
fn test_parse_amount_currency() {
    assert_eq!(parse_amount("$1,234.56").unwrap(), dec!(1234.56));
    assert_eq!(parse_amount("\"100.00\"").unwrap(), dec!(100.00));
    assert!(parse_amount("  ").is_err());
}
