//! Goal progress aggregation and health classification.
//!
//! Everything here is a pure function of its inputs. List, detail, report and
//! export views all go through [`evaluate`] so that thresholds live in one place.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{Contribution, Goal};

const SECONDS_PER_WEEK: i64 = 7 * 24 * 60 * 60;
/// Progress (in percent) at which an unfinished goal counts as on track.
const ON_TRACK_PERCENT: Decimal = Decimal::from_parts(70, 0, 0, false, 0);
/// How much faster than planned a saver may need to go before a goal is at risk.
const AT_RISK_PACE_FACTOR: Decimal = Decimal::TWO;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoalStatus {
    Completed,
    Overdue,
    OnTrack,
    AtRisk,
    InProgress,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Overdue => "Overdue",
            Self::OnTrack => "On track",
            Self::AtRisk => "At risk",
            Self::InProgress => "In progress",
        }
    }

    /// Parse a user-supplied status filter. Accepts the display labels,
    /// kebab/snake variants and their Spanish equivalents.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "completed" | "complete" | "done" | "completada" => Some(Self::Completed),
            "overdue" | "vencida" => Some(Self::Overdue),
            "on track" | "ontrack" | "bien encaminada" => Some(Self::OnTrack),
            "at risk" | "atrisk" | "risk" | "en riesgo" => Some(Self::AtRisk),
            "in progress" | "inprogress" | "en progreso" => Some(Self::InProgress),
            _ => None,
        }
    }

    /// All statuses in classification priority order.
    pub fn all() -> &'static [GoalStatus] {
        &[
            Self::Completed,
            Self::Overdue,
            Self::OnTrack,
            Self::AtRisk,
            Self::InProgress,
        ]
    }

    /// One-line note shown under a goal's detail and in reports.
    pub fn summary_message(&self) -> &'static str {
        match self {
            Self::Completed => "Congratulations! You have reached this goal.",
            Self::Overdue => "This goal is past its deadline. Consider adjusting your plan.",
            Self::AtRisk => {
                "You would need more than twice the planned weekly pace to finish on time."
            }
            Self::OnTrack | Self::InProgress => {
                "Keep saving to reach this goal before the deadline."
            }
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalTotals {
    pub total_contributed: Decimal,
    /// Signed: negative when the goal is over-funded.
    pub remaining_amount: Decimal,
    pub progress_percentage: Decimal,
}

/// Planned versus currently required saving pace, per week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyPace {
    pub planned: Decimal,
    pub required: Decimal,
    pub remaining_weeks: Decimal,
}

/// Everything a view needs to render one goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalSummary<'a> {
    pub goal: &'a Goal,
    pub totals: GoalTotals,
    pub status: GoalStatus,
    pub at_risk: bool,
}

/// Sum the contributions that belong to `goal` and derive remaining amount
/// and progress. Contributions for other goals are ignored; amounts are
/// assumed to have been validated by the caller. Sums saturate at the
/// `Decimal` bounds.
pub fn compute_totals(goal: &Goal, contributions: &[Contribution]) -> GoalTotals {
    let total_contributed: Decimal = contributions
        .iter()
        .filter(|c| c.belongs_to(goal))
        .fold(Decimal::ZERO, |acc, c| acc.saturating_add(c.amount));

    GoalTotals {
        total_contributed,
        remaining_amount: goal.target_amount.saturating_sub(total_contributed),
        progress_percentage: progress_percentage(goal.target_amount, total_contributed),
    }
}

/// `total / target * 100`, or zero when there is no positive target.
/// Saturates at `Decimal::MAX`.
pub fn progress_percentage(target_amount: Decimal, total_contributed: Decimal) -> Decimal {
    if target_amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    total_contributed
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(target_amount))
        // Scaling first keeps precision; dividing first only when that overflows.
        .or_else(|| {
            total_contributed
                .checked_div(target_amount)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        })
        .unwrap_or(Decimal::MAX)
}

/// Weekly pace for a goal that still has time left and a non-empty savings
/// window. `None` when either span is zero or negative. A pace too large to
/// represent saturates at `Decimal::MAX`.
pub fn weekly_pace(
    goal: &Goal,
    total_contributed: Decimal,
    now: DateTime<Utc>,
) -> Option<WeeklyPace> {
    let deadline = goal.deadline_instant();
    let remaining_weeks = weeks_between(now, deadline);
    let total_weeks = weeks_between(goal.created_at, deadline);
    if remaining_weeks <= Decimal::ZERO || total_weeks <= Decimal::ZERO {
        return None;
    }

    let remaining_amount = goal.target_amount.saturating_sub(total_contributed);
    let planned = per_week(goal.target_amount, total_weeks);
    let required = per_week(remaining_amount, remaining_weeks);
    Some(WeeklyPace {
        planned,
        required,
        remaining_weeks,
    })
}

/// A goal is at risk when no time is left, when its savings window is empty,
/// or when finishing on time now needs more than twice the planned pace.
pub fn is_at_risk(goal: &Goal, total_contributed: Decimal, now: DateTime<Utc>) -> bool {
    match weekly_pace(goal, total_contributed, now) {
        Some(pace) => pace.required > pace.planned.saturating_mul(AT_RISK_PACE_FACTOR),
        None => true,
    }
}

/// Classify a goal. Rules are checked in priority order and the first match wins.
pub fn classify(goal: &Goal, total_contributed: Decimal, now: DateTime<Utc>) -> GoalStatus {
    let progress = progress_percentage(goal.target_amount, total_contributed);

    if progress >= Decimal::ONE_HUNDRED {
        GoalStatus::Completed
    } else if now > goal.deadline_instant() {
        GoalStatus::Overdue
    } else if progress >= ON_TRACK_PERCENT {
        GoalStatus::OnTrack
    } else if is_at_risk(goal, total_contributed, now) {
        GoalStatus::AtRisk
    } else {
        GoalStatus::InProgress
    }
}

pub fn evaluate<'a>(
    goal: &'a Goal,
    contributions: &[Contribution],
    now: DateTime<Utc>,
) -> GoalSummary<'a> {
    let totals = compute_totals(goal, contributions);
    GoalSummary {
        goal,
        totals,
        status: classify(goal, totals.total_contributed, now),
        at_risk: is_at_risk(goal, totals.total_contributed, now),
    }
}

/// `amount / weeks` for a positive `weeks`, saturating toward the sign of `amount`.
fn per_week(amount: Decimal, weeks: Decimal) -> Decimal {
    amount.checked_div(weeks).unwrap_or(if amount.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

fn weeks_between(from: DateTime<Utc>, to: DateTime<Utc>) -> Decimal {
    Decimal::from((to - from).num_seconds()) / Decimal::from(SECONDS_PER_WEEK)
}
