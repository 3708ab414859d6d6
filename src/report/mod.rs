mod export;
mod format;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::{self, Write};

use crate::ledger::Ledger;
use crate::models::{Contribution, Goal};
use crate::status::{self, GoalStatus, GoalSummary};

pub(crate) use export::export_csv;
use format::{format_amount, format_percent, progress_bar, truncate};

const NAME_WIDTH: usize = 24;
const BAR_WIDTH: usize = 20;

/// How many goals landed in one status, and their rounded share of all goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StatusCount {
    pub(crate) status: GoalStatus,
    pub(crate) count: usize,
    pub(crate) share_percent: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct PortfolioReport<'a> {
    pub(crate) summaries: Vec<GoalSummary<'a>>,
    pub(crate) breakdown: Vec<StatusCount>,
    pub(crate) total_target: Decimal,
    pub(crate) total_saved: Decimal,
}

/// Evaluate every goal in the ledger, in ledger order.
pub(crate) fn summarize(ledger: &Ledger, now: DateTime<Utc>) -> Vec<GoalSummary<'_>> {
    ledger
        .goals
        .iter()
        .map(|goal| status::evaluate(goal, &ledger.contributions, now))
        .collect()
}

pub(crate) fn filter_by_status<'a>(
    summaries: Vec<GoalSummary<'a>>,
    wanted: Option<GoalStatus>,
) -> Vec<GoalSummary<'a>> {
    match wanted {
        Some(status) => summaries.into_iter().filter(|s| s.status == status).collect(),
        None => summaries,
    }
}

/// Per-status counts in priority order. Shares round half up and are zero
/// when there are no goals.
pub(crate) fn status_breakdown(summaries: &[GoalSummary<'_>]) -> Vec<StatusCount> {
    let total = summaries.len();
    GoalStatus::all()
        .iter()
        .map(|&status| {
            let count = summaries.iter().filter(|s| s.status == status).count();
            let share_percent = if total == 0 {
                0
            } else {
                (count * 200 + total) / (2 * total)
            };
            StatusCount {
                status,
                count,
                share_percent,
            }
        })
        .collect()
}

pub(crate) fn build_report<'a>(ledger: &'a Ledger, now: DateTime<Utc>) -> PortfolioReport<'a> {
    let summaries = summarize(ledger, now);
    let breakdown = status_breakdown(&summaries);
    let total_target = summaries
        .iter()
        .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.goal.target_amount));
    let total_saved = summaries
        .iter()
        .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.totals.total_contributed));
    PortfolioReport {
        summaries,
        breakdown,
        total_target,
        total_saved,
    }
}

pub(crate) fn render_list(out: &mut impl Write, summaries: &[GoalSummary<'_>]) -> fmt::Result {
    if summaries.is_empty() {
        return writeln!(out, "No goals");
    }

    writeln!(
        out,
        "{:<4} {:<NAME_WIDTH$} {:<22} {:>7} {:>14} {:>14} {:<10}  Status",
        "ID", "Name", "Progress", "", "Saved", "Remaining", "Deadline"
    )?;
    writeln!(out, "{}", "─".repeat(110))?;
    for summary in summaries {
        let totals = &summary.totals;
        writeln!(
            out,
            "{:<4} {:<NAME_WIDTH$} {:<22} {:>7} {:>14} {:>14} {:<10}  {}",
            summary.goal.id,
            truncate(&summary.goal.name, NAME_WIDTH),
            progress_bar(totals.progress_percentage, BAR_WIDTH),
            format_percent(totals.progress_percentage),
            format_amount(totals.total_contributed),
            format_amount(totals.remaining_amount.max(Decimal::ZERO)),
            summary.goal.deadline_date.format("%Y-%m-%d"),
            summary.status,
        )?;
    }
    Ok(())
}

pub(crate) fn render_detail(
    out: &mut impl Write,
    goal: &Goal,
    contributions: &[Contribution],
    now: DateTime<Utc>,
) -> fmt::Result {
    let summary = status::evaluate(goal, contributions, now);
    let totals = &summary.totals;

    writeln!(out, "{} (#{})", goal.name, goal.id)?;
    writeln!(out, "{}", "─".repeat(40))?;
    writeln!(out, "  Status:     {}", summary.status)?;
    writeln!(out, "  Target:     {}", format_amount(goal.target_amount))?;
    writeln!(out, "  Saved:      {}", format_amount(totals.total_contributed))?;
    writeln!(
        out,
        "  Remaining:  {}",
        format_amount(totals.remaining_amount.max(Decimal::ZERO))
    )?;
    writeln!(
        out,
        "  Progress:   {} {}",
        progress_bar(totals.progress_percentage, BAR_WIDTH),
        format_percent(totals.progress_percentage)
    )?;
    writeln!(out, "  Created:    {}", goal.created_at.format("%Y-%m-%d"))?;
    writeln!(out, "  Deadline:   {}", goal.deadline_date.format("%Y-%m-%d"))?;
    if let Some(category) = goal.category_id {
        writeln!(out, "  Category:   {category}")?;
    }

    if summary.status != GoalStatus::Completed {
        match status::weekly_pace(goal, totals.total_contributed, now) {
            Some(pace) => {
                writeln!(out, "  Weeks left: {:.1}", pace.remaining_weeks)?;
                writeln!(
                    out,
                    "  Pace:       {}/week needed, {}/week planned",
                    format_amount(pace.required.max(Decimal::ZERO)),
                    format_amount(pace.planned)
                )?;
            }
            None => {
                writeln!(out, "  Weeks left: 0")?;
            }
        }
    }

    let history = Contribution::history_for(contributions, goal);
    writeln!(out)?;
    if history.is_empty() {
        writeln!(out, "No contributions yet")?;
    } else {
        writeln!(out, "Contributions:")?;
        for c in &history {
            writeln!(
                out,
                "  {}  {:>14}",
                c.contribution_date.format("%Y-%m-%d"),
                format_amount(c.amount)
            )?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{}% of \"{}\" saved. {}",
        totals
            .progress_percentage
            .min(Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        goal.name,
        summary.status.summary_message()
    )?;
    Ok(())
}

pub(crate) fn render_report(
    out: &mut impl Write,
    report: &PortfolioReport<'_>,
    now: DateTime<Utc>,
) -> fmt::Result {
    writeln!(out, "Savings report — {}", now.format("%Y-%m-%d"))?;
    writeln!(out, "{}", "─".repeat(40))?;
    writeln!(out, "  Goals:      {}", report.summaries.len())?;
    writeln!(out, "  Target:     {}", format_amount(report.total_target))?;
    writeln!(out, "  Saved:      {}", format_amount(report.total_saved))?;
    writeln!(
        out,
        "  Overall:    {}",
        format_percent(status::progress_percentage(
            report.total_target,
            report.total_saved
        ))
    )?;

    writeln!(out)?;
    writeln!(out, "By status:")?;
    for entry in &report.breakdown {
        writeln!(
            out,
            "  {:<12} {:>4}  {:>3}%",
            entry.status.as_str(),
            entry.count,
            entry.share_percent
        )?;
    }

    let attention: Vec<&GoalSummary<'_>> = report
        .summaries
        .iter()
        .filter(|s| matches!(s.status, GoalStatus::AtRisk | GoalStatus::Overdue))
        .collect();
    if !attention.is_empty() {
        writeln!(out)?;
        writeln!(out, "Needs attention:")?;
        for s in attention {
            writeln!(
                out,
                "  #{:<4} {:<NAME_WIDTH$} {}",
                s.goal.id,
                truncate(&s.goal.name, NAME_WIDTH),
                s.status
            )?;
        }
    }
    Ok(())
}
