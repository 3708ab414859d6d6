use anyhow::{Context, Result};
use std::path::Path;

use crate::status::GoalSummary;

const HEADER: [&str; 9] = [
    "goal_id",
    "name",
    "target_amount",
    "saved",
    "remaining",
    "progress_percent",
    "deadline_date",
    "status",
    "at_risk",
];

/// Write one row per goal. Amounts and percentages are written with two decimals;
/// `remaining` keeps its sign so over-funding stays visible.
pub(crate) fn export_csv(path: &Path, summaries: &[GoalSummary<'_>]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(HEADER)?;

    for summary in summaries {
        let totals = &summary.totals;
        wtr.write_record([
            summary.goal.id.to_string(),
            summary.goal.name.clone(),
            format!("{:.2}", summary.goal.target_amount),
            format!("{:.2}", totals.total_contributed),
            format!("{:.2}", totals.remaining_amount),
            format!("{:.2}", totals.progress_percentage),
            summary.goal.deadline_date.format("%Y-%m-%d").to_string(),
            summary.status.as_str().to_string(),
            summary.at_risk.to_string(),
        ])?;
    }

    wtr.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(summaries.len())
}
