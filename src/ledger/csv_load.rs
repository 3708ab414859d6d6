use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

use super::error::ValidationError;
use super::validate::{ContributionRecord, GoalRecord};
use crate::models::{Contribution, Goal};

/// How to treat rows that fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// The first invalid row aborts the load.
    #[default]
    Strict,
    /// Invalid rows are logged and skipped.
    SkipInvalid,
}

/// A consistent snapshot of goals and their contributions.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub goals: Vec<Goal>,
    pub contributions: Vec<Contribution>,
}

struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
}

struct Row {
    /// Physical line in the file, starting at 1.
    line: u64,
    fields: Vec<String>,
}

impl Table {
    fn read(path: &Path) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let mut all_rows: Vec<Row> = Vec::new();
        for result in rdr.records() {
            let record =
                result.with_context(|| format!("Failed to read CSV record in {}", path.display()))?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            all_rows.push(Row {
                line: record.position().map_or(0, |p| p.line()),
                fields: record.iter().map(|s| s.to_string()).collect(),
            });
        }

        if all_rows.is_empty() {
            anyhow::bail!("{} has no header row", path.display());
        }
        let headers = all_rows
            .remove(0)
            .fields
            .iter()
            .map(|h| h.to_lowercase())
            .collect();

        Ok(Self {
            headers,
            rows: all_rows,
        })
    }

    /// Position of the first header matching any of `names`.
    fn column(&self, names: &[&str]) -> Option<usize> {
        names
            .iter()
            .find_map(|name| self.headers.iter().position(|h| h == name))
    }

    fn required_column(&self, names: &[&str], path: &Path) -> Result<usize> {
        self.column(names).ok_or_else(|| {
            anyhow::anyhow!(
                "{} is missing a '{}' column (found: {})",
                path.display(),
                names[0],
                self.headers.join(", ")
            )
        })
    }
}

fn cell(row: &Row, index: usize) -> &str {
    row.fields.get(index).map(String::as_str).unwrap_or("")
}

/// Load and validate both ledger files. A missing contributions file is
/// treated as an empty ledger; a missing goals file is an error.
pub fn load_ledger(goals_path: &Path, contributions_path: &Path, mode: LoadMode) -> Result<Ledger> {
    let goals = load_goals(goals_path, mode)?;
    let contributions = if contributions_path.exists() {
        load_contributions(contributions_path, mode)?
    } else {
        info!(path = %contributions_path.display(), "no contributions file, assuming none");
        Vec::new()
    };

    let goal_ids: HashSet<i64> = goals.iter().map(|g| g.id).collect();
    for orphan in contributions.iter().filter(|c| !goal_ids.contains(&c.goal_id)) {
        warn!(
            contribution = orphan.id,
            goal = orphan.goal_id,
            "contribution references an unknown goal and will be ignored"
        );
    }

    debug!(
        goals = goals.len(),
        contributions = contributions.len(),
        "ledger loaded"
    );
    Ok(Ledger {
        goals,
        contributions,
    })
}

fn load_goals(path: &Path, mode: LoadMode) -> Result<Vec<Goal>> {
    let table = Table::read(path)?;
    let id_col = table.required_column(&["id", "goal_id"], path)?;
    let name_col = table.required_column(&["name", "goal_name"], path)?;
    let target_col = table.required_column(&["target_amount", "target"], path)?;
    let deadline_col = table.required_column(&["deadline_date", "deadline"], path)?;
    let created_col = table.required_column(&["created_at", "created"], path)?;
    let category_col = table.column(&["category_id", "category"]);

    let mut goals: Vec<Goal> = Vec::with_capacity(table.rows.len());
    let mut seen = HashSet::new();
    for row in &table.rows {
        let record = GoalRecord {
            id: cell(row, id_col),
            name: cell(row, name_col),
            target_amount: cell(row, target_col),
            deadline_date: cell(row, deadline_col),
            created_at: cell(row, created_col),
            category_id: category_col.map(|c| cell(row, c)),
        };

        let validated = record.validate().and_then(|goal| {
            if seen.insert(goal.id) {
                Ok(goal)
            } else {
                Err(ValidationError::InvalidGoalData(format!(
                    "duplicate goal id {}",
                    goal.id
                )))
            }
        });

        match validated {
            Ok(goal) => goals.push(goal),
            Err(e) => reject(path, row.line, e, mode)?,
        }
    }

    Ok(goals)
}

fn load_contributions(path: &Path, mode: LoadMode) -> Result<Vec<Contribution>> {
    let table = Table::read(path)?;
    let id_col = table.required_column(&["id", "contribution_id"], path)?;
    let goal_col = table.required_column(&["goal_id", "goal"], path)?;
    let amount_col = table.required_column(&["amount"], path)?;
    let date_col = table.required_column(&["contribution_date", "date"], path)?;

    let mut contributions = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let record = ContributionRecord {
            id: cell(row, id_col),
            goal_id: cell(row, goal_col),
            amount: cell(row, amount_col),
            contribution_date: cell(row, date_col),
        };

        match record.validate() {
            Ok(contribution) => contributions.push(contribution),
            Err(e) => reject(path, row.line, e, mode)?,
        }
    }

    Ok(contributions)
}

/// `row` is the physical line number, matching what a spreadsheet shows.
fn reject(path: &Path, row: u64, err: ValidationError, mode: LoadMode) -> Result<()> {
    match mode {
        LoadMode::Strict => {
            Err(anyhow::Error::new(err).context(format!("{} row {row}", path.display())))
        }
        LoadMode::SkipInvalid => {
            warn!(path = %path.display(), row, error = %err, "skipping invalid row");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "csv_load_tests.rs"]
mod tests;
