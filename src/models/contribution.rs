use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Goal;

#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub id: i64,
    pub goal_id: i64,
    pub amount: Decimal,
    pub contribution_date: NaiveDate,
}

impl Contribution {
    pub fn belongs_to(&self, goal: &Goal) -> bool {
        self.goal_id == goal.id
    }

    /// Contributions for one goal, oldest first. Ties keep ledger order.
    pub fn history_for<'a>(
        contributions: &'a [Contribution],
        goal: &Goal,
    ) -> Vec<&'a Contribution> {
        let mut history: Vec<&Contribution> =
            contributions.iter().filter(|c| c.belongs_to(goal)).collect();
        history.sort_by_key(|c| c.contribution_date);
        history
    }
}
