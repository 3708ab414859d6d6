use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

/// A savings goal as supplied by the ledger. Never mutated by the status engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub deadline_date: NaiveDate,
    /// Start of the savings window.
    pub created_at: DateTime<Utc>,
    pub category_id: Option<i64>,
}

impl Goal {
    /// The deadline as an instant: midnight UTC at the start of `deadline_date`.
    pub fn deadline_instant(&self) -> DateTime<Utc> {
        self.deadline_date.and_time(NaiveTime::MIN).and_utc()
    }

    /// Find a goal by ID in a slice.
    pub fn find_by_id(goals: &[Goal], id: i64) -> Option<&Goal> {
        goals.iter().find(|g| g.id == id)
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
