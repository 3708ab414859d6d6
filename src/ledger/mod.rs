mod csv_load;
mod error;
mod validate;

pub use csv_load::{load_ledger, Ledger, LoadMode};
pub use validate::{parse_date, parse_timestamp};
