use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use std::path::PathBuf;

use crate::ledger::{self, LoadMode};

const DATA_DIR_ENV: &str = "SAVETRACK_DATA_DIR";
const NOW_ENV: &str = "SAVETRACK_NOW";

/// Runtime settings. Flags win over environment, environment over defaults.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    /// The instant every goal is evaluated against.
    pub(crate) now: DateTime<Utc>,
    pub(crate) load_mode: LoadMode,
}

impl Config {
    pub(crate) fn goals_path(&self) -> PathBuf {
        self.data_dir.join("goals.csv")
    }

    pub(crate) fn contributions_path(&self) -> PathBuf {
        self.data_dir.join("contributions.csv")
    }

    /// Pull global flags out of `args` and return the config plus the
    /// remaining command arguments.
    pub(crate) fn from_args(args: &[String]) -> Result<(Self, Vec<String>)> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    fn resolve(
        args: &[String],
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(Self, Vec<String>)> {
        let mut data_dir_flag = None;
        let mut now_flag = None;
        let mut load_mode = LoadMode::Strict;
        let mut rest = Vec::new();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--data-dir" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--data-dir needs a directory"))?;
                    data_dir_flag = Some(value.clone());
                }
                "--now" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--now needs a date"))?;
                    now_flag = Some(value.clone());
                }
                "--skip-invalid" => load_mode = LoadMode::SkipInvalid,
                _ => rest.push(arg.clone()),
            }
        }

        let data_dir = match data_dir_flag.or_else(|| env(DATA_DIR_ENV)) {
            Some(dir) => PathBuf::from(expand_home(&dir)),
            None => default_data_dir()?,
        };

        let now = match now_flag.or_else(|| env(NOW_ENV)) {
            Some(raw) => parse_now(&raw).with_context(|| format!("Invalid --now value '{raw}'"))?,
            None => Utc::now(),
        };

        Ok((
            Self {
                data_dir,
                now,
                load_mode,
            },
            rest,
        ))
    }
}

/// A full timestamp, or a date meaning midnight UTC at its start.
fn parse_now(raw: &str) -> Result<DateTime<Utc>> {
    ledger::parse_timestamp(raw)
        .or_else(|| ledger::parse_date(raw).map(|d| d.and_time(NaiveTime::MIN).and_utc()))
        .ok_or_else(|| anyhow::anyhow!("expected a date like 2024-07-01 or an RFC 3339 timestamp"))
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "savetrack", "savetrack")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

pub(crate) fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
