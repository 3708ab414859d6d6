use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::{expand_home, Config};
use crate::ledger::{self, Ledger};
use crate::models::Goal;
use crate::report;
use crate::status::GoalStatus;

pub(crate) fn as_cli(args: &[String], config: &Config) -> Result<()> {
    let command = args.first().map(String::as_str).unwrap_or("list");
    let rest = args.get(1..).unwrap_or_default();
    debug!(command, now = %config.now, data_dir = %config.data_dir.display(), "running command");

    match command {
        "list" | "ls" => cli_list(rest, config),
        "show" => cli_show(rest, config),
        "report" | "r" => cli_report(config),
        "export" => cli_export(rest, config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("savetrack {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("savetrack — savings goal progress tracker");
    println!();
    println!("Usage: savetrack [options] [command]");
    println!();
    println!("Commands:");
    println!("  list                          List goals with progress and status (default)");
    println!("    --status <status>           Only goals with this status");
    println!("                                (completed, overdue, on-track, at-risk, in-progress)");
    println!("  show <goal-id>                Show one goal and its contributions");
    println!("  report                        Print a status report across all goals");
    println!("  export [path]                 Export goal progress to CSV");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Options:");
    println!("  --data-dir <dir>              Directory holding goals.csv and contributions.csv");
    println!("                                (env: SAVETRACK_DATA_DIR)");
    println!("  --now <date>                  Evaluate goals as of this date (env: SAVETRACK_NOW)");
    println!("  --skip-invalid                Skip invalid ledger rows instead of failing");
}

fn load(config: &Config) -> Result<Ledger> {
    let goals_path = config.goals_path();
    if !goals_path.exists() {
        anyhow::bail!(
            "No goals file at {}. Create one or pass --data-dir <dir>",
            goals_path.display()
        );
    }
    ledger::load_ledger(&goals_path, &config.contributions_path(), config.load_mode)
}

fn cli_list(args: &[String], config: &Config) -> Result<()> {
    let wanted = match args.windows(2).find(|w| w[0] == "--status") {
        Some(w) => Some(
            GoalStatus::parse(&w[1]).ok_or_else(|| anyhow::anyhow!("Unknown status: {}", w[1]))?,
        ),
        None if args.iter().any(|a| a == "--status") => {
            anyhow::bail!("Usage: savetrack list [--status <status>]")
        }
        None => None,
    };

    let ledger = load(config)?;
    let summaries = report::filter_by_status(report::summarize(&ledger, config.now), wanted);

    let mut out = String::new();
    report::render_list(&mut out, &summaries)?;
    print!("{out}");
    Ok(())
}

fn cli_show(args: &[String], config: &Config) -> Result<()> {
    let raw_id = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: savetrack show <goal-id>"))?;
    let id: i64 = raw_id
        .parse()
        .with_context(|| format!("Goal id must be a number, got '{raw_id}'"))?;

    let ledger = load(config)?;
    let goal = Goal::find_by_id(&ledger.goals, id)
        .ok_or_else(|| anyhow::anyhow!("Goal {id} not found"))?;

    let mut out = String::new();
    report::render_detail(&mut out, goal, &ledger.contributions, config.now)?;
    print!("{out}");
    Ok(())
}

fn cli_report(config: &Config) -> Result<()> {
    let ledger = load(config)?;
    let report = report::build_report(&ledger, config.now);

    let mut out = String::new();
    report::render_report(&mut out, &report, config.now)?;
    print!("{out}");
    Ok(())
}

fn cli_export(args: &[String], config: &Config) -> Result<()> {
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| PathBuf::from(expand_home(a)))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(format!(
                "{home}/savetrack-report-{}.csv",
                config.now.format("%Y-%m-%d")
            ))
        });

    let ledger = load(config)?;
    let summaries = report::summarize(&ledger, config.now);
    let count = report::export_csv(&output_path, &summaries)?;
    info!(path = %output_path.display(), goals = count, "exported report");
    if count == 0 {
        println!("No goals to export");
    } else {
        println!("Exported {count} goals to {}", output_path.display());
    }
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
