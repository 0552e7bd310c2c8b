//! Command-line companion for the goals database.
//!
//! # Responsibility
//! - Probe `monthgoal_core` linkage (`version`).
//! - Back up and restore a database file through the JSON interchange format.
//! - Print the plain-text month report.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use monthgoal_core::{export_json, import_json, render_month_report, GoalStore, YearMonth};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "monthgoal")]
#[command(about = "MonthGoal database tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prints core ping and version.
    Version,
    /// Writes every record of DB to FILE as JSON.
    Export { db: PathBuf, file: PathBuf },
    /// Reads FILE into DB, merging by id unless --replace is given.
    Import {
        db: PathBuf,
        file: PathBuf,
        #[arg(long, default_value_t = false)]
        replace: bool,
    },
    /// Prints the report for MONTH (`YYYY-MM`).
    Report { db: PathBuf, month: String },
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Command::Version) {
        Command::Version => {
            println!("monthgoal_core ping={}", monthgoal_core::ping());
            println!("monthgoal_core version={}", monthgoal_core::core_version());
        }
        Command::Export { db, file } => {
            let store = open_store(&db)?;
            let text = export_json(&store).context("export failed")?;
            fs::write(&file, text)
                .with_context(|| format!("failed to write `{}`", file.display()))?;
            println!("exported to {}", file.display());
        }
        Command::Import { db, file, replace } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            let mut store = open_store(&db)?;
            let result = import_json(&mut store, &text, replace);
            println!("{}", result.message);
            for error in &result.errors {
                println!("  {error}");
            }
            if !result.success {
                bail!("import failed");
            }
        }
        Command::Report { db, month } => {
            let month = parse_month(&month)?;
            let store = open_store(&db)?;
            let goals = store.list_goals_for_month(month)?;
            let text = match store.find_review(month)? {
                Some(review) => {
                    let finals = store.final_check_ins_for_review(review.id)?;
                    render_month_report(month, &goals, Some((&review, finals.as_slice())))
                }
                None => render_month_report(month, &goals, None),
            };
            print!("{text}");
        }
    }
    Ok(())
}

fn open_store(db: &Path) -> Result<GoalStore> {
    GoalStore::open(db).with_context(|| format!("failed to open database `{}`", db.display()))
}

fn parse_month(raw: &str) -> Result<YearMonth> {
    let (year, month) = raw
        .trim()
        .split_once('-')
        .ok_or_else(|| anyhow!("month must look like YYYY-MM, got `{raw}`"))?;
    let year = year.parse::<i32>().context("invalid year")?;
    let month = month.parse::<u32>().context("invalid month")?;
    YearMonth::new(year, month).ok_or_else(|| anyhow!("`{raw}` is not a supported month"))
}

#[cfg(test)]
mod tests {
    use super::{parse_month, run, Cli, Command};
    use clap::Parser;
    use std::ffi::OsStr;

    #[test]
    fn parse_month_accepts_padded_and_rejects_garbage() {
        let month = parse_month("2025-07").unwrap();
        assert_eq!((month.year, month.month), (2025, 7));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("July").is_err());
        assert!(parse_month("3000000-01").is_err());
    }

    #[test]
    fn import_flag_parses() {
        let cli = Cli::parse_from(["monthgoal", "import", "a.db", "b.json", "--replace"]);
        assert!(matches!(cli.command, Some(Command::Import { replace: true, .. })));
    }

    #[test]
    fn export_then_import_into_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.db");
        let target = dir.path().join("target.db");
        let backup = dir.path().join("backup.json");

        run(Cli::parse_from([
            OsStr::new("monthgoal"),
            OsStr::new("export"),
            source.as_os_str(),
            backup.as_os_str(),
        ]))
        .unwrap();
        run(Cli::parse_from([
            OsStr::new("monthgoal"),
            OsStr::new("import"),
            target.as_os_str(),
            backup.as_os_str(),
        ]))
        .unwrap();

        let missing = dir.path().join("missing.json");
        assert!(run(Cli::parse_from([
            OsStr::new("monthgoal"),
            OsStr::new("import"),
            target.as_os_str(),
            missing.as_os_str(),
        ]))
        .is_err());
    }
}
