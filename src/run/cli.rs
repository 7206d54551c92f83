use anyhow::{Context, Result};
use chrono::Datelike;
use std::path::PathBuf;

use crate::db::Database;
use crate::export;
use crate::ledger::{self, Session};
use crate::report;
use crate::ui::surface::Surface;
use crate::ui::util::format_amount;

/// Non-interactive commands. `args` holds the command and its arguments,
/// without the binary name or global flags.
pub(crate) fn as_cli(args: &[String], db: &mut Database, surface: &mut dyn Surface) -> Result<()> {
    let Some((command, rest)) = args.split_first() else {
        print_usage();
        return Ok(());
    };
    match command.as_str() {
        "summary" | "s" => cli_summary(rest, db, surface),
        "export" => cli_export(rest, db, surface),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("finledger {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("finledger - local-only personal finance ledger");
    println!();
    println!("Usage: finledger [--db <path>] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch the interactive menu");
    println!("  summary <user> [YYYY-MM]      Print balance and monthly spending (default: current month)");
    println!("  export <user> [path]          Export a user's transactions to CSV");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Environment:");
    println!("  FINLEDGER_DB                  Database file (overridden by --db)");
    println!("  FINLEDGER_LOG                 Log filter, e.g. info or finledger=debug");
}

/// Prompt for the password of `username` and open their session.
fn login(username: &str, db: &Database, surface: &mut dyn Surface) -> Result<Session> {
    let password = surface
        .ask_secret("Login", &format!("Password for {username}:"))?
        .ok_or_else(|| anyhow::anyhow!("Login cancelled"))?;
    Ok(ledger::authenticate(db, username, &password)?)
}

fn cli_summary(args: &[String], db: &mut Database, surface: &mut dyn Surface) -> Result<()> {
    let username = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: finledger summary <user> [YYYY-MM]"))?;
    let (year, month) = match args.get(1) {
        Some(m) => report::parse_month(m)?,
        None => {
            let now = chrono::Local::now();
            (now.year(), now.month())
        }
    };

    let session = login(username, db, surface)?;
    let rows = summary_rows(db, &session, year, month)?;
    surface.table(&format!("finledger - {username} - {year:04}-{month:02}"), &rows);
    Ok(())
}

pub(crate) fn summary_rows(
    db: &Database,
    session: &Session,
    year: i32,
    month: u32,
) -> Result<Vec<String>> {
    let spending = report::monthly_category_totals(db, session.username(), year, month)?;
    let txn_count = db.get_transaction_count(session.username())?;

    let mut rows = vec![
        format!("Remaining Income: {}", format_amount(session.income())),
        format!("Total Savings:    {}", format_amount(report::total_savings(session))),
        format!("Total Txns:       {txn_count}"),
    ];
    if !spending.is_empty() {
        rows.push(String::new());
        rows.push("Spending by Category:".to_string());
        for (name, amount) in &spending {
            rows.push(format!("  {name:<24} {}", format_amount(*amount)));
        }
    }
    Ok(rows)
}

fn cli_export(args: &[String], db: &mut Database, surface: &mut dyn Surface) -> Result<()> {
    let username = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: finledger export <user> [path]"))?;
    let output_path = args
        .get(1)
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(format!("finledger-{username}.csv"))
        });

    let session = login(username, db, surface)?;
    let count = export::write_csv(&output_path, session.history())
        .with_context(|| format!("Failed to export to {}", output_path.display()))?;
    if count == 0 {
        surface.info("Export", &format!("No transactions for {username}"));
    } else {
        surface.info(
            "Export",
            &format!("Exported {count} transactions to {}", output_path.display()),
        );
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
