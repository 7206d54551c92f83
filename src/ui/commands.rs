use std::collections::HashMap;
use std::sync::LazyLock;

use anyhow::Result;
use chrono::Datelike;

use super::app::{Access, App};
use super::surface::Surface;
use super::util::{format_amount, truncate};
use crate::credentials;
use crate::db::Database;
use crate::error::LedgerError;
use crate::ledger::{self, Session};
use crate::report;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) access: Access,
    pub(crate) run: fn(&mut App, &mut Database, &mut dyn Surface) -> Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $access:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                access: $access,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("create", "Create account", Access::Guest, cmd_create, r);
    register_command!("c", "Create account", Access::Guest, cmd_create, r);
    register_command!("login", "Log in", Access::Guest, cmd_login, r);
    register_command!("l", "Log in", Access::Guest, cmd_login, r);
    register_command!("log", "Log transaction", Access::User, cmd_log, r);
    register_command!("t", "Log transaction", Access::User, cmd_log, r);
    register_command!("show", "Show transactions", Access::User, cmd_show, r);
    register_command!("s", "Show transactions", Access::User, cmd_show, r);
    register_command!("monthly", "Monthly spendings by category", Access::User, cmd_monthly, r);
    register_command!("m", "Monthly spendings by category", Access::User, cmd_monthly, r);
    register_command!("salary", "Add monthly salary", Access::User, cmd_salary, r);
    register_command!("a", "Add monthly salary", Access::User, cmd_salary, r);
    register_command!("savings", "Show savings", Access::User, cmd_savings, r);
    register_command!("v", "Show savings", Access::User, cmd_savings, r);
    register_command!("help", "Show available commands", Access::Any, cmd_help, r);
    register_command!("h", "Show available commands", Access::Any, cmd_help, r);
    register_command!("exit", "Save and exit", Access::Any, cmd_exit, r);
    register_command!("quit", "Save and exit", Access::Any, cmd_exit, r);
    register_command!("q", "Save and exit", Access::Any, cmd_exit, r);

    r
});

/// Menu entries in display order, each with its one-letter alias.
const MENU: &[(&str, &str)] = &[
    ("create", "c"),
    ("login", "l"),
    ("log", "t"),
    ("show", "s"),
    ("monthly", "m"),
    ("salary", "a"),
    ("savings", "v"),
    ("help", "h"),
    ("exit", "q"),
];

/// The menu lines for the current state.
pub(crate) fn menu_rows(app: &App) -> Vec<String> {
    MENU.iter()
        .filter_map(|(name, alias)| {
            let cmd = COMMANDS.get(name)?;
            cmd.access
                .allows(app.logged_in())
                .then(|| format!("  {name:<9} ({alias})  {}", cmd.description))
        })
        .collect()
}

/// Run one menu action. Expected failures are shown to the user and leave
/// the menu state as it was; nothing here ends the session except `exit`.
pub(crate) fn handle_command(
    input: &str,
    app: &mut App,
    db: &mut Database,
    surface: &mut dyn Surface,
) -> Result<()> {
    let cmd_name = input.trim().to_lowercase();
    if cmd_name.is_empty() {
        return Ok(());
    }

    let Some(cmd) = COMMANDS.get(cmd_name.as_str()) else {
        let suggestion = find_closest(&cmd_name, app);
        surface.error(
            "Unknown command",
            &format!("'{cmd_name}'. Did you mean '{suggestion}'?"),
        );
        return Ok(());
    };

    if !cmd.access.allows(app.logged_in()) {
        let reason = if app.logged_in() {
            "You are already logged in"
        } else {
            "Please log in first"
        };
        surface.error("Not available", reason);
        return Ok(());
    }

    if let Err(e) = (cmd.run)(app, db, surface) {
        report_failure(&e, surface);
    }
    Ok(())
}

fn report_failure(e: &anyhow::Error, surface: &mut dyn Surface) {
    match e.downcast_ref::<LedgerError>() {
        Some(err) if !err.is_internal() => {
            tracing::debug!(error = %err, "command rejected");
            surface.error("Error", &err.to_string());
        }
        _ => {
            tracing::error!(error = format!("{e:#}"), "command failed");
            surface.error("Error", &format!("{e:#}"));
        }
    }
}

fn find_closest(input: &str, app: &App) -> String {
    MENU.iter()
        .map(|(name, _)| *name)
        .filter(|name| {
            COMMANDS
                .get(name)
                .is_some_and(|c| c.access.allows(app.logged_in()))
        })
        .min_by_key(|name| levenshtein(input, name))
        .unwrap_or("help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn session_mut(app: &mut App) -> Result<&mut Session> {
    app.session
        .as_mut()
        .ok_or_else(|| anyhow::anyhow!("Please log in first"))
}

fn cancelled(surface: &mut dyn Surface) -> Result<()> {
    surface.info("Cancelled", "Nothing was changed");
    Ok(())
}

fn cmd_create(_app: &mut App, db: &mut Database, surface: &mut dyn Surface) -> Result<()> {
    const TITLE: &str = "Create User";
    let Some(username) = surface.ask_text(TITLE, "Enter your username:")? else {
        return cancelled(surface);
    };
    if username.trim().is_empty() {
        return Err(LedgerError::validation("Username cannot be empty").into());
    }

    // Keep asking until the password meets the policy or the user gives up.
    let password = loop {
        let Some(password) = surface.ask_secret(TITLE, "Enter your password:")? else {
            return cancelled(surface);
        };
        match credentials::validate_password(&password) {
            Ok(()) => break password,
            Err(e) => surface.error(TITLE, &e.to_string()),
        }
    };

    let Some(income) = surface.ask_amount(TITLE, "Enter your income:")? else {
        return cancelled(surface);
    };

    let user = ledger::create_account(db, &username, &password, income)?;
    surface.info(
        TITLE,
        &format!("Account '{}' created successfully!", user.username),
    );
    Ok(())
}

fn cmd_login(app: &mut App, db: &mut Database, surface: &mut dyn Surface) -> Result<()> {
    let Some(username) = surface.ask_text("Login", "Enter your username:")? else {
        return cancelled(surface);
    };
    let Some(password) = surface.ask_secret("Login", "Enter your password:")? else {
        return cancelled(surface);
    };

    let session = ledger::authenticate(db, &username, &password)?;
    surface.info(
        "Login",
        &format!(
            "Welcome, {}! Remaining income: {}",
            session.username(),
            format_amount(session.income())
        ),
    );
    app.session = Some(session);
    Ok(())
}

fn cmd_log(app: &mut App, db: &mut Database, surface: &mut dyn Surface) -> Result<()> {
    const TITLE: &str = "Transaction";
    let session = session_mut(app)?;
    let Some(amount) = surface.ask_amount(TITLE, "Enter amount:")? else {
        return cancelled(surface);
    };
    // Reject before asking for the category.
    session.check_spend(amount)?;

    let Some(category) = surface.ask_text(
        TITLE,
        "Enter expense category (e.g., FOOD, HOUSING, TRANSPORTATION):",
    )?
    else {
        return cancelled(surface);
    };

    let txn = session.log_transaction(db, amount, &category)?;
    let message = format!(
        "Transaction logged successfully! {} in {}",
        format_amount(txn.amount),
        txn.category
    );
    surface.info(TITLE, &message);
    Ok(())
}

fn cmd_show(app: &mut App, _db: &mut Database, surface: &mut dyn Surface) -> Result<()> {
    let session = session_mut(app)?;
    let mut rows: Vec<String> = session
        .history()
        .iter()
        .map(|t| {
            format!(
                "{}  {:>14}  {}",
                t.date.format("%Y-%m-%d %H:%M:%S"),
                format_amount(t.amount),
                truncate(&t.category, 32)
            )
        })
        .collect();
    if rows.is_empty() {
        rows.push("No transactions yet".to_string());
    }
    rows.push(format!("Remaining Income: {}", format_amount(session.income())));

    surface.table(&format!("Transactions for {}", session.username()), &rows);
    Ok(())
}

fn cmd_monthly(app: &mut App, db: &mut Database, surface: &mut dyn Surface) -> Result<()> {
    let session = session_mut(app)?;
    let Some(input) = surface.ask_text(
        "Monthly Spendings",
        "Month (YYYY-MM, blank for current month):",
    )?
    else {
        return cancelled(surface);
    };
    let (year, month) = if input.trim().is_empty() {
        let now = chrono::Local::now();
        (now.year(), now.month())
    } else {
        report::parse_month(&input)?
    };

    let totals = report::monthly_category_totals(db, session.username(), year, month)?;
    let mut rows: Vec<String> = totals
        .iter()
        .map(|(category, total)| format!("{:<32} {:>14}", truncate(category, 32), format_amount(*total)))
        .collect();
    if rows.is_empty() {
        rows.push("No spending recorded".to_string());
    }

    surface.table(
        &format!(
            "Monthly Spendings for {} ({year:04}-{month:02})",
            session.username()
        ),
        &rows,
    );
    Ok(())
}

fn cmd_salary(app: &mut App, db: &mut Database, surface: &mut dyn Surface) -> Result<()> {
    const TITLE: &str = "Add Monthly Salary";
    let session = session_mut(app)?;
    let Some(amount) = surface.ask_amount(TITLE, "Enter your monthly salary:")? else {
        return cancelled(surface);
    };
    let income = session.add_income(db, amount)?;
    surface.info(
        TITLE,
        &format!(
            "Monthly salary added successfully! Remaining income: {}",
            format_amount(income)
        ),
    );
    Ok(())
}

fn cmd_savings(app: &mut App, _db: &mut Database, surface: &mut dyn Surface) -> Result<()> {
    let session = session_mut(app)?;
    surface.info(
        &format!("Savings for {}", session.username()),
        &format!("Total Savings: {}", format_amount(report::total_savings(session))),
    );
    Ok(())
}

fn cmd_help(app: &mut App, _db: &mut Database, surface: &mut dyn Surface) -> Result<()> {
    surface.table("Commands", &menu_rows(app));
    Ok(())
}

fn cmd_exit(app: &mut App, _db: &mut Database, _surface: &mut dyn Surface) -> Result<()> {
    app.running = false;
    Ok(())
}
