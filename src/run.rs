mod cli;
mod console;

use anyhow::Result;

use crate::db::Database;
use crate::ui::app::App;
use crate::ui::commands;
use crate::ui::surface::Surface;

pub(crate) use cli::as_cli;
pub(crate) use console::ConsoleSurface;

/// Interactive menu on the terminal. The database is closed on the way out,
/// whether the loop ended normally or with an error.
pub(crate) fn as_interactive(mut db: Database) -> Result<()> {
    let mut surface = ConsoleSurface::new();
    let mut app = App::new();
    let result = run_menu(&mut app, &mut db, &mut surface);
    db.close()?;
    result
}

pub(crate) fn run_menu(app: &mut App, db: &mut Database, surface: &mut dyn Surface) -> Result<()> {
    while app.running {
        surface.table(&app.title(), &commands::menu_rows(app));
        match surface.ask_text("Menu", "Choose an action:")? {
            Some(input) => commands::handle_command(&input, app, db, surface)?,
            // Cancelling the menu itself (Esc, Ctrl-D, end of input) leaves.
            None => app.running = false,
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod run_tests;
