use anyhow::Result;
use crossterm::cursor::MoveLeft;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use crossterm::tty::IsTty;
use std::io::{self, BufRead, Write};

use crate::ui::surface::Surface;

/// Line-oriented terminal surface. On a TTY input is read key by key so Esc
/// can cancel and secrets are masked; piped input falls back to plain lines,
/// where end of input cancels.
pub(crate) struct ConsoleSurface {
    tty: bool,
}

impl ConsoleSurface {
    pub(crate) fn new() -> Self {
        Self {
            tty: io::stdin().is_tty(),
        }
    }

    fn read(&mut self, title: &str, prompt: &str, masked: bool) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "[{title}] {prompt} ")?;
        stdout.flush()?;

        if !self.tty {
            return read_plain_line();
        }

        enable_raw_mode()?;
        let result = read_key_line(&mut stdout, masked);
        disable_raw_mode()?;
        writeln!(stdout)?;
        result
    }
}

fn read_plain_line() -> Result<Option<String>> {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn read_key_line(stdout: &mut io::Stdout, masked: bool) -> Result<Option<String>> {
    let mut input = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(Some(input)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char('c') | KeyCode::Char('d')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                return Ok(None)
            }
            KeyCode::Backspace => {
                if input.pop().is_some() {
                    execute!(stdout, MoveLeft(1), Clear(ClearType::UntilNewLine))?;
                }
            }
            KeyCode::Char(c) => {
                input.push(c);
                write!(stdout, "{}", if masked { '*' } else { c })?;
                stdout.flush()?;
            }
            _ => {}
        }
    }
}

impl Surface for ConsoleSurface {
    fn ask_text(&mut self, title: &str, prompt: &str) -> Result<Option<String>> {
        self.read(title, prompt, false)
    }

    fn ask_secret(&mut self, title: &str, prompt: &str) -> Result<Option<String>> {
        self.read(title, prompt, true)
    }

    fn info(&mut self, title: &str, message: &str) {
        println!("{title}: {message}");
    }

    fn error(&mut self, title: &str, message: &str) {
        println!("Error ({title}): {message}");
    }

    fn table(&mut self, title: &str, rows: &[String]) {
        println!();
        println!("{title}");
        println!("{}", "─".repeat(title.chars().count().max(40)));
        for row in rows {
            println!("  {row}");
        }
    }
}
