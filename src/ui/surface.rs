use anyhow::Result;
use rust_decimal::Decimal;

use super::util::parse_amount;

/// The request/response boundary between the ledger and whatever presents
/// it. Every prompt returns `None` when the user cancels; callers must then
/// abandon the operation without writing anything.
pub(crate) trait Surface {
    fn ask_text(&mut self, title: &str, prompt: &str) -> Result<Option<String>>;

    /// Like `ask_text` but the input is not echoed.
    fn ask_secret(&mut self, title: &str, prompt: &str) -> Result<Option<String>>;

    /// Non-numeric input is a validation error, not a cancel.
    fn ask_amount(&mut self, title: &str, prompt: &str) -> Result<Option<Decimal>> {
        match self.ask_text(title, prompt)? {
            Some(input) => Ok(Some(parse_amount(&input)?)),
            None => Ok(None),
        }
    }

    fn info(&mut self, title: &str, message: &str);

    fn error(&mut self, title: &str, message: &str);

    fn table(&mut self, title: &str, rows: &[String]);
}

/// Replays canned answers and records everything shown.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct ScriptedSurface {
    answers: std::collections::VecDeque<Option<String>>,
    pub(crate) output: Vec<String>,
}

#[cfg(test)]
impl ScriptedSurface {
    pub(crate) fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|a| a.map(Into::into)).collect(),
            output: Vec::new(),
        }
    }

    /// Answers given as plain strings; none of them cancels.
    pub(crate) fn answering(answers: &[&str]) -> Self {
        Self::new(answers.iter().map(|a| Some(*a)))
    }

    pub(crate) fn errors(&self) -> Vec<&str> {
        self.output
            .iter()
            .filter_map(|line| line.strip_prefix("[error] "))
            .collect()
    }

    pub(crate) fn printed(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }

    fn next(&mut self) -> Option<String> {
        self.answers.pop_front().flatten()
    }
}

#[cfg(test)]
impl Surface for ScriptedSurface {
    fn ask_text(&mut self, _title: &str, _prompt: &str) -> Result<Option<String>> {
        Ok(self.next())
    }

    fn ask_secret(&mut self, _title: &str, _prompt: &str) -> Result<Option<String>> {
        Ok(self.next())
    }

    fn info(&mut self, title: &str, message: &str) {
        self.output.push(format!("[info] {title}: {message}"));
    }

    fn error(&mut self, title: &str, message: &str) {
        self.output.push(format!("[error] {title}: {message}"));
    }

    fn table(&mut self, title: &str, rows: &[String]) {
        self.output.push(format!("[table] {title}"));
        self.output.extend(rows.iter().cloned());
    }
}
