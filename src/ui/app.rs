use crate::ledger::Session;

/// Which actions a menu command may run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    /// Only before logging in (create account, log in).
    Guest,
    /// Only with an authenticated session.
    User,
    Any,
}

impl Access {
    pub(crate) fn allows(self, logged_in: bool) -> bool {
        match self {
            Self::Guest => !logged_in,
            Self::User => logged_in,
            Self::Any => true,
        }
    }
}

/// Menu state: unauthenticated until a login succeeds, then bound to that
/// user's session until exit.
pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) session: Option<Session>,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            session: None,
        }
    }

    pub(crate) fn logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub(crate) fn title(&self) -> String {
        match &self.session {
            Some(session) => format!("Personal Finance Tracker ({})", session.username()),
            None => "Finance Tracker Login".to_string(),
        }
    }
}
