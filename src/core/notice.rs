use std::fmt;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Short user-facing message about a wallet or transaction outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, description)
    }

    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, description)
    }

    fn new(level: NoticeLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Logs the notice and prints it to stderr.
    pub fn emit(&self) {
        match self.level {
            NoticeLevel::Success => info!(event = "notice", title = %self.title, message = %self.description),
            NoticeLevel::Warning => warn!(event = "notice", title = %self.title, message = %self.description),
            NoticeLevel::Error => error!(event = "notice", title = %self.title, message = %self.description),
        }
        eprintln!("{}", self);
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.level {
            NoticeLevel::Success => "[ok]",
            NoticeLevel::Warning => "[!]",
            NoticeLevel::Error => "[x]",
        };
        write!(f, "{} {}: {}", marker, self.title, self.description)
    }
}
