//! User-visible notices

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::{Mutex, PoisonError},
};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// The action completed.
    Success,

    /// Neutral information.
    Info,

    /// Something was adjusted on the user's behalf.
    Warning,

    /// The action was rejected.
    Error,
}

impl NoticeLevel {
    /// Short label used when printing notices.
    pub fn label(self) -> &'static str {
        match self {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

/// A non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,

    /// Message text
    pub message: String,
}

impl Notice {
    /// Create a success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Create an informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Create a warning notice.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// Create an error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[{}] {}", self.level.label(), self.message)
    }
}

/// Sink for user-visible notices.
pub trait Notifier: Send + Sync {
    /// Deliver a notice to the user.
    fn notify(&self, notice: Notice);
}

/// Collects notices in memory until they are drained.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every collected notice, leaving the log empty.
    pub fn drain(&self) -> Vec<Notice> {
        let mut notices = self.notices.lock().unwrap_or_else(PoisonError::into_inner);

        std::mem::take(&mut *notices)
    }

    /// Copy of the collected notices.
    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of collected notices at the given level.
    pub fn count(&self, level: NoticeLevel) -> usize {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|notice| notice.level == level)
            .count()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_log() {
        let log = NoticeLog::new();

        log.notify(Notice::success("Added Milk to cart"));
        log.notify(Notice::error("Invalid product data"));

        let drained = log.drain();

        assert_eq!(drained.len(), 2, "both notices should be drained");
        assert!(log.snapshot().is_empty(), "log should be empty after drain");
    }

    #[test]
    fn count_filters_by_level() {
        let log = NoticeLog::new();

        log.notify(Notice::warning("one"));
        log.notify(Notice::warning("two"));
        log.notify(Notice::info("three"));

        assert_eq!(log.count(NoticeLevel::Warning), 2);
        assert_eq!(log.count(NoticeLevel::Info), 1);
        assert_eq!(log.count(NoticeLevel::Error), 0);
    }

    #[test]
    fn display_includes_level_label() {
        assert_eq!(Notice::error("nope").to_string(), "[error] nope");
    }
}
