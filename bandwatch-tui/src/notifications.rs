//! Footer notifications.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "INFO",
            NotificationLevel::Warning => "WARN",
            NotificationLevel::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether this is still younger than `ttl` at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at < ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness_expires() {
        let note = Notification::new(NotificationLevel::Warning, "Sample feed closed");
        let ttl = Duration::seconds(5);
        assert!(note.is_fresh(note.created_at, ttl));
        assert!(note.is_fresh(note.created_at + Duration::seconds(4), ttl));
        assert!(!note.is_fresh(note.created_at + Duration::seconds(5), ttl));
    }
}
