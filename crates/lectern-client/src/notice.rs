//! Transient user-facing notices.

use serde::Serialize;
use std::time::Duration;

/// How long a notice stays up.
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

/// A message shown briefly and dismissed automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u128(d.as_millis())
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: DEFAULT_NOTICE_DURATION,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether the notice is still shown `elapsed` after it appeared.
    pub fn is_visible(&self, elapsed: Duration) -> bool {
        elapsed < self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_dismiss() {
        let notice = Notice::success("Successfully signed in!");
        assert_eq!(notice.duration, Duration::from_millis(3000));
        assert!(notice.is_visible(Duration::ZERO));
        assert!(notice.is_visible(Duration::from_millis(2999)));
        assert!(!notice.is_visible(Duration::from_millis(3000)));
    }

    #[test]
    fn test_serializes_duration_in_millis() {
        let value = serde_json::to_value(Notice::error("nope")).unwrap();
        assert_eq!(value["kind"], "error");
        assert_eq!(value["duration"], 3000);
    }
}
