//! Transient notifications
//!
//! Time is passed in by the caller as milliseconds since an arbitrary epoch
//! (`Date.now()` in the browser), which keeps the queue free of timers.

use subsmania_http::ClientError;

/// How long a toast stays up unless the queue says otherwise
pub const DEFAULT_DURATION_MS: u64 = 3_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastKind {
    #[default]
    Success,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    pub created_at_ms: u64,
    pub duration_ms: u64,
}

impl Toast {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at_ms) >= self.duration_ms
    }
}

/// Visible toasts in insertion order
#[derive(Debug)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
    duration_ms: u64,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::with_duration(DEFAULT_DURATION_MS)
    }
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(duration_ms: u64) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 0,
            duration_ms,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind, now_ms: u64) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            message: message.into(),
            kind,
            created_at_ms: now_ms,
            duration_ms: self.duration_ms,
        });
        id
    }

    /// Error toast for a failed call, e.g. "Failed to save: Email already in use"
    pub fn push_error(&mut self, context: &str, error: &ClientError, now_ms: u64) -> ToastId {
        self.push(
            format!("{context}: {}", error.user_message()),
            ToastKind::Error,
            now_ms,
        )
    }

    /// Returns whether a toast was removed
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    /// Drop every toast whose time is up; returns how many went
    pub fn expire(&mut self, now_ms: u64) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|toast| !toast.is_expired(now_ms));
        before - self.toasts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_insertion_order() {
        let mut queue = ToastQueue::new();
        queue.push("saved", ToastKind::Success, 0);
        queue.push("failed", ToastKind::Error, 10);
        let messages: Vec<_> = queue.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, ["saved", "failed"]);
    }

    #[test]
    fn test_expires_after_default_duration() {
        let mut queue = ToastQueue::new();
        queue.push("first", ToastKind::default(), 1_000);
        queue.push("second", ToastKind::default(), 2_500);

        assert_eq!(queue.expire(3_999), 0);
        assert_eq!(queue.expire(4_000), 1);
        assert_eq!(queue.iter().next().unwrap().message, "second");
        assert_eq!(queue.expire(10_000), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dismiss_removes_only_that_toast() {
        let mut queue = ToastQueue::with_duration(500);
        let a = queue.push("a", ToastKind::Success, 0);
        let b = queue.push("b", ToastKind::Success, 0);

        assert!(queue.dismiss(a));
        assert!(!queue.dismiss(a));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next().unwrap().id, b);
    }

    #[test]
    fn test_error_toast_carries_server_message() {
        let mut queue = ToastQueue::new();
        let error = ClientError::Http {
            status: subsmania_http::client::StatusCode::CONFLICT,
            body: r#"{"message":"Email already in use"}"#.to_string(),
        };
        queue.push_error("Sign-up failed", &error, 0);

        let toast = queue.iter().next().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Sign-up failed: Email already in use");
    }
}
