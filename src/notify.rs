//! Notification collaborator: progress, success and error messages
//! surfaced to the user during an export run.
//!
//! A progress notice stays up until a terminal notice with the same
//! correlation id replaces it in place.

use log::{error, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Progress,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Correlates a terminal notice with the progress notice it replaces.
    pub id: Uuid,
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn progress(id: Uuid, message: impl Into<String>) -> Self {
        Notice { id, kind: NoticeKind::Progress, message: message.into() }
    }

    pub fn success(id: Uuid, message: impl Into<String>) -> Self {
        Notice { id, kind: NoticeKind::Success, message: message.into() }
    }

    pub fn error(id: Uuid, message: impl Into<String>) -> Self {
        Notice { id, kind: NoticeKind::Error, message: message.into() }
    }
}

pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Routes notices to the log. The CLI's default collaborator.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Progress => info!("[{}] {}", notice.id, notice.message),
            NoticeKind::Success => info!("[{}] {}", notice.id, notice.message),
            NoticeKind::Error => error!("[{}] {}", notice.id, notice.message),
        }
    }
}

/// Discards everything. For callers that manage their own reporting.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notice: Notice) {}
}
