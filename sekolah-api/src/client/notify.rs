use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Pending,
    Success,
    Error,
}

/// a user facing notification, the terminal equivalent of a toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new<M>(kind: NoticeKind, message: M) -> Self
    where
        M: Into<String>
    {
        Notice {
            kind,
            message: message.into()
        }
    }

    pub fn info<M: Into<String>>(message: M) -> Self {
        Notice::new(NoticeKind::Info, message)
    }

    pub fn pending<M: Into<String>>(message: M) -> Self {
        Notice::new(NoticeKind::Pending, message)
    }

    pub fn success<M: Into<String>>(message: M) -> Self {
        Notice::new(NoticeKind::Success, message)
    }

    pub fn error<M: Into<String>>(message: M) -> Self {
        Notice::new(NoticeKind::Error, message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(pub u64);

/// where notifications go. a pending notice is later replaced through
/// `update` or removed through `dismiss`.
pub trait Notifier: Send + Sync {
    fn show(&self, notice: Notice) -> NoticeId;

    fn update(&self, id: NoticeId, notice: Notice);

    fn dismiss(&self, id: NoticeId);
}

/// sends every notice to the tracing subscriber
#[derive(Debug, Default)]
pub struct TracingNotifier {
    next: AtomicU64,
}

impl TracingNotifier {
    fn log(id: NoticeId, notice: &Notice) {
        match notice.kind {
            NoticeKind::Error => tracing::error!(notice = id.0, "{}", notice.message),
            NoticeKind::Pending => tracing::debug!(notice = id.0, "{}", notice.message),
            NoticeKind::Info |
            NoticeKind::Success => tracing::info!(notice = id.0, "{}", notice.message),
        }
    }
}

impl Notifier for TracingNotifier {
    fn show(&self, notice: Notice) -> NoticeId {
        let id = NoticeId(self.next.fetch_add(1, Ordering::Relaxed));

        Self::log(id, &notice);

        id
    }

    fn update(&self, id: NoticeId, notice: Notice) {
        Self::log(id, &notice);
    }

    fn dismiss(&self, id: NoticeId) {
        tracing::debug!(notice = id.0, "dismissed");
    }
}
