use std::sync::atomic::{AtomicU64, Ordering};

use sekolah_api::client::notify::{Notice, NoticeId, NoticeKind, Notifier};

/// prints notices as lines on the terminal. a pending notice prints nothing
/// until it settles.
#[derive(Debug, Default)]
pub struct TerminalNotifier {
    next: AtomicU64,
}

fn render(notice: &Notice) -> Option<String> {
    match notice.kind {
        NoticeKind::Pending => None,
        NoticeKind::Info => Some(notice.message.clone()),
        NoticeKind::Success => Some(format!("ok: {}", notice.message)),
        NoticeKind::Error => Some(format!("error: {}", notice.message)),
    }
}

fn print(notice: &Notice) {
    if let Some(line) = render(notice) {
        if notice.kind == NoticeKind::Error {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

impl Notifier for TerminalNotifier {
    fn show(&self, notice: Notice) -> NoticeId {
        print(&notice);

        NoticeId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    fn update(&self, _id: NoticeId, notice: Notice) {
        print(&notice);
    }

    fn dismiss(&self, _id: NoticeId) {}
}
