use std::sync::atomic::{AtomicBool, Ordering};

pub use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Notify;

/// Cancellation signal shared between the Ctrl-C handler and long waits.
#[derive(Debug, Default)]
pub struct Interrupt {
    triggered: AtomicBool,
    notify: Notify,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Resolves once [`Interrupt::trigger`] has been called.
    pub async fn triggered(&self) {
        loop {
            // register before checking the flag so a concurrent trigger is not missed
            let notified = self.notify.notified();
            if self.is_triggered() {
                return;
            }
            notified.await;
        }
    }
}

/// Current UNIX timestamp in seconds.
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn spinner_with_style() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(120);
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "▹▹▹▹▹",
                "▸▹▹▹▹",
                "▹▸▹▹▹",
                "▹▹▸▹▹",
                "▹▹▹▸▹",
                "▹▹▹▹▸",
                "▪▪▪▪▪",
            ])
            .template("{spinner:.dim} {msg}"),
    );
    pb
}
