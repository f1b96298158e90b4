use std::sync::OnceLock;

use gem_session::SessionView;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::ui;

pub struct Progress {
    bar: Option<ProgressBar>,
}

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(MultiProgress::new)
}

/// Run `f` with any visible spinner hidden, so printed output stays intact.
pub fn suspend<R>(f: impl FnOnce() -> R) -> R {
    multi_progress().suspend(f)
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = multi_progress().add(ProgressBar::new_spinner());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Spinner label for whichever busy flag the view carries.
#[must_use]
pub const fn busy_label(view: &SessionView) -> Option<&'static str> {
    if view.is_loading_database {
        Some("Loading DB...")
    } else if view.is_translating {
        Some("Thinking...")
    } else if view.is_executing_query {
        Some("Running query...")
    } else {
        None
    }
}

/// Show a spinner while the session reports a busy flag.
///
/// The task ends when the session is dropped.
pub fn follow(mut rx: watch::Receiver<SessionView>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut shown: Option<(&'static str, Progress)> = None;
        loop {
            let label = busy_label(&rx.borrow_and_update());
            let unchanged = matches!((&shown, label), (Some((current, _)), Some(next)) if *current == next);
            if !unchanged {
                if let Some((_, spinner)) = shown.take() {
                    spinner.finish_clear();
                }
                shown = label.map(|label| (label, Progress::spinner(label)));
            }

            if rx.changed().await.is_err() {
                break;
            }
        }
        if let Some((_, spinner)) = shown {
            spinner.finish_clear();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_label_follows_flags() {
        let mut view = SessionView::initial(true);
        assert_eq!(busy_label(&view), None);

        view.is_executing_query = true;
        assert_eq!(busy_label(&view), Some("Running query..."));

        view.is_translating = true;
        assert_eq!(busy_label(&view), Some("Thinking..."));

        view.is_loading_database = true;
        assert_eq!(busy_label(&view), Some("Loading DB..."));
    }

    #[test]
    fn spinner_is_inert_without_terminal() {
        let progress = Progress::spinner("Loading DB...");
        assert!(progress.bar.is_none());
        progress.finish_clear();
    }
}
