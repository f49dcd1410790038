//! User-facing error reporting.
//!
//! Failures inside the augmentation layer must never reach the host. They are shown as a
//! single transient notice (a new report replaces the previous notice) and logged with
//! their full source chain.

use std::{
    cell::{Cell, RefCell},
    error::Error,
    fmt,
    rc::Rc,
    time::Duration,
};

use lens_host::{Notice, Notifier};
use tracing::error;

/// Name shown at the start of every notice.
pub const NOTICE_PREFIX: &str = "Search context";

/// Shows failures to the user and writes them to the log.
pub struct ErrorReporter {
    /// The host's notification surface.
    notifier: Rc<dyn Notifier>,
    /// How long each notice stays up.
    timeout: Duration,
    /// The notice this reporter showed last.
    current: RefCell<Option<Rc<Notice>>>,
    /// Failures reported so far.
    reported: Cell<usize>,
}

impl ErrorReporter {
    /// Creates a reporter that shows notices for `timeout`.
    pub fn new(notifier: Rc<dyn Notifier>, timeout: Duration) -> Self {
        Self {
            notifier,
            timeout,
            current: RefCell::new(None),
            reported: Cell::new(0),
        }
    }

    /// Reports `err` that happened while doing `context`.
    pub fn report(&self, err: &(dyn Error + 'static), context: &str) {
        self.reported.set(self.reported.get() + 1);
        error!(context, error = %err, chain = %chain(err), "augmentation failure");

        let message = notice_message(context);
        let previous = self.current.take();
        if let Some(previous) = previous {
            previous.hide();
        }
        let notice = self.notifier.notify(&message, self.timeout);
        // The notifier may have reported through us; whatever it showed is displaced.
        if let Some(displaced) = self.current.replace(Some(notice)) {
            displaced.hide();
        }
    }

    /// Number of failures reported so far.
    pub fn reported(&self) -> usize {
        self.reported.get()
    }

    /// Hides the notice currently shown, if any.
    pub fn dismiss(&self) {
        if let Some(notice) = self.current.take() {
            notice.hide();
        }
    }
}

impl fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorReporter")
            .field("timeout", &self.timeout)
            .field("reported", &self.reported.get())
            .finish()
    }
}

/// Formats the notice text for a failure context.
pub fn notice_message(context: &str) -> String {
    format!(
        "{NOTICE_PREFIX}: {context}. Please report an issue with the details from the log attached."
    )
}

/// Joins an error and its sources with `: `.
fn chain(err: &(dyn Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        out.push_str(": ");
        out.push_str(&s.to_string());
        source = s.source();
    }
    out
}
