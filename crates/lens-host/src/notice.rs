//! Transient user notifications.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
    time::Duration,
};

/// A notification shown to the user.
#[derive(Debug)]
pub struct Notice {
    /// The message text.
    message: String,
    /// How long the notice stays up unless hidden first.
    timeout: Duration,
    /// Whether the notice was hidden explicitly.
    hidden: Cell<bool>,
}

impl Notice {
    /// Creates a visible notice.
    pub fn new(message: &str, timeout: Duration) -> Self {
        Self {
            message: message.to_string(),
            timeout,
            hidden: Cell::new(false),
        }
    }

    /// Returns the message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the display timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Hides the notice. Hiding twice is harmless.
    pub fn hide(&self) {
        self.hidden.set(true);
    }

    /// Returns true until the notice is hidden.
    pub fn is_visible(&self) -> bool {
        !self.hidden.get()
    }
}

/// The host's notification surface.
pub trait Notifier {
    /// Shows a notice and returns a handle to it.
    fn notify(&self, message: &str, timeout: Duration) -> Rc<Notice>;
}

/// A notifier that keeps every notice it shows.
#[derive(Default)]
pub struct RecordingNotifier {
    /// Notices in the order they were shown.
    shown: RefCell<Vec<Rc<Notice>>>,
}

impl RecordingNotifier {
    /// Creates an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notice shown so far.
    pub fn shown(&self) -> Vec<Rc<Notice>> {
        self.shown.borrow().clone()
    }

    /// Returns the notices that are still visible.
    pub fn visible(&self) -> Vec<Rc<Notice>> {
        self.shown
            .borrow()
            .iter()
            .filter(|n| n.is_visible())
            .cloned()
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, timeout: Duration) -> Rc<Notice> {
        let notice = Rc::new(Notice::new(message, timeout));
        self.shown.borrow_mut().push(Rc::clone(&notice));
        notice
    }
}

impl fmt::Debug for RecordingNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingNotifier")
            .field("shown", &self.shown.borrow().len())
            .finish()
    }
}
