//! Wrappable behaviours shared by every instance of a kind.
//!
//! A [`Hook`] is one method slot of a prototype. Calling it runs whatever behaviour is
//! currently installed; [`Hook::around`] replaces that behaviour with a wrapper that
//! receives the previous one. Every instance that shares the prototype sees the change.
//!
//! Removal follows the usual monkey-patching rules: an [`Uninstaller`] restores the
//! previous behaviour when its wrapper is still the outermost one, and otherwise turns the
//! wrapper into a pass-through so that wrappers installed later keep working.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

/// A callable behaviour: receives the instance and the call arguments.
pub type Behavior<S, A, R> = Rc<dyn Fn(&S, A) -> R>;

/// A wrappable method slot.
pub struct Hook<S, A, R> {
    /// Method name, for diagnostics.
    name: &'static str,
    /// The behaviour currently installed.
    current: Rc<RefCell<Behavior<S, A, R>>>,
    /// Number of wrappers installed over the lifetime of the slot.
    wraps: Rc<Cell<usize>>,
}

impl<S: 'static, A: 'static, R: 'static> Hook<S, A, R> {
    /// Creates a slot with its native behaviour.
    pub fn new(name: &'static str, native: impl Fn(&S, A) -> R + 'static) -> Self {
        Self {
            name,
            current: Rc::new(RefCell::new(Rc::new(native))),
            wraps: Rc::new(Cell::new(0)),
        }
    }

    /// Returns the method name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns how many wrappers have ever been installed on this slot.
    pub fn wrap_count(&self) -> usize {
        self.wraps.get()
    }

    /// Invokes the installed behaviour.
    ///
    /// The slot is not borrowed while the behaviour runs, so behaviours may call back into
    /// the same slot or install further wrappers.
    pub fn call(&self, this: &S, args: A) -> R {
        let behavior = Rc::clone(&self.current.borrow());
        behavior(this, args)
    }

    /// Wraps the installed behaviour.
    ///
    /// `wrap` receives the behaviour being replaced and returns the new one.
    pub fn around<W>(&self, wrap: W) -> Uninstaller
    where
        W: FnOnce(Behavior<S, A, R>) -> Behavior<S, A, R>,
    {
        let previous = Rc::clone(&self.current.borrow());
        let wrapped = wrap(Rc::clone(&previous));
        let active = Rc::new(Cell::new(true));

        let gate: Behavior<S, A, R> = {
            let active = Rc::clone(&active);
            let previous = Rc::clone(&previous);
            Rc::new(move |this: &S, args: A| {
                if active.get() {
                    wrapped(this, args)
                } else {
                    previous(this, args)
                }
            })
        };

        self.current.replace(Rc::clone(&gate));
        self.wraps.set(self.wraps.get() + 1);

        let slot: Weak<RefCell<Behavior<S, A, R>>> = Rc::downgrade(&self.current);
        Uninstaller {
            name: self.name,
            undo: Some(Box::new(move || {
                active.set(false);
                if let Some(slot) = slot.upgrade() {
                    let mut current = slot.borrow_mut();
                    if Rc::ptr_eq(&current, &gate) {
                        *current = previous;
                    }
                }
            })),
        }
    }
}

impl<S, A, R> fmt::Debug for Hook<S, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("wraps", &self.wraps.get())
            .finish()
    }
}

/// Removes one wrapper installed by [`Hook::around`].
///
/// Dropping an uninstaller without calling [`Uninstaller::uninstall`] leaves the wrapper
/// in place.
#[must_use = "dropping an Uninstaller leaves the wrapper installed for good"]
pub struct Uninstaller {
    /// Name of the wrapped method.
    name: &'static str,
    /// Restores the previous behaviour.
    undo: Option<Box<dyn FnOnce()>>,
}

impl Uninstaller {
    /// Returns the name of the wrapped method.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Deactivates the wrapper.
    pub fn uninstall(mut self) {
        if let Some(undo) = self.undo.take() {
            undo();
        }
    }
}

impl fmt::Debug for Uninstaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uninstaller").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A stand-in instance type.
    struct Counter;

    fn doubling() -> Hook<Counter, i32, i32> {
        Hook::new("double", |_: &Counter, x: i32| x * 2)
    }

    #[test]
    fn test_native_behavior() {
        assert_eq!(doubling().call(&Counter, 4), 8);
    }

    #[test]
    fn test_around_sees_previous() {
        let hook = doubling();
        let _keep = hook.around(|old| Rc::new(move |this: &Counter, x: i32| old(this, x) + 1));
        assert_eq!(hook.call(&Counter, 4), 9);
        assert_eq!(hook.wrap_count(), 1);
    }

    #[test]
    fn test_uninstall_outermost_restores() {
        let hook = doubling();
        let un = hook.around(|old| Rc::new(move |this: &Counter, x: i32| old(this, x) + 1));
        un.uninstall();
        assert_eq!(hook.call(&Counter, 4), 8);
    }

    #[test]
    fn test_uninstall_inner_becomes_pass_through() {
        let hook = doubling();
        let inner = hook.around(|old| Rc::new(move |this: &Counter, x: i32| old(this, x) + 1));
        let _outer = hook.around(|old| Rc::new(move |this: &Counter, x: i32| old(this, x) * 10));
        assert_eq!(hook.call(&Counter, 4), 90);

        inner.uninstall();
        assert_eq!(hook.call(&Counter, 4), 80);
    }

    #[test]
    fn test_reentrant_call() {
        let hook = Rc::new(doubling());
        let weak = Rc::downgrade(&hook);
        let _keep = hook.around(move |old| {
            Rc::new(move |this: &Counter, x: i32| {
                if x > 100 {
                    return x;
                }
                let again = weak.upgrade().map_or(0, |h| h.call(this, x * 100));
                old(this, x) + again
            })
        });
        assert_eq!(hook.call(&Counter, 2), 4 + 200);
    }
}
