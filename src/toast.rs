// Single-slot toast notifications.
// Each toast carries a token; a newer toast cancels the older one's timers and stale callbacks are ignored.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::timers::{TimerId, Timers};
use crate::types::{ToastKind, UiConfig};

/// Identity of one toast instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastToken(u64);

impl ToastToken {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Lifecycle of the live toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// In the container, transition not started yet.
    Inserted,
    /// `show` applied.
    Shown,
    /// `show` removed, waiting to be deleted.
    Hiding,
}

/// Where toasts are drawn. The DOM version owns the `#toast-container` element.
pub trait ToastSurface {
    /// Drop whatever the container holds.
    fn clear(&mut self);
    fn insert(&mut self, token: ToastToken, message: &str, kind: ToastKind);
    fn set_shown(&mut self, token: ToastToken, shown: bool);
    fn remove(&mut self, token: ToastToken);
}

/// Anything that can put a message in front of the user.
pub trait ToastSink {
    fn notify(&self, message: &str, kind: ToastKind);

    fn info(&self, message: &str) {
        self.notify(message, ToastKind::Info);
    }

    fn error(&self, message: &str) {
        self.notify(message, ToastKind::Error);
    }
}

impl<T: ToastSink + ?Sized> ToastSink for Rc<T> {
    fn notify(&self, message: &str, kind: ToastKind) {
        (**self).notify(message, kind)
    }
}

impl<T: ToastSink + ?Sized> ToastSink for &T {
    fn notify(&self, message: &str, kind: ToastKind) {
        (**self).notify(message, kind)
    }
}

/// Sink for pages without a toast container.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentToasts;

impl ToastSink for SilentToasts {
    fn notify(&self, message: &str, kind: ToastKind) {
        crate::info_log!("toast suppressed ({}): {}", kind.as_str(), message);
    }
}

/// Toast state machine. Transitions only apply to the token that is currently live.
pub struct Toaster<S> {
    surface: S,
    issued: u64,
    live: Option<(ToastToken, ToastPhase)>,
}

impl<S: ToastSurface> Toaster<S> {
    pub fn new(surface: S) -> Self {
        Toaster {
            surface,
            issued: 0,
            live: None,
        }
    }

    /// Replace whatever is showing with a fresh toast.
    pub fn notify(&mut self, message: &str, kind: ToastKind) -> ToastToken {
        self.surface.clear();
        self.issued += 1;
        let token = ToastToken(self.issued);
        self.surface.insert(token, message, kind);
        self.live = Some((token, ToastPhase::Inserted));
        token
    }

    pub fn reveal(&mut self, token: ToastToken) -> bool {
        match self.live {
            Some((live, ToastPhase::Inserted)) if live == token => {
                self.surface.set_shown(token, true);
                self.live = Some((token, ToastPhase::Shown));
                true
            }
            _ => false,
        }
    }

    pub fn hide(&mut self, token: ToastToken) -> bool {
        match self.live {
            Some((live, phase)) if live == token && phase != ToastPhase::Hiding => {
                self.surface.set_shown(token, false);
                self.live = Some((token, ToastPhase::Hiding));
                true
            }
            _ => false,
        }
    }

    pub fn dispose(&mut self, token: ToastToken) -> bool {
        match self.live {
            Some((live, _)) if live == token => {
                self.surface.remove(token);
                self.live = None;
                true
            }
            _ => false,
        }
    }

    pub fn live(&self) -> Option<(ToastToken, ToastPhase)> {
        self.live
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

/// Timer-driven notifier: reveal on the next frame, hide after the display time, delete after
/// the removal delay.
pub struct Notifier<S, T: Timers> {
    toaster: Rc<RefCell<Toaster<S>>>,
    timers: T,
    pending: RefCell<Vec<TimerId>>,
    display: Duration,
    removal: Duration,
}

impl<S: ToastSurface + 'static, T: Timers> Notifier<S, T> {
    pub fn new(surface: S, timers: T, config: &UiConfig) -> Self {
        Notifier {
            toaster: Rc::new(RefCell::new(Toaster::new(surface))),
            timers,
            pending: RefCell::new(Vec::new()),
            display: config.toast_display(),
            removal: config.toast_removal(),
        }
    }

    pub fn show(&self, message: &str, kind: ToastKind) -> ToastToken {
        for id in self.pending.borrow_mut().drain(..) {
            self.timers.cancel(id);
        }

        let token = self.toaster.borrow_mut().notify(message, kind);

        let toaster = Rc::clone(&self.toaster);
        let frame = self.timers.next_frame(Box::new(move |_| {
            toaster.borrow_mut().reveal(token);
        }));

        let toaster = Rc::clone(&self.toaster);
        let hide = self.timers.after(
            self.display,
            Box::new(move || {
                toaster.borrow_mut().hide(token);
            }),
        );

        let toaster = Rc::clone(&self.toaster);
        let dispose = self.timers.after(
            self.display + self.removal,
            Box::new(move || {
                toaster.borrow_mut().dispose(token);
            }),
        );

        *self.pending.borrow_mut() = vec![frame, hide, dispose];
        token
    }

    pub fn live(&self) -> Option<(ToastToken, ToastPhase)> {
        self.toaster.borrow().live()
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(self.toaster.borrow().surface())
    }
}

impl<S: ToastSurface + 'static, T: Timers> ToastSink for Notifier<S, T> {
    fn notify(&self, message: &str, kind: ToastKind) {
        self.show(message, kind);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeToastSurface;
    use super::*;
    use crate::timers::ManualTimers;
    use proptest::prelude::*;

    fn notifier() -> (Notifier<FakeToastSurface, ManualTimers>, ManualTimers) {
        let timers = ManualTimers::new();
        let notifier = Notifier::new(FakeToastSurface::default(), timers.clone(), &UiConfig::default());
        (notifier, timers)
    }

    #[test]
    fn toast_lifecycle() {
        let (notifier, timers) = notifier();
        notifier.info("Movie added to your list");

        notifier.with_surface(|s| {
            assert_eq!(s.nodes.len(), 1);
            assert!(!s.nodes[0].3, "show waits for the next frame");
        });

        timers.advance(Duration::from_millis(20));
        notifier.with_surface(|s| assert!(s.nodes[0].3));

        timers.advance(Duration::from_millis(2000));
        assert_eq!(notifier.live().map(|l| l.1), Some(ToastPhase::Hiding));
        notifier.with_surface(|s| assert!(!s.nodes[0].3));

        timers.advance(Duration::from_millis(200));
        assert!(notifier.live().is_none());
        notifier.with_surface(|s| assert!(s.nodes.is_empty()));
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn new_toast_cancels_old_timers() {
        let (notifier, timers) = notifier();
        notifier.info("first");
        timers.advance(Duration::from_millis(1900));
        notifier.error("second");
        assert_eq!(timers.pending(), 3);

        // The first toast's hide would have fired at 2000ms.
        timers.advance(Duration::from_millis(300));
        notifier.with_surface(|s| {
            assert_eq!(s.nodes.len(), 1);
            assert_eq!(s.nodes[0].1, "second");
            assert_eq!(s.nodes[0].2, ToastKind::Error);
            assert!(s.nodes[0].3);
        });
    }

    #[test]
    fn stale_token_is_ignored() {
        let mut toaster = Toaster::new(FakeToastSurface::default());
        let old = toaster.notify("old", ToastKind::Info);
        let new = toaster.notify("new", ToastKind::Info);

        assert!(!toaster.reveal(old));
        assert!(!toaster.hide(old));
        assert!(!toaster.dispose(old));
        assert_eq!(toaster.live(), Some((new, ToastPhase::Inserted)));
        assert_eq!(toaster.surface().nodes.len(), 1);
    }

    #[test]
    fn hide_before_reveal_still_hides() {
        let mut toaster = Toaster::new(FakeToastSurface::default());
        let token = toaster.notify("quick", ToastKind::Info);
        assert!(toaster.hide(token));
        assert!(!toaster.reveal(token));
        assert!(toaster.dispose(token));
        assert!(toaster.live().is_none());
    }

    proptest! {
        #[test]
        fn at_most_one_toast_at_any_instant(
            ops in prop::collection::vec((any::<bool>(), 0u64..3000), 1..40)
        ) {
            let (notifier, timers) = notifier();
            for (is_notify, millis) in ops {
                if is_notify {
                    notifier.info("message");
                } else {
                    timers.advance(Duration::from_millis(millis));
                }
                notifier.with_surface(|s| assert!(s.nodes.len() <= 1));
            }
            let max_nodes = notifier.with_surface(|s| s.max_nodes);
            prop_assert!(max_nodes <= 1);
        }
    }
}
