// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller implementation.
//!
//! ## Overview
//!
//! A [`KeyboardController`] turns raw lifecycle signals into [`KeyboardEvent`]s,
//! advances its [`KeyboardPhase`], and dispatches to its single [`KeyboardObserver`].
//!
//! ## Dispatch
//!
//! - Will-show: `will_present`, then overlap of the focus target and of the content
//!   boundary against the keyboard's end frame; each positive overlap is dispatched.
//! - Did-show: `did_present` only.
//! - Will-hide: `will_hide` only.
//!
//! A payload that does not parse is dropped: the phase does not change and the
//! observer hears nothing. A handled will-hide leaves the controller `Hidden`.
//!
//! ## Collaborators
//!
//! The controller subscribes to a [`SignalSource`] and may register one tap
//! recognizer with a [`TapRegistry`]. Both are released exactly once, by
//! [`KeyboardController::teardown`] or on drop, whichever comes first. Delivery
//! itself is the host's job: forward each signal to [`KeyboardController::handle`]
//! and each tap to [`KeyboardController::handle_tap`].
//!
//! The host view is held weakly; the controller never keeps it alive.

use alloc::rc::{Rc, Weak};

use kurbo::Point;

use crate::event::{AnimationParams, KeyboardEvent, Payload};
use crate::observer::{KeyboardObserver, NoopObserver};
use crate::overlap;
use crate::types::{KeyboardPhase, LifecycleSignal, Settings, SignalSet};
use crate::view::{View, editing_control_at, find_focus_target};

/// The platform's keyboard notification mechanism.
pub trait SignalSource {
    /// Handle identifying one subscription.
    type Subscription;
    /// Start delivering `signals`.
    fn subscribe(&mut self, signals: SignalSet) -> Self::Subscription;
    /// Stop delivering to `subscription`.
    fn unsubscribe(&mut self, subscription: Self::Subscription);
}

/// The platform's gesture registration for tap recognizers on the host view.
pub trait TapRegistry {
    /// Handle identifying one registered recognizer.
    type Registration;
    /// Attach a tap recognizer to `host`.
    fn register_tap(&mut self, host: &dyn View) -> Self::Registration;
    /// Detach a recognizer.
    fn unregister_tap(&mut self, registration: Self::Registration);
}

/// Keyboard lifecycle controller for one host view.
///
/// ## Usage
///
/// - Construct with [`KeyboardController::new`]; it subscribes immediately and,
///   with dismiss-on-tap enabled, registers a tap recognizer.
/// - Forward platform signals to [`KeyboardController::handle`] and taps on the host
///   to [`KeyboardController::handle_tap`].
/// - Drop it (or call [`KeyboardController::teardown`]) to release both.
pub struct KeyboardController<
    S: SignalSource,
    G: TapRegistry,
    O: KeyboardObserver = NoopObserver,
> {
    host: Weak<dyn View>,
    source: S,
    taps: G,
    observer: O,
    settings: Settings,
    phase: KeyboardPhase,
    subscription: Option<S::Subscription>,
    tap: Option<G::Registration>,
}

impl<S: SignalSource, G: TapRegistry, O: KeyboardObserver> core::fmt::Debug
    for KeyboardController<S, G, O>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyboardController")
            .field("settings", &self.settings)
            .field("phase", &self.phase)
            .field("subscribed", &self.subscription.is_some())
            .field("tap_registered", &self.tap.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: SignalSource, G: TapRegistry, O: KeyboardObserver> KeyboardController<S, G, O> {
    /// Create a controller with default [`Settings`].
    pub fn new(host: &Rc<dyn View>, source: S, taps: G, observer: O) -> Self {
        Self::with_settings(host, source, taps, observer, Settings::default())
    }

    /// Create a controller with explicit settings.
    pub fn with_settings(
        host: &Rc<dyn View>,
        mut source: S,
        mut taps: G,
        observer: O,
        settings: Settings,
    ) -> Self {
        let subscription = Some(source.subscribe(SignalSet::all()));
        let tap = settings
            .dismiss_on_outside_tap
            .then(|| taps.register_tap(&**host));
        tracing::debug!(
            dismiss_on_outside_tap = settings.dismiss_on_outside_tap,
            animate_shift_changes = settings.animate_shift_changes,
            "keyboard controller subscribed"
        );
        Self {
            host: Rc::downgrade(host),
            source,
            taps,
            observer,
            settings,
            phase: KeyboardPhase::Hidden,
            subscription,
            tap,
        }
    }

    /// Current phase of the keyboard cycle.
    pub fn phase(&self) -> KeyboardPhase {
        self.phase
    }

    /// Current settings.
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// The host view, if it is still alive.
    pub fn host(&self) -> Option<Rc<dyn View>> {
        self.host.upgrade()
    }

    /// The attached observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// The attached observer, mutably.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// True until torn down.
    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Enable or disable dismissing focus on taps outside editing controls.
    ///
    /// Registers or unregisters the tap recognizer so at most one is ever attached.
    pub fn set_dismiss_on_outside_tap(&mut self, enabled: bool) {
        self.settings.dismiss_on_outside_tap = enabled;
        if !self.is_active() {
            return;
        }
        if enabled {
            if self.tap.is_none()
                && let Some(host) = self.host.upgrade()
            {
                self.tap = Some(self.taps.register_tap(&*host));
            }
        } else if let Some(registration) = self.tap.take() {
            self.taps.unregister_tap(registration);
        }
    }

    /// Enable or disable animating content shifts along with the keyboard.
    pub fn set_animate_shift_changes(&mut self, enabled: bool) {
        self.settings.animate_shift_changes = enabled;
    }

    /// Animation to use when shifting content for `event`.
    ///
    /// `None` means apply the change immediately.
    pub fn shift_animation(&self, event: &KeyboardEvent) -> Option<AnimationParams> {
        self.settings
            .animate_shift_changes
            .then(|| event.animation(0.0))
    }

    /// Handle one lifecycle signal and its raw payload.
    ///
    /// Returns `true` if the payload parsed and the signal was dispatched.
    pub fn handle(&mut self, signal: LifecycleSignal, payload: &Payload) -> bool {
        if !self.is_active() {
            tracing::trace!(?signal, "ignoring keyboard signal after teardown");
            return false;
        }
        let event = match KeyboardEvent::try_from(payload) {
            Ok(event) => event,
            Err(error) => {
                tracing::debug!(?signal, %error, "dropping malformed keyboard signal");
                return false;
            }
        };

        let next = self.phase.after(signal);
        tracing::trace!(
            ?signal,
            from = ?self.phase,
            to = ?next,
            is_local = event.is_local(),
            "keyboard transition"
        );
        self.phase = next;

        match signal {
            LifecycleSignal::WillShow => {
                self.observer.will_present(&event);
                self.keyboard_will_appear(&event);
            }
            LifecycleSignal::DidShow => self.observer.did_present(&event),
            LifecycleSignal::WillHide => self.observer.will_hide(&event),
        }
        self.phase = self.phase.settled();
        true
    }

    /// Handle a tap at `location` in the host's coordinate space.
    ///
    /// Returns `true` if the focus target was dismissed.
    pub fn handle_tap(&mut self, location: Point) -> bool {
        if !self.settings.dismiss_on_outside_tap || self.tap.is_none() {
            return false;
        }
        let Some(host) = self.host.upgrade() else {
            return false;
        };
        if editing_control_at(&*host, location).is_some() {
            tracing::trace!(?location, "tap on editing control");
            return false;
        }
        let Some(target) = find_focus_target(&*host) else {
            return false;
        };
        target.view.resign_focus();
        tracing::debug!(?location, "dismissed focus target on outside tap");
        true
    }

    /// Release the subscription and the tap recognizer.
    ///
    /// Safe to call any number of times; also runs on drop.
    pub fn teardown(&mut self) {
        if let Some(registration) = self.tap.take() {
            self.taps.unregister_tap(registration);
        }
        if let Some(subscription) = self.subscription.take() {
            self.source.unsubscribe(subscription);
            tracing::debug!("keyboard controller unsubscribed");
        }
        self.phase = KeyboardPhase::Hidden;
    }

    fn keyboard_will_appear(&mut self, event: &KeyboardEvent) {
        let Some(host) = self.host.upgrade() else {
            tracing::warn!("host view dropped; skipping keyboard overlap");
            return;
        };
        let offset = self.observer.offset_when_presenting(event);
        let target_bottom = find_focus_target(&*host).map(|target| target.frame.y1);
        let boundary = self.observer.content_boundary(host.frame());
        let result = overlap::compute(event.end_frame(), target_bottom, Some(boundary), offset);
        tracing::debug!(
            target_overlap = ?result.target,
            boundary_overlap = ?result.boundary,
            offset,
            "keyboard overlap"
        );

        if let Some(overlap) = result.target {
            self.observer.will_overlap_target(overlap, event);
        }
        if let Some(overlap) = result.boundary {
            self.observer.will_overlap_boundary(overlap, event);
        }
    }
}

impl<S: SignalSource, G: TapRegistry, O: KeyboardObserver> Drop for KeyboardController<S, G, O> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::tests::payload_with_top;
    use crate::event::{AnimationCurve, PayloadKey, PayloadValue};
    use crate::view::{Container, TextField};
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use kurbo::Rect;

    #[derive(Default)]
    struct Ledger {
        subscribed: Cell<u32>,
        unsubscribed: Cell<u32>,
        registered: Cell<u32>,
        unregistered: Cell<u32>,
    }

    fn bump(c: &Cell<u32>) -> u32 {
        c.set(c.get() + 1);
        c.get()
    }

    struct Source(Rc<Ledger>);
    impl SignalSource for Source {
        type Subscription = u32;
        fn subscribe(&mut self, signals: SignalSet) -> u32 {
            assert_eq!(signals, SignalSet::all(), "controller wants every signal");
            bump(&self.0.subscribed)
        }
        fn unsubscribe(&mut self, _subscription: u32) {
            bump(&self.0.unsubscribed);
        }
    }

    struct Taps(Rc<Ledger>);
    impl TapRegistry for Taps {
        type Registration = u32;
        fn register_tap(&mut self, _host: &dyn View) -> u32 {
            bump(&self.0.registered)
        }
        fn unregister_tap(&mut self, _registration: u32) {
            bump(&self.0.unregistered);
        }
    }

    #[derive(Debug, PartialEq)]
    enum Call {
        WillPresent,
        DidPresent,
        WillHide,
        OverlapTarget(f64),
        OverlapBoundary(f64),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        queries: u32,
        boundary: Option<f64>,
    }

    impl KeyboardObserver for Recorder {
        fn will_present(&mut self, _event: &KeyboardEvent) {
            self.calls.push(Call::WillPresent);
        }
        fn did_present(&mut self, _event: &KeyboardEvent) {
            self.calls.push(Call::DidPresent);
        }
        fn will_hide(&mut self, _event: &KeyboardEvent) {
            self.calls.push(Call::WillHide);
        }
        fn offset_when_presenting(&mut self, _event: &KeyboardEvent) -> f64 {
            self.queries += 1;
            16.0
        }
        fn content_boundary(&mut self, host_frame: Rect) -> f64 {
            self.queries += 1;
            self.boundary.unwrap_or(host_frame.y1)
        }
        fn will_overlap_target(&mut self, overlap: f64, _event: &KeyboardEvent) {
            self.calls.push(Call::OverlapTarget(overlap));
        }
        fn will_overlap_boundary(&mut self, overlap: f64, _event: &KeyboardEvent) {
            self.calls.push(Call::OverlapBoundary(overlap));
        }
    }

    struct Fixture {
        host: Rc<dyn View>,
        field: Rc<TextField>,
        ledger: Rc<Ledger>,
    }

    /// Host 400×800 at the origin with one field whose bottom edge is at 500.
    fn fixture() -> Fixture {
        let field = Rc::new(TextField::new(Rect::new(20.0, 460.0, 380.0, 500.0)));
        let host: Rc<dyn View> =
            Rc::new(Container::new(Rect::new(0.0, 0.0, 400.0, 800.0)).with_subview(field.clone()));
        Fixture {
            host,
            field,
            ledger: Rc::new(Ledger::default()),
        }
    }

    fn controller(f: &Fixture) -> KeyboardController<Source, Taps, Recorder> {
        KeyboardController::new(
            &f.host,
            Source(f.ledger.clone()),
            Taps(f.ledger.clone()),
            Recorder::default(),
        )
    }

    #[test]
    fn full_cycle_dispatches_in_order() {
        let f = fixture();
        f.field.focus();
        let mut c = controller(&f);
        let payload = payload_with_top(480.0);

        assert!(c.handle(LifecycleSignal::WillShow, &payload));
        assert_eq!(c.phase(), KeyboardPhase::Appearing);
        assert!(c.handle(LifecycleSignal::DidShow, &payload));
        assert_eq!(c.phase(), KeyboardPhase::Shown);
        assert!(c.handle(LifecycleSignal::WillHide, &payload));
        assert_eq!(c.phase(), KeyboardPhase::Hidden);

        assert_eq!(
            c.observer().calls,
            vec![
                Call::WillPresent,
                Call::OverlapTarget(36.0),
                Call::OverlapBoundary(336.0),
                Call::DidPresent,
                Call::WillHide,
            ]
        );
        // Geometry is queried for will-show only.
        assert_eq!(c.observer().queries, 2);
    }

    #[test]
    fn phase_follows_signal_order() {
        let f = fixture();
        let mut c = controller(&f);
        let payload = payload_with_top(480.0);

        // A stray did-show is still dispatched but does not skip ahead.
        assert!(c.handle(LifecycleSignal::DidShow, &payload));
        assert_eq!(c.phase(), KeyboardPhase::Hidden);

        assert!(c.handle(LifecycleSignal::WillShow, &payload));
        assert!(c.handle(LifecycleSignal::WillHide, &payload));
        assert_eq!(c.phase(), KeyboardPhase::Hidden);
        assert!(c.handle(LifecycleSignal::WillShow, &payload));
        assert_eq!(c.phase(), KeyboardPhase::Appearing);
        assert_eq!(
            c.observer().calls,
            vec![
                Call::DidPresent,
                Call::WillPresent,
                Call::OverlapBoundary(336.0),
                Call::WillHide,
                Call::WillPresent,
                Call::OverlapBoundary(336.0),
            ]
        );
    }

    #[test]
    fn malformed_payload_is_dropped_without_transition() {
        let f = fixture();
        f.field.focus();
        let mut c = controller(&f);
        for key in [
            PayloadKey::FrameBegin,
            PayloadKey::FrameEnd,
            PayloadKey::AnimationDuration,
            PayloadKey::AnimationCurve,
        ] {
            let mut payload = payload_with_top(480.0);
            payload.remove(key);
            for signal in LifecycleSignal::ALL {
                assert!(!c.handle(signal, &payload), "{signal:?} without {key:?}");
                assert_eq!(c.phase(), KeyboardPhase::Hidden);
            }
        }
        let bad_curve =
            payload_with_top(480.0).with(PayloadKey::AnimationCurve, PayloadValue::Integer(9));
        assert!(!c.handle(LifecycleSignal::WillShow, &bad_curve));
        assert!(c.observer().calls.is_empty());
        assert_eq!(c.observer().queries, 0);
    }

    #[test]
    fn target_clear_of_keyboard_reports_boundary_only() {
        let f = fixture();
        f.field.set_frame(Rect::new(20.0, 360.0, 380.0, 400.0));
        f.field.focus();
        let mut c = controller(&f);
        assert!(c.handle(LifecycleSignal::WillShow, &payload_with_top(480.0)));
        assert_eq!(
            c.observer().calls,
            vec![Call::WillPresent, Call::OverlapBoundary(336.0)]
        );
    }

    #[test]
    fn no_focus_target_skips_target_overlap() {
        let f = fixture();
        let mut c = controller(&f);
        assert!(c.handle(LifecycleSignal::WillShow, &payload_with_top(700.0)));
        // Boundary falls back to the host's bottom edge: 800 + 16 - 700.
        assert_eq!(
            c.observer().calls,
            vec![Call::WillPresent, Call::OverlapBoundary(116.0)]
        );
    }

    #[test]
    fn observer_boundary_overrides_host_bottom() {
        let f = fixture();
        let mut c = controller(&f);
        c.observer_mut().boundary = Some(400.0);
        assert!(c.handle(LifecycleSignal::WillShow, &payload_with_top(480.0)));
        assert_eq!(c.observer().calls, vec![Call::WillPresent]);
    }

    #[test]
    fn non_local_keyboard_still_reports_overlap() {
        let f = fixture();
        f.field.focus();
        let mut c = controller(&f);
        let mut payload = payload_with_top(480.0);
        payload.insert(PayloadKey::IsLocal, PayloadValue::Bool(false));
        assert!(c.handle(LifecycleSignal::WillShow, &payload));
        assert!(c.observer().calls.contains(&Call::OverlapTarget(36.0)));
    }

    #[test]
    fn dropped_host_skips_geometry() {
        let f = fixture();
        f.field.focus();
        let mut c = controller(&f);
        let Fixture { host, field, .. } = f;
        drop(host);
        drop(field);
        assert!(c.host().is_none());
        assert!(c.handle(LifecycleSignal::WillShow, &payload_with_top(480.0)));
        assert_eq!(c.observer().calls, vec![Call::WillPresent]);
        assert!(!c.handle_tap(Point::new(5.0, 5.0)));
    }

    #[test]
    fn teardown_is_idempotent() {
        let f = fixture();
        let mut c = controller(&f);
        assert_eq!(f.ledger.subscribed.get(), 1);
        assert_eq!(f.ledger.registered.get(), 1);
        assert!(c.handle(LifecycleSignal::WillShow, &payload_with_top(480.0)));

        c.teardown();
        c.teardown();
        assert!(!c.is_active());
        assert_eq!(c.phase(), KeyboardPhase::Hidden);
        assert_eq!(f.ledger.unsubscribed.get(), 1);
        assert_eq!(f.ledger.unregistered.get(), 1);

        let before = c.observer().calls.len();
        assert!(!c.handle(LifecycleSignal::DidShow, &payload_with_top(480.0)));
        // No dispatch after teardown.
        assert_eq!(c.observer().calls.len(), before);

        // Re-enabling the tap after teardown must not register again.
        c.set_dismiss_on_outside_tap(false);
        c.set_dismiss_on_outside_tap(true);
        assert_eq!(f.ledger.registered.get(), 1);

        drop(c);
        assert_eq!(f.ledger.unsubscribed.get(), 1);
        assert_eq!(f.ledger.unregistered.get(), 1);
    }

    #[test]
    fn drop_releases_collaborators() {
        let f = fixture();
        {
            let _c = controller(&f);
        }
        assert_eq!(f.ledger.unsubscribed.get(), 1);
        assert_eq!(f.ledger.unregistered.get(), 1);
    }

    #[test]
    fn outside_tap_dismisses_focus() {
        let f = fixture();
        f.field.focus();
        let mut c = controller(&f);

        // Inside the field.
        assert!(!c.handle_tap(Point::new(100.0, 480.0)));
        assert!(f.field.is_focused());

        assert!(c.handle_tap(Point::new(100.0, 100.0)));
        assert!(!f.field.is_focused());

        // Nothing left to dismiss.
        assert!(!c.handle_tap(Point::new(100.0, 100.0)));
    }

    #[test]
    fn tap_registration_follows_setting() {
        let f = fixture();
        f.field.focus();
        let mut c = KeyboardController::with_settings(
            &f.host,
            Source(f.ledger.clone()),
            Taps(f.ledger.clone()),
            NoopObserver,
            Settings {
                dismiss_on_outside_tap: false,
                ..Settings::default()
            },
        );
        assert_eq!(f.ledger.registered.get(), 0);
        assert!(!c.handle_tap(Point::new(100.0, 100.0)));
        assert!(f.field.is_focused());

        c.set_dismiss_on_outside_tap(true);
        c.set_dismiss_on_outside_tap(true);
        assert_eq!(f.ledger.registered.get(), 1, "one recognizer at most");
        assert!(c.handle_tap(Point::new(100.0, 100.0)));

        c.set_dismiss_on_outside_tap(false);
        assert_eq!(f.ledger.unregistered.get(), 1);
        drop(c);
        assert_eq!(f.ledger.unregistered.get(), 1);
    }

    #[test]
    fn shift_animation_follows_setting() {
        let f = fixture();
        let mut c = controller(&f);
        let event = KeyboardEvent::try_from(&payload_with_top(480.0)).unwrap();
        assert_eq!(
            c.shift_animation(&event),
            Some(AnimationParams {
                duration: 0.25,
                curve: AnimationCurve::EaseOut,
                delay: 0.0,
            })
        );
        c.set_animate_shift_changes(false);
        assert!(!c.settings().animate_shift_changes);
        assert_eq!(c.shift_animation(&event), None);
    }
}
