// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap-to-dismiss and malformed payloads.
//!
//! Taps outside editing controls dismiss the focused field; taps on a field do not.
//! A payload with an unknown curve code is dropped without reaching the observer.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_examples --example keyboard_tap_dismiss`

use std::rc::Rc;

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_keyboard::controller::{KeyboardController, SignalSource, TapRegistry};
use understory_keyboard::event::{KeyboardEvent, Payload, PayloadKey, PayloadValue};
use understory_keyboard::observer::KeyboardObserver;
use understory_keyboard::types::{LifecycleSignal, SignalSet};
use understory_keyboard::view::{Container, TextField, View};

struct Center;
impl SignalSource for Center {
    type Subscription = ();
    fn subscribe(&mut self, _signals: SignalSet) {}
    fn unsubscribe(&mut self, _subscription: ()) {}
}

struct Gestures;
impl TapRegistry for Gestures {
    type Registration = ();
    fn register_tap(&mut self, _host: &dyn View) {}
    fn unregister_tap(&mut self, _registration: ()) {}
}

#[derive(Default)]
struct Count(u32);
impl KeyboardObserver for Count {
    fn will_present(&mut self, _event: &KeyboardEvent) {
        self.0 += 1;
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let field = Rc::new(TextField::new(Rect::new(20.0, 100.0, 370.0, 144.0)));
    let host: Rc<dyn View> =
        Rc::new(Container::new(Rect::new(0.0, 0.0, 390.0, 844.0)).with_subview(field.clone()));
    let mut controller = KeyboardController::new(&host, Center, Gestures, Count::default());

    field.focus();
    println!(
        "tap on field dismissed: {}",
        controller.handle_tap(Point::new(100.0, 120.0))
    );
    println!("focused: {}", field.is_focused());
    println!(
        "tap outside dismissed: {}",
        controller.handle_tap(Point::new(100.0, 400.0))
    );
    println!("focused: {}", field.is_focused());

    let garbage = Payload::new()
        .with(
            PayloadKey::FrameBegin,
            PayloadValue::Rect(Rect::new(0.0, 844.0, 390.0, 1180.0)),
        )
        .with(
            PayloadKey::FrameEnd,
            PayloadValue::Rect(Rect::new(0.0, 508.0, 390.0, 844.0)),
        )
        .with(PayloadKey::AnimationDuration, PayloadValue::Number(0.25))
        .with(PayloadKey::AnimationCurve, PayloadValue::Integer(7));
    let accepted = controller.handle(LifecycleSignal::WillShow, &garbage);
    println!(
        "malformed accepted: {accepted}, phase {:?}, will_present calls {}",
        controller.phase(),
        controller.observer().0
    );

    controller.teardown();
    println!("active after teardown: {}", controller.is_active());
}
