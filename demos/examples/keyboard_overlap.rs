// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard overlap basics.
//!
//! A login form sits near the bottom of a phone-sized host. The keyboard goes
//! through a full show/hide cycle, and the observer prints how far the focused
//! field and the content boundary would be covered, plus the animation to use.
//!
//! Run:
//! - `cargo run -p understory_examples --example keyboard_overlap`
//! - `RUST_LOG=understory_keyboard=trace cargo run -p understory_examples --example keyboard_overlap`

use std::rc::Rc;

use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_keyboard::controller::{KeyboardController, SignalSource, TapRegistry};
use understory_keyboard::event::{
    AnimationCurve, KeyboardEvent, Payload, PayloadKey, PayloadValue,
};
use understory_keyboard::observer::KeyboardObserver;
use understory_keyboard::types::{LifecycleSignal, SignalSet};
use understory_keyboard::view::{Container, TextField, View};

struct Center;
impl SignalSource for Center {
    type Subscription = u32;
    fn subscribe(&mut self, signals: SignalSet) -> u32 {
        tracing::info!(?signals, "subscribed");
        1
    }
    fn unsubscribe(&mut self, subscription: u32) {
        tracing::info!(subscription, "unsubscribed");
    }
}

struct Gestures;
impl TapRegistry for Gestures {
    type Registration = u32;
    fn register_tap(&mut self, host: &dyn View) -> u32 {
        tracing::info!(frame = ?host.frame(), "tap recognizer attached");
        7
    }
    fn unregister_tap(&mut self, registration: u32) {
        tracing::info!(registration, "tap recognizer detached");
    }
}

struct Printer;
impl KeyboardObserver for Printer {
    fn will_present(&mut self, event: &KeyboardEvent) {
        println!(
            "will present: top={} duration={}s curve={:?} local={}",
            event.end_frame().y0,
            event.animation_duration(),
            event.animation_curve(),
            event.is_local()
        );
    }
    fn did_present(&mut self, _event: &KeyboardEvent) {
        println!("did present");
    }
    fn will_hide(&mut self, _event: &KeyboardEvent) {
        println!("will hide");
    }
    fn offset_when_presenting(&mut self, _event: &KeyboardEvent) -> f64 {
        24.0
    }
    fn will_overlap_target(&mut self, overlap: f64, _event: &KeyboardEvent) {
        println!("  focused field covered by {overlap}");
    }
    fn will_overlap_boundary(&mut self, overlap: f64, _event: &KeyboardEvent) {
        println!("  content boundary covered by {overlap}");
    }
}

fn payload(begin: Rect, end: Rect) -> Payload {
    Payload::new()
        .with(PayloadKey::FrameBegin, PayloadValue::Rect(begin))
        .with(PayloadKey::FrameEnd, PayloadValue::Rect(end))
        .with(PayloadKey::AnimationDuration, PayloadValue::Number(0.25))
        .with(PayloadKey::AnimationCurve, PayloadValue::Integer(2))
        .with(PayloadKey::IsLocal, PayloadValue::Bool(true))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let user = Rc::new(TextField::new(Rect::new(20.0, 0.0, 370.0, 44.0)));
    let password = Rc::new(TextField::new(Rect::new(20.0, 60.0, 370.0, 104.0)));
    let form = Rc::new(
        Container::new(Rect::new(0.0, 560.0, 390.0, 700.0))
            .with_subview(user)
            .with_subview(password.clone()),
    );
    let host: Rc<dyn View> =
        Rc::new(Container::new(Rect::new(0.0, 0.0, 390.0, 844.0)).with_subview(form));

    let mut controller = KeyboardController::new(&host, Center, Gestures, Printer);

    let hidden = Rect::new(0.0, 844.0, 390.0, 1180.0);
    let shown = Rect::new(0.0, 508.0, 390.0, 844.0);

    println!("== Focus the password field ==");
    password.focus();
    let show = payload(hidden, shown);
    controller.handle(LifecycleSignal::WillShow, &show);
    if let Ok(event) = KeyboardEvent::try_from(&show)
        && let Some(anim) = controller.shift_animation(&event)
    {
        let bez = anim.curve.to_cubic_bez();
        println!(
            "  shift over {}s with control points {:?} {:?}",
            anim.duration, bez.p1, bez.p2
        );
    }
    controller.handle(LifecycleSignal::DidShow, &show);
    println!("phase: {:?}", controller.phase());

    println!("== Hide ==");
    controller.handle(LifecycleSignal::WillHide, &payload(shown, hidden));
    println!("phase: {:?}", controller.phase());

    println!("== Instant shifts ==");
    controller.set_animate_shift_changes(false);
    if let Ok(event) = KeyboardEvent::try_from(&show) {
        assert_eq!(event.animation_curve(), AnimationCurve::EaseInOut);
        println!("  animation: {:?}", controller.shift_animation(&event));
    }
}
