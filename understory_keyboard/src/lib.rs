// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_keyboard --heading-base-level=0

//! Understory Keyboard: on-screen keyboard lifecycle events and overlap geometry.
//!
//! ## Overview
//!
//! Platforms announce the on-screen keyboard with opaque notifications carrying a
//! loosely typed payload. This crate normalizes them into a typed, immutable
//! [`KeyboardEvent`](crate::event::KeyboardEvent), finds the view holding focus, and
//! computes how far the keyboard will overlap it and a caller-defined content
//! boundary. It reports *how much* and *when*; how content moves is up to you.
//!
//! ## Pieces
//!
//! - [`event`]: payload parsing into [`KeyboardEvent`](crate::event::KeyboardEvent),
//!   animation curve and parameters.
//! - [`view`]: the [`View`](crate::view::View) capability and pre-order focus lookup.
//! - [`overlap`]: pure overlap arithmetic against the keyboard's end frame.
//! - [`observer`]: the [`KeyboardObserver`](crate::observer::KeyboardObserver) contract,
//!   with defaults for every method.
//! - [`controller`]: [`KeyboardController`](crate::controller::KeyboardController), which
//!   ties them together and owns the subscription and tap recognizer.
//!
//! ## Layering
//!
//! Notification delivery, gesture recognition, and animation belong to the toolkit.
//! The controller only needs a [`SignalSource`](crate::controller::SignalSource) to
//! subscribe to and a [`TapRegistry`](crate::controller::TapRegistry) to attach a tap
//! recognizer to; the toolkit forwards what they deliver.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use kurbo::Rect;
//! use understory_keyboard::controller::{KeyboardController, SignalSource, TapRegistry};
//! use understory_keyboard::event::{KeyboardEvent, Payload, PayloadKey, PayloadValue};
//! use understory_keyboard::observer::KeyboardObserver;
//! use understory_keyboard::types::{LifecycleSignal, SignalSet};
//! use understory_keyboard::view::{Container, TextField, View};
//!
//! struct Source;
//! impl SignalSource for Source {
//!     type Subscription = ();
//!     fn subscribe(&mut self, _signals: SignalSet) {}
//!     fn unsubscribe(&mut self, _subscription: ()) {}
//! }
//!
//! struct Taps;
//! impl TapRegistry for Taps {
//!     type Registration = ();
//!     fn register_tap(&mut self, _host: &dyn View) {}
//!     fn unregister_tap(&mut self, _registration: ()) {}
//! }
//!
//! #[derive(Default)]
//! struct Shift(f64);
//! impl KeyboardObserver for Shift {
//!     fn will_overlap_target(&mut self, overlap: f64, _event: &KeyboardEvent) {
//!         self.0 = overlap;
//!     }
//! }
//!
//! let field = Rc::new(TextField::new(Rect::new(20.0, 460.0, 380.0, 500.0)));
//! let host: Rc<dyn View> =
//!     Rc::new(Container::new(Rect::new(0.0, 0.0, 400.0, 800.0)).with_subview(field.clone()));
//! field.focus();
//!
//! let mut controller = KeyboardController::new(&host, Source, Taps, Shift::default());
//! let payload = Payload::new()
//!     .with(PayloadKey::FrameBegin, PayloadValue::Rect(Rect::new(0.0, 800.0, 400.0, 1100.0)))
//!     .with(PayloadKey::FrameEnd, PayloadValue::Rect(Rect::new(0.0, 480.0, 400.0, 780.0)))
//!     .with(PayloadKey::AnimationDuration, PayloadValue::Number(0.25))
//!     .with(PayloadKey::AnimationCurve, PayloadValue::Integer(1));
//!
//! assert!(controller.handle(LifecycleSignal::WillShow, &payload));
//! // Field bottom 500, default offset 16, keyboard top 480.
//! assert_eq!(controller.observer().0, 36.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod controller;
pub mod event;
pub mod observer;
pub mod overlap;
pub mod types;
pub mod view;
