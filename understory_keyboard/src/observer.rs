// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observer contract for keyboard lifecycle notifications.
//!
//! Every method has a default, so an observer only overrides what it needs.
//! A controller has exactly one observer; fan out to several by composing them
//! inside your own implementation.

use alloc::boxed::Box;

use kurbo::Rect;

use crate::event::KeyboardEvent;
use crate::types::DEFAULT_OFFSET;

/// Receives lifecycle notifications and answers geometry queries for a
/// [`KeyboardController`](crate::controller::KeyboardController).
///
/// For a will-show signal the controller calls, in order: [`will_present`](Self::will_present),
/// [`offset_when_presenting`](Self::offset_when_presenting),
/// [`content_boundary`](Self::content_boundary), then
/// [`will_overlap_target`](Self::will_overlap_target) and
/// [`will_overlap_boundary`](Self::will_overlap_boundary) for each positive overlap.
pub trait KeyboardObserver {
    /// The keyboard is about to appear.
    fn will_present(&mut self, _event: &KeyboardEvent) {}

    /// The keyboard has appeared.
    fn did_present(&mut self, _event: &KeyboardEvent) {}

    /// The keyboard is about to disappear.
    fn will_hide(&mut self, _event: &KeyboardEvent) {}

    /// Distance to keep between the keyboard and both reference lines.
    fn offset_when_presenting(&mut self, _event: &KeyboardEvent) -> f64 {
        DEFAULT_OFFSET
    }

    /// Vertical position of the content boundary.
    ///
    /// `host_frame` is the host view's frame in its parent; the default is its bottom edge.
    fn content_boundary(&mut self, host_frame: Rect) -> f64 {
        host_frame.y1
    }

    /// The keyboard will cover the focus target's bottom edge by `overlap`.
    fn will_overlap_target(&mut self, _overlap: f64, _event: &KeyboardEvent) {}

    /// The keyboard will cover the content boundary by `overlap`.
    fn will_overlap_boundary(&mut self, _overlap: f64, _event: &KeyboardEvent) {}
}

/// An observer that keeps every default.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl KeyboardObserver for NoopObserver {}

impl<O: KeyboardObserver + ?Sized> KeyboardObserver for Box<O> {
    fn will_present(&mut self, event: &KeyboardEvent) {
        (**self).will_present(event);
    }

    fn did_present(&mut self, event: &KeyboardEvent) {
        (**self).did_present(event);
    }

    fn will_hide(&mut self, event: &KeyboardEvent) {
        (**self).will_hide(event);
    }

    fn offset_when_presenting(&mut self, event: &KeyboardEvent) -> f64 {
        (**self).offset_when_presenting(event)
    }

    fn content_boundary(&mut self, host_frame: Rect) -> f64 {
        (**self).content_boundary(host_frame)
    }

    fn will_overlap_target(&mut self, overlap: f64, event: &KeyboardEvent) {
        (**self).will_overlap_target(overlap, event);
    }

    fn will_overlap_boundary(&mut self, overlap: f64, event: &KeyboardEvent) {
        (**self).will_overlap_boundary(overlap, event);
    }
}
