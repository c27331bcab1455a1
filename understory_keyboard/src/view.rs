// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View hierarchy capability and focus lookup.
//!
//! ## Overview
//!
//! The engine never owns or mutates layout. It only asks a view hierarchy three
//! questions: where is each view, which view holds focus, and which views are
//! editing controls. Each concrete element kind answers them by implementing [`View`].
//!
//! ## Coordinates
//!
//! [`View::frame`] is expressed in the parent's coordinate space. Lookups report
//! frames in the coordinate space of the root they started from: the origins of
//! every ancestor below the root are accumulated, the root's own origin is not.
//!
//! ## Traversal
//!
//! Lookups are pre-order depth-first: a view is checked before its subviews and
//! subviews are checked in order, so the first match wins. Views are tracked by
//! address, so a hierarchy that reaches the same view twice (including itself)
//! visits it once.
//!
//! ## Minimal example
//!
//! ```
//! use std::rc::Rc;
//! use kurbo::Rect;
//! use understory_keyboard::view::{Container, TextField, find_focus_target};
//!
//! let field = Rc::new(TextField::new(Rect::new(10.0, 20.0, 110.0, 50.0)));
//! let form = Rc::new(Container::new(Rect::new(0.0, 300.0, 400.0, 600.0)).with_subview(field.clone()));
//! let root = Container::new(Rect::new(0.0, 0.0, 400.0, 800.0)).with_subview(form);
//!
//! assert!(find_focus_target(&root).is_none());
//! field.focus();
//! let target = find_focus_target(&root).unwrap();
//! assert_eq!(target.frame.y1, 350.0);
//! ```

use alloc::collections::BTreeSet;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use kurbo::{Point, Rect};

/// A node of a view hierarchy, as seen by the keyboard engine.
pub trait View {
    /// Frame in the parent's coordinate space.
    fn frame(&self) -> Rect;

    /// Direct subviews, front to back in traversal order.
    fn subviews(&self) -> &[Rc<dyn View>] {
        &[]
    }

    /// True if this view currently receives text input.
    fn is_focus_target(&self) -> bool {
        false
    }

    /// True if taps on this view belong to editing and must not dismiss focus.
    fn is_editing_control(&self) -> bool {
        false
    }

    /// Give up focus. No-op for views that never hold it.
    fn resign_focus(&self) {}
}

/// A view found by a lookup, with its frame in the lookup root's coordinate space.
#[derive(Clone, Copy)]
pub struct FocusedView<'a> {
    /// The matched view.
    pub view: &'a dyn View,
    /// Frame converted to the root's coordinate space.
    pub frame: Rect,
}

impl core::fmt::Debug for FocusedView<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FocusedView")
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

/// Find the view holding focus under `root` (inclusive), or `None` if nothing does.
pub fn find_focus_target(root: &dyn View) -> Option<FocusedView<'_>> {
    find_first(root, |view, _| view.is_focus_target())
}

/// Find the first editing control under `root` whose converted frame contains `point`.
///
/// `point` is in `root`'s coordinate space.
pub fn editing_control_at(root: &dyn View, point: Point) -> Option<FocusedView<'_>> {
    find_first(root, |view, frame| {
        view.is_editing_control() && frame.contains(point)
    })
}

fn find_first<'a>(
    root: &'a dyn View,
    mut matches: impl FnMut(&dyn View, Rect) -> bool,
) -> Option<FocusedView<'a>> {
    let mut visited: BTreeSet<*const ()> = BTreeSet::new();
    let mut stack: Vec<(&'a dyn View, Rect)> = Vec::new();
    let root_frame = Rect::from_origin_size(Point::ORIGIN, root.frame().size());
    stack.push((root, root_frame));

    while let Some((view, frame)) = stack.pop() {
        if !visited.insert(core::ptr::from_ref(view).cast::<()>()) {
            continue;
        }
        if matches(view, frame) {
            return Some(FocusedView { view, frame });
        }
        let offset = frame.origin().to_vec2();
        // Reverse so the first subview is popped first.
        for sub in view.subviews().iter().rev() {
            stack.push((&**sub, sub.frame() + offset));
        }
    }
    None
}

/// A view that only groups subviews.
pub struct Container {
    frame: Cell<Rect>,
    subviews: Vec<Rc<dyn View>>,
}

impl core::fmt::Debug for Container {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Container")
            .field("frame", &self.frame.get())
            .field("subviews", &self.subviews.len())
            .finish()
    }
}

impl Container {
    /// Create an empty container at `frame` (parent coordinates).
    pub fn new(frame: Rect) -> Self {
        Self {
            frame: Cell::new(frame),
            subviews: Vec::new(),
        }
    }

    /// Append a subview.
    #[must_use]
    pub fn with_subview(mut self, view: Rc<dyn View>) -> Self {
        self.subviews.push(view);
        self
    }

    /// Move or resize the container.
    pub fn set_frame(&self, frame: Rect) {
        self.frame.set(frame);
    }
}

impl View for Container {
    fn frame(&self) -> Rect {
        self.frame.get()
    }

    fn subviews(&self) -> &[Rc<dyn View>] {
        &self.subviews
    }
}

/// A single-line text input.
#[derive(Debug)]
pub struct TextField {
    frame: Cell<Rect>,
    focused: Cell<bool>,
}

impl TextField {
    /// Create an unfocused field at `frame` (parent coordinates).
    pub fn new(frame: Rect) -> Self {
        Self {
            frame: Cell::new(frame),
            focused: Cell::new(false),
        }
    }

    /// Take focus.
    pub fn focus(&self) {
        self.focused.set(true);
    }

    /// True while the field holds focus.
    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    /// Move or resize the field.
    pub fn set_frame(&self, frame: Rect) {
        self.frame.set(frame);
    }
}

impl View for TextField {
    fn frame(&self) -> Rect {
        self.frame.get()
    }

    fn is_focus_target(&self) -> bool {
        self.focused.get()
    }

    fn is_editing_control(&self) -> bool {
        true
    }

    fn resign_focus(&self) {
        self.focused.set(false);
    }
}
