// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlap geometry between the keyboard and two reference lines.
//!
//! ## Overview
//!
//! For a reference line at `y` and an offset `d`, the keyboard overlaps the line by
//! `(y + d) - top`, where `top` is the origin y of the keyboard's *end* frame.
//! Only positive overlaps are reported. The two lines are the focus target's bottom
//! edge and the content boundary; the offset is added once to each.
//!
//! Locality does not suppress anything here: every process sharing the keyboard gets
//! the same numbers and decides for itself whether to react.
//!
//! ```
//! use kurbo::Rect;
//! use understory_keyboard::overlap;
//!
//! let keyboard = Rect::new(0.0, 480.0, 400.0, 800.0);
//! let result = overlap::compute(keyboard, Some(500.0), Some(400.0), 16.0);
//! assert_eq!(result.target, Some(36.0));
//! assert_eq!(result.boundary, None);
//! ```

use kurbo::Rect;

/// Positive overlaps found for one will-show transition.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OverlapResult {
    /// Overlap of the focus target's bottom edge, if a target exists and is overlapped.
    pub target: Option<f64>,
    /// Overlap of the content boundary, if it is overlapped.
    pub boundary: Option<f64>,
}

impl OverlapResult {
    /// True if neither line is overlapped.
    pub fn is_empty(&self) -> bool {
        self.target.is_none() && self.boundary.is_none()
    }
}

/// Overlap of a single reference line `line_y`, or `None` unless strictly positive.
pub fn line_overlap(keyboard_end: Rect, line_y: f64, offset: f64) -> Option<f64> {
    let overlap = (line_y + offset) - keyboard_end.origin().y;
    // NaN compares false as well.
    (overlap > 0.0).then_some(overlap)
}

/// Compute both overlaps against the keyboard's end frame.
///
/// `target_bottom` is the focus target's bottom edge in the host's coordinate space;
/// `boundary` is the content boundary. Either may be absent.
pub fn compute(
    keyboard_end: Rect,
    target_bottom: Option<f64>,
    boundary: Option<f64>,
    offset: f64,
) -> OverlapResult {
    OverlapResult {
        target: target_bottom.and_then(|y| line_overlap(keyboard_end, y, offset)),
        boundary: boundary.and_then(|y| line_overlap(keyboard_end, y, offset)),
    }
}
