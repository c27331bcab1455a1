// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard events: raw payloads, parsing, and animation parameters.
//!
//! ## Overview
//!
//! A platform delivers each lifecycle signal with a loosely typed [`Payload`].
//! `KeyboardEvent::try_from` parses it all at once: either every field is
//! populated, or parsing fails with [`MalformedPayload`] and no event exists.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Rect;
//! use understory_keyboard::event::{AnimationCurve, KeyboardEvent, Payload, PayloadKey, PayloadValue};
//!
//! let payload = Payload::new()
//!     .with(PayloadKey::FrameBegin, PayloadValue::Rect(Rect::new(0.0, 800.0, 400.0, 1100.0)))
//!     .with(PayloadKey::FrameEnd, PayloadValue::Rect(Rect::new(0.0, 500.0, 400.0, 800.0)))
//!     .with(PayloadKey::AnimationDuration, PayloadValue::Number(0.25))
//!     .with(PayloadKey::AnimationCurve, PayloadValue::Integer(2));
//!
//! let event = KeyboardEvent::try_from(&payload).unwrap();
//! assert_eq!(event.animation_curve(), AnimationCurve::EaseInOut);
//! assert!(event.is_local());
//! ```

use alloc::collections::BTreeMap;

use kurbo::{CubicBez, Rect};

/// Keys of a raw keyboard payload.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PayloadKey {
    /// Keyboard frame before the transition, in screen coordinates.
    FrameBegin,
    /// Keyboard frame after the transition, in screen coordinates.
    FrameEnd,
    /// Animation duration in seconds.
    AnimationDuration,
    /// Animation curve code, see [`AnimationCurve::from_code`].
    AnimationCurve,
    /// Whether this process caused the transition. Optional; a boolean or an
    /// integral number, where zero is `false`.
    IsLocal,
}

/// A loosely typed payload value, as boxed by the platform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PayloadValue {
    /// A rectangle.
    Rect(Rect),
    /// A floating point number.
    Number(f64),
    /// An integer.
    Integer(i64),
    /// A boolean.
    Bool(bool),
}

impl PayloadValue {
    fn as_rect(self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(r),
            _ => None,
        }
    }

    fn as_f64(self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n),
            Self::Integer(i) => Some(i as f64),
            _ => None,
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "the round trip below rejects any value the cast changed"
    )]
    fn as_i64(self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(i),
            Self::Number(n) => {
                let i = n as i64;
                (i as f64 == n).then_some(i)
            }
            _ => None,
        }
    }

    fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(b),
            Self::Integer(_) | Self::Number(_) => self.as_i64().map(|i| i != 0),
            Self::Rect(_) => None,
        }
    }
}

/// A raw key/value payload attached to a lifecycle signal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Payload {
    entries: BTreeMap<PayloadKey, PayloadValue>,
}

impl Payload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Payload::insert`].
    #[must_use]
    pub fn with(mut self, key: PayloadKey, value: PayloadValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, returning the previous value if any.
    pub fn insert(&mut self, key: PayloadKey, value: PayloadValue) -> Option<PayloadValue> {
        self.entries.insert(key, value)
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&mut self, key: PayloadKey) -> Option<PayloadValue> {
        self.entries.remove(&key)
    }

    /// Look up `key`.
    pub fn get(&self, key: PayloadKey) -> Option<PayloadValue> {
        self.entries.get(&key).copied()
    }

    fn require<T>(
        &self,
        key: PayloadKey,
        convert: impl FnOnce(PayloadValue) -> Option<T>,
    ) -> Result<T, MalformedPayload> {
        let value = self.get(key).ok_or(MalformedPayload::Missing(key))?;
        convert(value).ok_or(MalformedPayload::WrongType { key })
    }

    fn frame(&self, key: PayloadKey) -> Result<Rect, MalformedPayload> {
        let rect = self.require(key, PayloadValue::as_rect)?;
        if rect.is_finite() {
            Ok(rect)
        } else {
            Err(MalformedPayload::NonFiniteFrame(key))
        }
    }
}

/// The one failure a payload can produce: it does not describe a complete event.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MalformedPayload {
    /// A mandatory entry is absent.
    #[error("missing payload entry {0:?}")]
    Missing(PayloadKey),
    /// An entry holds a value of the wrong kind.
    #[error("payload entry {key:?} has the wrong type")]
    WrongType {
        /// The offending key.
        key: PayloadKey,
    },
    /// The curve code is outside the known range.
    #[error("unknown animation curve code {0}")]
    UnknownCurve(i64),
    /// The duration is negative or not finite.
    #[error("invalid animation duration {0}")]
    InvalidDuration(f64),
    /// A frame has a non-finite coordinate.
    #[error("non-finite frame in {0:?}")]
    NonFiniteFrame(PayloadKey),
}

/// Easing used by the keyboard animation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationCurve {
    /// Slow start.
    EaseIn,
    /// Slow end.
    EaseOut,
    /// Slow start and end.
    EaseInOut,
    /// Constant speed.
    Linear,
}

impl AnimationCurve {
    /// Map a platform curve code: `0` ease-in, `1` ease-out, `2` ease-in-out, `3` linear.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::EaseIn),
            1 => Some(Self::EaseOut),
            2 => Some(Self::EaseInOut),
            3 => Some(Self::Linear),
            _ => None,
        }
    }

    /// The curve as a unit timing function from `(0, 0)` to `(1, 1)`.
    pub fn to_cubic_bez(self) -> CubicBez {
        let (p1, p2) = match self {
            Self::EaseIn => ((0.42, 0.0), (1.0, 1.0)),
            Self::EaseOut => ((0.0, 0.0), (0.58, 1.0)),
            Self::EaseInOut => ((0.42, 0.0), (0.58, 1.0)),
            Self::Linear => ((0.0, 0.0), (1.0, 1.0)),
        };
        CubicBez::new((0.0, 0.0), p1, p2, (1.0, 1.0))
    }
}

impl TryFrom<i64> for AnimationCurve {
    type Error = MalformedPayload;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(MalformedPayload::UnknownCurve(code))
    }
}

/// Parameters for an animation that runs alongside the keyboard.
///
/// Hand these to the toolkit's animation primitive; this crate never animates.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationParams {
    /// Duration in seconds.
    pub duration: f64,
    /// Easing.
    pub curve: AnimationCurve,
    /// Delay before starting, in seconds.
    pub delay: f64,
}

/// One keyboard lifecycle transition.
///
/// Only obtainable by parsing a [`Payload`], so a value is always complete.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    begin_frame: Rect,
    end_frame: Rect,
    animation_duration: f64,
    animation_curve: AnimationCurve,
    is_local: bool,
}

impl KeyboardEvent {
    /// Keyboard frame before the transition, in screen coordinates for the
    /// orientation at capture time.
    pub fn begin_frame(&self) -> Rect {
        self.begin_frame
    }

    /// Keyboard frame after the transition; overlap is measured against this.
    pub fn end_frame(&self) -> Rect {
        self.end_frame
    }

    /// Animation duration in seconds (finite, non-negative).
    pub fn animation_duration(&self) -> f64 {
        self.animation_duration
    }

    /// Animation easing.
    pub fn animation_curve(&self) -> AnimationCurve {
        self.animation_curve
    }

    /// Whether this process caused the transition.
    ///
    /// Informational only: every process sharing the keyboard is notified.
    /// `true` when the platform does not report it.
    pub fn is_local(&self) -> bool {
        self.is_local
    }

    /// Parameters to animate alongside this transition after `delay` seconds.
    pub fn animation(&self, delay: f64) -> AnimationParams {
        AnimationParams {
            duration: self.animation_duration,
            curve: self.animation_curve,
            delay,
        }
    }
}

impl TryFrom<&Payload> for KeyboardEvent {
    type Error = MalformedPayload;

    fn try_from(payload: &Payload) -> Result<Self, Self::Error> {
        let begin_frame = payload.frame(PayloadKey::FrameBegin)?;
        let end_frame = payload.frame(PayloadKey::FrameEnd)?;
        let animation_duration =
            payload.require(PayloadKey::AnimationDuration, PayloadValue::as_f64)?;
        if !animation_duration.is_finite() || animation_duration < 0.0 {
            return Err(MalformedPayload::InvalidDuration(animation_duration));
        }
        let code = payload.require(PayloadKey::AnimationCurve, PayloadValue::as_i64)?;
        let animation_curve = AnimationCurve::try_from(code)?;
        let is_local = match payload.get(PayloadKey::IsLocal) {
            None => true,
            Some(v) => v.as_bool().ok_or(MalformedPayload::WrongType {
                key: PayloadKey::IsLocal,
            })?,
        };
        Ok(Self {
            begin_frame,
            end_frame,
            animation_duration,
            animation_curve,
            is_local,
        })
    }
}
