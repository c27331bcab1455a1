// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: lifecycle signals, signal sets, the keyboard phase machine, and settings.
//!
//! ## Overview
//!
//! These types describe the keyboard lifecycle protocol.
//! They are consumed by the [`controller`](crate::controller) and by the
//! [`SignalSource`](crate::controller::SignalSource) implementations that feed it.

/// Offset preserved between the keyboard and a reference line when the observer
/// does not supply one.
///
/// Returned by the default
/// [`KeyboardObserver::offset_when_presenting`](crate::observer::KeyboardObserver::offset_when_presenting).
pub const DEFAULT_OFFSET: f64 = 16.0;

/// A keyboard lifecycle signal delivered by the platform.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifecycleSignal {
    /// The keyboard is about to appear (or change its final frame).
    WillShow,
    /// The keyboard finished appearing.
    DidShow,
    /// The keyboard is about to disappear.
    WillHide,
}

impl LifecycleSignal {
    /// All signals, in the order a full show/hide cycle delivers them.
    pub const ALL: [Self; 3] = [Self::WillShow, Self::DidShow, Self::WillHide];

    /// The single-bit [`SignalSet`] for this signal.
    pub const fn as_set(self) -> SignalSet {
        match self {
            Self::WillShow => SignalSet::WILL_SHOW,
            Self::DidShow => SignalSet::DID_SHOW,
            Self::WillHide => SignalSet::WILL_HIDE,
        }
    }
}

bitflags::bitflags! {
    /// A set of lifecycle signals a [`SignalSource`](crate::controller::SignalSource)
    /// is asked to deliver.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SignalSet: u8 {
        /// Deliver [`LifecycleSignal::WillShow`].
        const WILL_SHOW = 0b0000_0001;
        /// Deliver [`LifecycleSignal::DidShow`].
        const DID_SHOW  = 0b0000_0010;
        /// Deliver [`LifecycleSignal::WillHide`].
        const WILL_HIDE = 0b0000_0100;
    }
}

impl SignalSet {
    /// True if `signal` is part of this set.
    pub const fn includes(self, signal: LifecycleSignal) -> bool {
        self.contains(signal.as_set())
    }
}

/// Where the keyboard is in its show/hide cycle, as observed by a controller.
///
/// Transitions are driven only by [`LifecycleSignal`]s that carry a well-formed payload:
///
/// ```text
/// Hidden --WillShow--> Appearing --DidShow--> Shown --WillHide--> Disappearing --> Hidden
/// ```
///
/// There is no "did hide" signal: [`Disappearing`](Self::Disappearing) lasts while the
/// will-hide notification is dispatched, then [`settled`](Self::settled) returns to
/// `Hidden`. A new `WillShow` moves any phase to `Appearing`, and a `DidShow` that was
/// not preceded by one leaves the phase alone.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyboardPhase {
    /// No keyboard has been observed, or the controller was torn down.
    #[default]
    Hidden,
    /// A will-show signal was handled.
    Appearing,
    /// A did-show signal was handled.
    Shown,
    /// A will-hide signal is being handled.
    Disappearing,
}

impl KeyboardPhase {
    /// The phase after handling `signal`.
    pub const fn after(self, signal: LifecycleSignal) -> Self {
        match (self, signal) {
            (_, LifecycleSignal::WillShow) => Self::Appearing,
            (Self::Appearing | Self::Shown, LifecycleSignal::DidShow) => Self::Shown,
            (_, LifecycleSignal::DidShow) => self,
            (_, LifecycleSignal::WillHide) => Self::Disappearing,
        }
    }

    /// The phase once the signal that produced `self` has been dispatched.
    ///
    /// Only [`Disappearing`](Self::Disappearing) is transient; it settles to `Hidden`.
    pub const fn settled(self) -> Self {
        match self {
            Self::Disappearing => Self::Hidden,
            other => other,
        }
    }

    /// True while the keyboard is on screen or on its way there.
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Appearing | Self::Shown)
    }
}

/// Host-mutable switches read by the controller.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Tapping the host outside of an editing control dismisses the focus target.
    pub dismiss_on_outside_tap: bool,
    /// Content shifts should animate along with the keyboard.
    pub animate_shift_changes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dismiss_on_outside_tap: true,
            animate_shift_changes: true,
        }
    }
}
