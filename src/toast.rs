//! Toast display state
//!
//! At most one notification is visible. Showing a new one replaces the old
//! and restarts its timer. Time is passed in so the machine can be driven
//! deterministically.

use std::time::Instant;

use crate::models::Notification;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToastState {
    #[default]
    Hidden,
    Visible {
        notification: Notification,
        shown_at: Instant,
    },
}

impl ToastState {
    /// Show a notification, replacing any visible one
    pub fn show(&mut self, notification: Notification, now: Instant) {
        *self = ToastState::Visible {
            notification,
            shown_at: now,
        };
    }

    /// Hide once the visible notification has outlived its duration.
    /// Returns true when this call hid it.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = match self {
            ToastState::Visible {
                notification,
                shown_at,
            } => now.saturating_duration_since(*shown_at) >= notification.duration,
            ToastState::Hidden => false,
        };
        if expired {
            *self = ToastState::Hidden;
        }
        expired
    }

    /// Dismiss immediately
    pub fn close(&mut self) {
        *self = ToastState::Hidden;
    }

    pub fn current(&self) -> Option<&Notification> {
        match self {
            ToastState::Visible { notification, .. } => Some(notification),
            ToastState::Hidden => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, ToastState::Visible { .. })
    }
}
