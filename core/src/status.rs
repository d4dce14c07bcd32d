//! Transient success messages with explicit clear tokens.
//!
//! Every message shown gets a fresh `StatusToken`. Clearing with a token
//! only works while that token's message is still the one displayed, so a
//! timer started for an older message cannot wipe a newer one.

use std::time::Duration;

/// Identifies one displayed status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusToken(u64);

impl StatusToken {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }
}

/// Handed to the host after a status is shown: call
/// `TodoView::clear_status(token)` once `delay` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTicket {
    pub token: StatusToken,
    pub delay: Duration,
}

#[derive(Debug, Default)]
pub struct StatusSlot {
    message: Option<String>,
    generation: u64,
}

impl StatusSlot {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn show(&mut self, message: impl Into<String>, delay: Duration) -> StatusTicket {
        self.generation += 1;
        self.message = Some(message.into());
        StatusTicket {
            token: StatusToken(self.generation),
            delay,
        }
    }

    /// Returns true when the message for `token` was still displayed.
    pub fn clear(&mut self, token: StatusToken) -> bool {
        if token.0 != self.generation || self.message.is_none() {
            return false;
        }
        self.message = None;
        true
    }
}
