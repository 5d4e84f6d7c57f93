//! Local interactive state for one rendered assistant message.
//!
//! This is owned by whoever draws the message, never shared across messages,
//! and reset when the message identity changes. The "copied" indicator is a
//! deadline rather than a timer: once the view is dropped nothing can flip it
//! back later.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Default time the copied indicator stays lit.
pub const DEFAULT_COPY_FEEDBACK: Duration = Duration::from_secs(2);

/// Helpful / not-helpful vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    #[default]
    Unset,
    Helpful,
    NotHelpful,
}

impl Feedback {
    /// Tri-state as an optional bool (`None` when unset).
    pub fn as_liked(self) -> Option<bool> {
        match self {
            Self::Unset => None,
            Self::Helpful => Some(true),
            Self::NotHelpful => Some(false),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageInteraction {
    message_id: String,
    feedback: Feedback,
    copied_at: Option<Instant>,
    copy_feedback: Duration,
}

impl MessageInteraction {
    pub fn new(message_id: impl Into<String>, copy_feedback: Duration) -> Self {
        Self {
            message_id: message_id.into(),
            feedback: Feedback::Unset,
            copied_at: None,
            copy_feedback,
        }
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn like(&mut self) {
        self.feedback = Feedback::Helpful;
    }

    pub fn dislike(&mut self) {
        self.feedback = Feedback::NotHelpful;
    }

    /// Record a copy at `now`. The indicator reverts `copy_feedback` later.
    pub fn record_copy(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.copy_feedback)
    }

    /// Time left until the copied indicator reverts, if it is lit.
    pub fn copied_remaining(&self, now: Instant) -> Option<Duration> {
        let at = self.copied_at?;
        self.copy_feedback
            .checked_sub(now.saturating_duration_since(at))
            .filter(|left| !left.is_zero())
    }

    /// Reset all state if the rendered message changed identity.
    ///
    /// Returns true when a reset happened.
    pub fn sync_identity(&mut self, message_id: &str) -> bool {
        if self.message_id == message_id {
            return false;
        }
        self.message_id = message_id.to_string();
        self.feedback = Feedback::Unset;
        self.copied_at = None;
        true
    }
}
