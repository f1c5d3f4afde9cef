/// Session state definitions for tracking a single page visit
///
/// This module defines every state a page visit moves through and which
/// transitions between them are legal.
use std::fmt;
use thiserror::Error;

/// Errors raised by the session state machine
///
/// These indicate a programming error in the runner, not a page failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },
}

/// Represents the current state of a page visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    // ===== Active States =====
    /// Page has been dequeued but nothing has happened yet
    Pending,

    /// Navigation request issued, waiting for load or timeout
    Navigating,

    /// Navigation succeeded, waiting for client-side rendering to quiesce
    Settling,

    /// Primary response status inspected
    StatusChecked,

    /// Detectors are running against the page
    Inspecting,

    /// Collecting hyperlinks for the frontier
    LinkDiscovery,

    // ===== Terminal States =====
    /// Session completed normally
    Done,

    /// Navigation failed or timed out; no detector ran
    FailedNavigation,
}

impl SessionState {
    /// Returns true if this is a terminal state (no further processing)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::FailedNavigation)
    }

    /// Returns true if this is an active state
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the page was loaded and inspected
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the state that follows this one on the happy path
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Navigating),
            Self::Navigating => Some(Self::Settling),
            Self::Settling => Some(Self::StatusChecked),
            Self::StatusChecked => Some(Self::Inspecting),
            Self::Inspecting => Some(Self::LinkDiscovery),
            Self::LinkDiscovery => Some(Self::Done),
            Self::Done | Self::FailedNavigation => None,
        }
    }

    /// Returns true if moving from `self` to `to` is legal
    ///
    /// The only branch off the happy path is `Navigating -> FailedNavigation`.
    pub fn can_transition_to(&self, to: SessionState) -> bool {
        if *self == Self::Navigating && to == Self::FailedNavigation {
            return true;
        }
        self.next() == Some(to)
    }

    /// Validates and returns the new state
    pub fn transition(self, to: SessionState) -> Result<SessionState, SessionError> {
        if self.can_transition_to(to) {
            tracing::trace!("Session transition {} -> {}", self, to);
            Ok(to)
        } else {
            Err(SessionError::InvalidTransition { from: self, to })
        }
    }

    /// Returns a stable lowercase name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Navigating => "navigating",
            Self::Settling => "settling",
            Self::StatusChecked => "status_checked",
            Self::Inspecting => "inspecting",
            Self::LinkDiscovery => "link_discovery",
            Self::Done => "done",
            Self::FailedNavigation => "failed_navigation",
        }
    }

    /// Returns all possible session states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Navigating,
            Self::Settling,
            Self::StatusChecked,
            Self::Inspecting,
            Self::LinkDiscovery,
            Self::Done,
            Self::FailedNavigation,
        ]
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(SessionState::Done.is_terminal());
        assert!(SessionState::FailedNavigation.is_terminal());

        assert!(!SessionState::Pending.is_terminal());
        assert!(!SessionState::Navigating.is_terminal());
        assert!(!SessionState::Settling.is_terminal());
        assert!(!SessionState::StatusChecked.is_terminal());
        assert!(!SessionState::Inspecting.is_terminal());
        assert!(!SessionState::LinkDiscovery.is_terminal());
    }

    #[test]
    fn test_is_success() {
        assert!(SessionState::Done.is_success());
        assert!(!SessionState::FailedNavigation.is_success());
        assert!(!SessionState::Inspecting.is_success());
    }

    #[test]
    fn test_happy_path_walks_to_done() {
        let mut state = SessionState::Pending;
        let mut steps = 0;
        while let Some(next) = state.next() {
            state = state.transition(next).unwrap();
            steps += 1;
        }
        assert_eq!(state, SessionState::Done);
        assert_eq!(steps, 6);
    }

    #[test]
    fn test_failed_navigation_only_from_navigating() {
        assert!(SessionState::Navigating.can_transition_to(SessionState::FailedNavigation));

        for state in SessionState::all_states() {
            if state != SessionState::Navigating {
                assert!(
                    !state.can_transition_to(SessionState::FailedNavigation),
                    "{} should not fail navigation",
                    state
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        for to in SessionState::all_states() {
            assert!(!SessionState::Done.can_transition_to(to));
            assert!(!SessionState::FailedNavigation.can_transition_to(to));
        }
    }

    #[test]
    fn test_skipping_states_is_rejected() {
        let err = SessionState::Navigating
            .transition(SessionState::Inspecting)
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                from: SessionState::Navigating,
                to: SessionState::Inspecting,
            }
        );
        assert_eq!(
            err.to_string(),
            "Invalid state transition: navigating -> inspecting"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", SessionState::Pending), "pending");
        assert_eq!(format!("{}", SessionState::StatusChecked), "status_checked");
        assert_eq!(
            format!("{}", SessionState::FailedNavigation),
            "failed_navigation"
        );
    }

    #[test]
    fn test_all_states_complete() {
        let all = SessionState::all_states();
        assert_eq!(all.len(), 8);

        for i in 0..all.len() {
            for j in (i + 1)..all.len() {
                assert_ne!(all[i], all[j], "Duplicate state found");
            }
        }
    }
}
