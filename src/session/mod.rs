//! Recording session state machine.
//!
//! Tracks the three mutually exclusive screen states and guards the
//! asynchronous engine calls that move between them. An action is first
//! requested with [`Session::begin`], which validates it and marks the
//! operation in flight; once the underlying engine call succeeds the caller
//! confirms it, and on failure rolls it back, so the screen state never
//! drifts from the engine state. A second action while one is in flight is
//! rejected rather than racing the first.

use std::fmt;

/// The three mutually exclusive screen states.
///
/// Transitions form a cycle: stopping a recording always flows into playback,
/// and reset is the only way back to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing in progress; the record control is armed.
    Idle,
    /// Capturing audio and rendering the live bar visualization.
    Recording,
    /// Playing the freshly recorded memo with a position readout.
    Playing,
}

/// User-facing session actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Idle -> Recording
    Start,
    /// Recording -> Playing
    Stop,
    /// Playing -> Idle
    Reset,
}

/// Why a requested action was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The action is not valid in the current state.
    InvalidAction {
        state: SessionState,
        action: SessionAction,
    },
    /// Another action is still in flight.
    Busy,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidAction { state, action } => {
                write!(f, "action {action:?} is not valid in state {state:?}")
            }
            SessionError::Busy => write!(f, "another session operation is in flight"),
        }
    }
}

impl std::error::Error for SessionError {}

/// State machine for one recording session.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    pending: Option<SessionAction>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            pending: None,
        }
    }

    /// Current confirmed state. While an operation is in flight this is still
    /// the state the session was in before the operation was requested.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether an operation has been requested but not yet confirmed or failed.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Requests an action, validating it against the current state.
    ///
    /// On success the operation is marked in flight; the caller must follow up
    /// with [`Session::confirm`] or [`Session::fail`] once the engine call
    /// completes.
    ///
    /// # Errors
    /// - [`SessionError::Busy`] if another operation is in flight
    /// - [`SessionError::InvalidAction`] if the action does not apply to the
    ///   current state (callers treat this as a no-op)
    pub fn begin(&mut self, action: SessionAction) -> Result<(), SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::Busy);
        }

        let valid = matches!(
            (self.state, action),
            (SessionState::Idle, SessionAction::Start)
                | (SessionState::Recording, SessionAction::Stop)
                | (SessionState::Playing, SessionAction::Reset)
        );
        if !valid {
            return Err(SessionError::InvalidAction {
                state: self.state,
                action,
            });
        }

        self.pending = Some(action);
        Ok(())
    }

    /// Confirms the in-flight operation, moving to its target state.
    pub fn confirm(&mut self) {
        match self.pending.take() {
            Some(SessionAction::Start) => self.state = SessionState::Recording,
            Some(SessionAction::Stop) => self.state = SessionState::Playing,
            Some(SessionAction::Reset) => self.state = SessionState::Idle,
            None => tracing::warn!("Session::confirm called with no operation in flight"),
        }
    }

    /// Rolls back the in-flight operation, keeping the prior state.
    pub fn fail(&mut self) {
        if self.pending.take().is_none() {
            tracing::warn!("Session::fail called with no operation in flight");
        }
    }

    /// Forces the session back to idle, discarding any in-flight operation.
    ///
    /// Used when the engine is torn down out of band (quit while recording or
    /// playing).
    pub fn abort(&mut self) {
        self.pending = None;
        self.state = SessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance(session: &mut Session, action: SessionAction) {
        session.begin(action).unwrap();
        session.confirm();
    }

    #[test]
    fn test_full_cycle() {
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::Idle);

        advance(&mut session, SessionAction::Start);
        assert_eq!(session.state(), SessionState::Recording);

        advance(&mut session, SessionAction::Stop);
        assert_eq!(session.state(), SessionState::Playing);

        advance(&mut session, SessionAction::Reset);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_only_one_action_valid_per_state() {
        let cases = [
            (SessionState::Idle, SessionAction::Start),
            (SessionState::Recording, SessionAction::Stop),
            (SessionState::Playing, SessionAction::Reset),
        ];

        for (state, valid_action) in cases {
            for action in [SessionAction::Start, SessionAction::Stop, SessionAction::Reset] {
                let mut session = Session::new();
                // Drive the session to the state under test
                if state != SessionState::Idle {
                    advance(&mut session, SessionAction::Start);
                }
                if state == SessionState::Playing {
                    advance(&mut session, SessionAction::Stop);
                }
                assert_eq!(session.state(), state);

                let result = session.begin(action);
                if action == valid_action {
                    assert!(result.is_ok());
                } else {
                    assert_eq!(
                        result,
                        Err(SessionError::InvalidAction { state, action })
                    );
                    // Rejected actions leave the state untouched
                    assert_eq!(session.state(), state);
                    assert!(!session.is_busy());
                }
            }
        }
    }

    #[test]
    fn test_second_action_while_in_flight_is_rejected() {
        let mut session = Session::new();
        session.begin(SessionAction::Start).unwrap();
        assert!(session.is_busy());
        assert_eq!(session.begin(SessionAction::Start), Err(SessionError::Busy));
        assert_eq!(session.begin(SessionAction::Stop), Err(SessionError::Busy));
        session.confirm();
        assert!(!session.is_busy());
        assert_eq!(session.state(), SessionState::Recording);
    }

    #[test]
    fn test_failed_operation_rolls_back() {
        let mut session = Session::new();
        session.begin(SessionAction::Start).unwrap();
        session.fail();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.is_busy());
        // The session remains usable after a rollback
        session.begin(SessionAction::Start).unwrap();
        session.confirm();
        assert_eq!(session.state(), SessionState::Recording);
    }

    #[test]
    fn test_abort_returns_to_idle() {
        let mut session = Session::new();
        advance(&mut session, SessionAction::Start);
        session.begin(SessionAction::Stop).unwrap();
        session.abort();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.is_busy());
    }
}
