//! Session State Machine
//!
//! Tracks where the client is between the menu, a local match and the two
//! online roles.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Session states
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsmState {
    Idle,
    PlayingLocal,
    Connecting,
    /// Room open, waiting for someone to join
    WaitingForPeer,
    /// Seated as client, waiting for the room to start
    WaitingForStart,
    PlayingHost,
    PlayingClient,
    GameOver,
    Disconnected,
}

/// Actions that trigger state transitions
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    StartLocal,
    CreateRoom,
    JoinRoom,
    RoomCreated,
    Joined,
    RoomReady,
    ConnectionFailed,
    MatchOver,
    RoomClosed,
    PlayAgain,
    Leave,
}

/// Result of a state transition
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
#[derive(Debug, Clone)]
pub struct TransitionResult {
    success: bool,
    from_state: FsmState,
    to_state: FsmState,
    action: GameAction,
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
impl TransitionResult {
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(getter))]
    pub fn success(&self) -> bool {
        self.success
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(getter))]
    #[allow(clippy::wrong_self_convention)]
    pub fn from_state(&self) -> FsmState {
        self.from_state
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(getter))]
    pub fn to_state(&self) -> FsmState {
        self.to_state
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(getter))]
    pub fn action(&self) -> GameAction {
        self.action
    }
}

/// Session Finite State Machine
#[derive(Debug, Clone)]
pub struct GameFsm {
    state: FsmState,
    /// Whether the last match was local, for `PlayAgain`
    last_local: bool,
}

impl GameFsm {
    pub fn new() -> Self {
        Self {
            state: FsmState::Idle,
            last_local: false,
        }
    }

    /// Get current state
    pub fn state(&self) -> FsmState {
        self.state
    }

    /// Check if a transition is valid
    pub fn can_transition(&self, action: GameAction) -> bool {
        self.get_next_state(action).is_some()
    }

    /// Attempt a transition
    pub fn transition(&mut self, action: GameAction) -> TransitionResult {
        let from_state = self.state;

        if let Some(next_state) = self.get_next_state(action) {
            self.state = next_state;
            match next_state {
                FsmState::PlayingLocal => self.last_local = true,
                FsmState::PlayingHost | FsmState::PlayingClient => self.last_local = false,
                _ => {}
            }
            tracing::debug!(?from_state, ?action, to_state = ?next_state, "transition");
            TransitionResult {
                success: true,
                from_state,
                to_state: next_state,
                action,
            }
        } else {
            tracing::warn!(?from_state, ?action, "rejected transition");
            TransitionResult {
                success: false,
                from_state,
                to_state: from_state,
                action,
            }
        }
    }

    /// Get next state for a given action (if valid)
    fn get_next_state(&self, action: GameAction) -> Option<FsmState> {
        match (self.state, action) {
            // From Idle
            (FsmState::Idle, GameAction::StartLocal) => Some(FsmState::PlayingLocal),
            (FsmState::Idle, GameAction::CreateRoom) => Some(FsmState::Connecting),
            (FsmState::Idle, GameAction::JoinRoom) => Some(FsmState::Connecting),

            // From PlayingLocal
            (FsmState::PlayingLocal, GameAction::MatchOver) => Some(FsmState::GameOver),
            (FsmState::PlayingLocal, GameAction::Leave) => Some(FsmState::Idle),

            // From Connecting
            (FsmState::Connecting, GameAction::RoomCreated) => Some(FsmState::WaitingForPeer),
            (FsmState::Connecting, GameAction::Joined) => Some(FsmState::WaitingForStart),
            (FsmState::Connecting, GameAction::ConnectionFailed) => Some(FsmState::Idle),
            (FsmState::Connecting, GameAction::Leave) => Some(FsmState::Idle),

            // Waiting in a room
            (FsmState::WaitingForPeer, GameAction::RoomReady) => Some(FsmState::PlayingHost),
            (FsmState::WaitingForStart, GameAction::RoomReady) => Some(FsmState::PlayingClient),
            (FsmState::WaitingForPeer | FsmState::WaitingForStart, GameAction::ConnectionFailed) => {
                Some(FsmState::Idle)
            }

            // Online play
            (FsmState::PlayingHost | FsmState::PlayingClient, GameAction::MatchOver) => {
                Some(FsmState::GameOver)
            }

            // From GameOver
            (FsmState::GameOver, GameAction::PlayAgain) if self.last_local => {
                Some(FsmState::PlayingLocal)
            }

            // The room is gone; online states drop to Disconnected
            (
                FsmState::WaitingForPeer
                | FsmState::WaitingForStart
                | FsmState::PlayingHost
                | FsmState::PlayingClient,
                GameAction::RoomClosed,
            ) => Some(FsmState::Disconnected),
            (FsmState::GameOver, GameAction::RoomClosed) if !self.last_local => {
                Some(FsmState::Disconnected)
            }

            // Leave always returns to the menu
            (state, GameAction::Leave) if state != FsmState::Idle => Some(FsmState::Idle),

            // Invalid transition
            _ => None,
        }
    }

    /// Reset to Idle state
    pub fn reset(&mut self) {
        self.state = FsmState::Idle;
    }

    /// Check if currently in a playing state
    pub fn is_playing(&self) -> bool {
        matches!(
            self.state,
            FsmState::PlayingLocal | FsmState::PlayingHost | FsmState::PlayingClient
        )
    }

    /// Check if in an online state
    pub fn is_online(&self) -> bool {
        matches!(
            self.state,
            FsmState::Connecting
                | FsmState::WaitingForPeer
                | FsmState::WaitingForStart
                | FsmState::PlayingHost
                | FsmState::PlayingClient
        ) || (self.state == FsmState::GameOver && !self.last_local)
    }

    /// Check if in game over state
    pub fn is_game_over(&self) -> bool {
        self.state == FsmState::GameOver
    }
}

impl Default for GameFsm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let fsm = GameFsm::new();
        assert_eq!(fsm.state(), FsmState::Idle);
    }

    #[test]
    fn test_invalid_transition() {
        let mut fsm = GameFsm::new();
        let result = fsm.transition(GameAction::MatchOver);
        assert!(!result.success());
        assert_eq!(fsm.state(), FsmState::Idle);
        assert!(!fsm.can_transition(GameAction::RoomReady));
    }

    #[test]
    fn test_local_game_flow() {
        let mut fsm = GameFsm::new();
        fsm.transition(GameAction::StartLocal);
        assert!(fsm.is_playing());
        fsm.transition(GameAction::MatchOver);
        assert_eq!(fsm.state(), FsmState::GameOver);
        assert!(!fsm.is_online());
        fsm.transition(GameAction::PlayAgain);
        assert_eq!(fsm.state(), FsmState::PlayingLocal);
    }

    #[test]
    fn test_host_flow() {
        let mut fsm = GameFsm::new();
        fsm.transition(GameAction::CreateRoom);
        assert_eq!(fsm.state(), FsmState::Connecting);
        fsm.transition(GameAction::RoomCreated);
        assert_eq!(fsm.state(), FsmState::WaitingForPeer);
        fsm.transition(GameAction::RoomReady);
        assert_eq!(fsm.state(), FsmState::PlayingHost);
        fsm.transition(GameAction::MatchOver);
        assert!(fsm.is_online());
        assert!(!fsm.can_transition(GameAction::PlayAgain));
    }

    #[test]
    fn test_client_flow() {
        let mut fsm = GameFsm::new();
        fsm.transition(GameAction::JoinRoom);
        fsm.transition(GameAction::Joined);
        assert_eq!(fsm.state(), FsmState::WaitingForStart);
        fsm.transition(GameAction::RoomReady);
        assert_eq!(fsm.state(), FsmState::PlayingClient);
    }

    #[test]
    fn test_failed_connection_is_retryable() {
        let mut fsm = GameFsm::new();
        fsm.transition(GameAction::JoinRoom);
        fsm.transition(GameAction::ConnectionFailed);
        assert_eq!(fsm.state(), FsmState::Idle);
        assert!(fsm.transition(GameAction::JoinRoom).success());
    }

    #[test]
    fn test_room_closed_mid_match() {
        let mut fsm = GameFsm::new();
        fsm.transition(GameAction::CreateRoom);
        fsm.transition(GameAction::RoomCreated);
        fsm.transition(GameAction::RoomReady);
        fsm.transition(GameAction::RoomClosed);
        assert_eq!(fsm.state(), FsmState::Disconnected);
        fsm.transition(GameAction::Leave);
        assert_eq!(fsm.state(), FsmState::Idle);
    }
}
