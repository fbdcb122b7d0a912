//! One player's session: menu, local match or either end of an online room.
//!
//! The session owns exactly one writer of match state per role. Local and
//! host sessions run the physics step; a client session only applies host
//! snapshots. Outgoing frames are queued in an outbox the JS transport drains.

use game_core::{
    Command, FrameClock, InputFrame, MatchConfig, Opponent, Reporter, Side, Snapshot,
    StatsTotals, Time, Tuning,
};
use glam::Vec2;
use proto::{RoomSummary, C2S, S2C};

use crate::error::ClientError;
use crate::fsm::{FsmState, GameAction, GameFsm};
use crate::input::InputState;
use crate::network;
use crate::simulation::LocalGame;
use crate::state::RemoteView;

/// Gap between keepalive pings while nothing else is being sent
pub const KEEPALIVE_MS: u64 = 20_000;

/// Which end of the match this session drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Local,
    Host,
    Client,
}

impl Role {
    pub fn side(self) -> Side {
        match self {
            Role::Local | Role::Host => Side::Left,
            Role::Client => Side::Right,
        }
    }
}

pub struct Session {
    fsm: GameFsm,
    role: Option<Role>,
    code: Option<String>,
    config: MatchConfig,
    local_opponent: Opponent,
    game: Option<LocalGame>,
    remote: RemoteView,
    pub input: InputState,
    outbox: Vec<Vec<u8>>,
    clock: FrameClock,
    reporter: Reporter<StatsTotals>,
    rooms: Vec<RoomSummary>,
    rtt_ms: Option<u32>,
    last_frame_ms: u64,
    last_ping_ms: Option<u64>,
    seed: u64,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self {
            fsm: GameFsm::new(),
            role: None,
            code: None,
            config: MatchConfig::default(),
            local_opponent: Opponent::Human,
            game: None,
            remote: RemoteView::new(),
            input: InputState::new(),
            outbox: Vec::new(),
            clock: FrameClock::new(),
            reporter: Reporter::new(Side::Left, StatsTotals::default()),
            rooms: Vec::new(),
            rtt_ms: None,
            last_frame_ms: 0,
            last_ping_ms: None,
            seed,
        }
    }

    fn transition(&mut self, action: GameAction) -> Result<FsmState, ClientError> {
        let result = self.fsm.transition(action);
        if result.success() {
            Ok(result.to_state())
        } else {
            Err(ClientError::Transition {
                from: result.from_state(),
                action,
            })
        }
    }

    fn next_seed(&mut self) -> u64 {
        self.seed = self.seed.wrapping_add(1);
        self.seed
    }

    fn push(&mut self, msg: &C2S) -> Result<(), ClientError> {
        let bytes = network::encode(msg)?;
        self.outbox.push(bytes);
        Ok(())
    }

    /// Fresh simulation for a local or hosted match
    fn begin_game(&mut self, role: Role, opponent: Opponent) {
        let tuning = Tuning::for_match(&self.config, role.side(), opponent);
        let seed = self.next_seed();
        self.game = Some(LocalGame::new(self.config, tuning, seed));
        self.reporter.rearm(role.side());
        self.role = Some(role);
    }

    // ------------------------------------------------------------------
    // Menu actions
    // ------------------------------------------------------------------

    pub fn start_local(&mut self, config: MatchConfig, opponent: Opponent) -> Result<(), ClientError> {
        config.validate()?;
        self.transition(GameAction::StartLocal)?;
        self.config = config;
        self.local_opponent = opponent;
        self.begin_game(Role::Local, opponent);
        tracing::info!(?opponent, "local match started");
        Ok(())
    }

    /// Restart a finished local match with the same setup
    pub fn play_again(&mut self) -> Result<(), ClientError> {
        self.transition(GameAction::PlayAgain)?;
        let opponent = self.local_opponent;
        self.begin_game(Role::Local, opponent);
        Ok(())
    }

    pub fn create_room(
        &mut self,
        host_name: &str,
        room_name: &str,
        password: Option<&str>,
        config: MatchConfig,
    ) -> Result<(), ClientError> {
        config.validate()?;
        self.transition(GameAction::CreateRoom)?;
        self.role = Some(Role::Host);
        self.config = config;
        self.push(&C2S::CreateRoom {
            host_name: host_name.to_string(),
            room_name: room_name.to_string(),
            password: password.filter(|p| !p.is_empty()).map(String::from),
            config,
        })
    }

    pub fn join_room(&mut self, code: &str, password: Option<&str>) -> Result<(), ClientError> {
        let bytes = network::create_join_message(code, password)?;
        self.transition(GameAction::JoinRoom)?;
        self.role = Some(Role::Client);
        self.outbox.push(bytes);
        Ok(())
    }

    pub fn list_rooms(&mut self) -> Result<(), ClientError> {
        self.push(&C2S::ListRooms)
    }

    pub fn ping(&mut self) -> Result<(), ClientError> {
        // Frame timestamps fit u32 for ~49 days of uptime
        let t_ms = self.last_frame_ms as u32;
        self.outbox.push(network::create_ping_message(t_ms)?);
        self.last_ping_ms = Some(self.last_frame_ms);
        Ok(())
    }

    /// The transport failed. Before play this is retryable; during play the
    /// view stays on its last state.
    pub fn connection_failed(&mut self) {
        if self.fsm.state() == FsmState::Connecting
            || self.fsm.state() == FsmState::WaitingForPeer
            || self.fsm.state() == FsmState::WaitingForStart
        {
            self.fsm.transition(GameAction::ConnectionFailed);
            self.role = None;
            self.code = None;
        } else if self.fsm.is_online() {
            self.remote.freeze();
            self.fsm.transition(GameAction::RoomClosed);
        }
    }

    pub fn leave(&mut self) -> Result<(), ClientError> {
        self.transition(GameAction::Leave)?;
        self.game = None;
        self.remote = RemoteView::new();
        self.role = None;
        self.code = None;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Inbound
    // ------------------------------------------------------------------

    pub fn handle_bytes(&mut self, bytes: &[u8]) -> Result<(), ClientError> {
        let msg = network::decode(bytes)?;
        self.handle_message(msg)
    }

    pub fn handle_message(&mut self, msg: S2C) -> Result<(), ClientError> {
        match msg {
            S2C::RoomCreated { code, config } => {
                self.transition(GameAction::RoomCreated)?;
                tracing::info!(%code, "room created");
                self.code = Some(code);
                self.config = config;
            }
            S2C::CreateRejected { reason } => {
                self.connection_failed();
                return Err(ClientError::CreateRejected(reason));
            }
            S2C::Joined { code, config } => {
                self.transition(GameAction::Joined)?;
                tracing::info!(%code, "joined room");
                self.code = Some(code);
                self.config = config;
            }
            S2C::JoinRejected { reason } => {
                self.connection_failed();
                return Err(ClientError::JoinRejected(reason));
            }
            S2C::RoomList { rooms } => {
                self.rooms = rooms;
            }
            S2C::RoomReady { config } => {
                let next = self.transition(GameAction::RoomReady)?;
                self.config = config;
                match next {
                    FsmState::PlayingHost => self.begin_game(Role::Host, Opponent::Human),
                    _ => {
                        self.remote = RemoteView::new();
                        self.reporter.rearm(Role::Client.side());
                    }
                }
            }
            S2C::RoomClosed => {
                self.remote.freeze();
                if self.fsm.can_transition(GameAction::RoomClosed) {
                    self.fsm.transition(GameAction::RoomClosed);
                }
            }
            S2C::State(snapshot) => {
                if self.fsm.state() == FsmState::PlayingClient {
                    self.remote.apply(&snapshot);
                }
            }
            S2C::PeerInput { target_y } => {
                if let (Some(Role::Host), Some(game)) = (self.role, self.game.as_mut()) {
                    game.set_peer_input(target_y);
                }
            }
            S2C::MatchOver { result } => {
                if self.role == Some(Role::Client) && self.remote.finish(result) {
                    self.reporter.deliver(&result);
                    if self.fsm.can_transition(GameAction::MatchOver) {
                        self.fsm.transition(GameAction::MatchOver);
                    }
                }
            }
            S2C::Pong { t_ms } => {
                let rtt = (self.last_frame_ms as u32).wrapping_sub(t_ms);
                self.rtt_ms = Some(rtt);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Per-frame
    // ------------------------------------------------------------------

    /// Run one animation frame. At most one physics step per call.
    pub fn frame(&mut self, now_ms: f64) -> Result<(), ClientError> {
        let Some(time) = self.clock.on_frame(now_ms) else {
            return Ok(());
        };
        self.last_frame_ms = time.now_ms;
        let input = self.input.frame();

        let state = self.fsm.state();
        match state {
            FsmState::PlayingLocal => self.step_local(&input, &time),
            // A finished local match keeps stepping so a Reset can restart it
            FsmState::GameOver if self.role == Some(Role::Local) => self.step_local(&input, &time),
            FsmState::PlayingHost => self.step_host(&input, &time)?,
            FsmState::PlayingClient => {
                if let Some(code) = self.code.as_deref() {
                    self.outbox
                        .push(network::create_input_message(code, input.local)?);
                }
                self.remote.tick();
            }
            _ => {}
        }

        let idle_online = matches!(state, FsmState::WaitingForPeer | FsmState::WaitingForStart)
            || (state == FsmState::GameOver && self.fsm.is_online());
        if idle_online {
            self.keepalive()?;
        } else {
            self.last_ping_ms = None;
        }
        Ok(())
    }

    /// Ping the relay when the room is otherwise silent so the idle sweep
    /// leaves it alone
    fn keepalive(&mut self) -> Result<(), ClientError> {
        match self.last_ping_ms {
            None => self.last_ping_ms = Some(self.last_frame_ms),
            Some(last) if self.last_frame_ms.saturating_sub(last) >= KEEPALIVE_MS => self.ping()?,
            Some(_) => {}
        }
        Ok(())
    }

    fn step_local(&mut self, input: &InputFrame, time: &Time) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        let events = game.step(input, time);
        let restarted = events.command_applied == Some(Command::Reset);
        let reported = self.reporter.observe(events).is_some();

        if restarted && self.fsm.state() == FsmState::GameOver {
            tracing::info!("local match reset");
            self.fsm.transition(GameAction::PlayAgain);
        }
        if reported {
            self.fsm.transition(GameAction::MatchOver);
        }
    }

    fn step_host(&mut self, input: &InputFrame, time: &Time) -> Result<(), ClientError> {
        let (Some(game), Some(code)) = (self.game.as_mut(), self.code.clone()) else {
            return Ok(());
        };
        let events = game.step(input, time);
        let over = events.match_over;
        let reported = self.reporter.observe(events).is_some();
        let snapshot = game.snapshot();

        self.push(&C2S::StatePush {
            code: code.clone(),
            snapshot,
        })?;
        if let Some(result) = over {
            self.push(&C2S::MatchOver { code, result })?;
        }
        if reported {
            self.fsm.transition(GameAction::MatchOver);
        }
        Ok(())
    }

    /// Frames queued for the transport since the last call
    pub fn take_outbox(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.outbox)
    }

    // ------------------------------------------------------------------
    // Debug controls (only where this session owns the simulation)
    // ------------------------------------------------------------------

    /// Queue a debug command. Only a running local or hosted match accepts
    /// one, plus a Reset on a finished local match.
    pub fn submit_command(&mut self, command: Command) -> bool {
        let accepted = match self.fsm.state() {
            FsmState::PlayingLocal | FsmState::PlayingHost => true,
            FsmState::GameOver => command == Command::Reset && self.role == Some(Role::Local),
            _ => false,
        };
        match self.game.as_mut() {
            Some(game) if accepted => {
                game.commands.submit(command);
                true
            }
            _ => false,
        }
    }

    pub fn tuning_mut(&mut self) -> Option<&mut Tuning> {
        self.game.as_mut().map(|game| &mut game.tuning)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn state(&self) -> FsmState {
        self.fsm.state()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// What to draw this frame
    pub fn view(&self) -> Snapshot {
        match (self.role, self.game.as_ref()) {
            (Some(Role::Local | Role::Host), Some(game)) => game.snapshot(),
            _ => self.remote.snapshot(),
        }
    }

    pub fn paddle_heights(&self) -> [f32; 2] {
        match self.game.as_ref() {
            Some(game) => Side::BOTH.map(|side| game.tuning.paddle_height(side)),
            None => {
                let side = self.role.map_or(Side::Left, Role::side);
                let tuning = Tuning::for_match(&self.config, side, Opponent::Human);
                Side::BOTH.map(|side| tuning.paddle_height(side))
            }
        }
    }

    pub fn trajectory(&self) -> Vec<Vec2> {
        self.game
            .as_ref()
            .map(LocalGame::trajectory)
            .unwrap_or_default()
    }

    pub fn remote(&self) -> &RemoteView {
        &self.remote
    }

    pub fn rooms(&self) -> &[RoomSummary] {
        &self.rooms
    }

    pub fn rtt_ms(&self) -> Option<u32> {
        self.rtt_ms
    }

    pub fn stats(&self) -> &StatsTotals {
        self.reporter.sink()
    }
}
