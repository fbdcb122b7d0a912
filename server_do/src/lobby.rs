use game_core::ConfigError;
use proto::*;
use rand::rngs::StdRng;
use std::collections::HashMap;
use worker::*;

use crate::registry::{ConnId, NewRoom, RoomRegistry, Seat};

/// Connections silent for longer than this are evicted by the sweep
pub const IDLE_TIMEOUT_MS: u64 = 60_000;
const SNAPSHOT_LOG_EVERY: u64 = 60;

// Abstract connection for testing
pub trait GameClient {
    fn send_bytes(&self, bytes: &[u8]) -> Result<()>;
    fn close_socket(&self, reason: &str) -> Result<()>;
}

impl GameClient for WebSocket {
    fn send_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.send_with_bytes(bytes)
    }

    fn close_socket(&self, reason: &str) -> Result<()> {
        self.close(Some(1000), Some(reason))
    }
}

// Abstract environment (Time, Logging)
pub trait Environment {
    fn now(&self) -> u64; // ms
    fn log(&self, msg: String);
}

pub struct WasmEnv;

impl Environment for WasmEnv {
    fn now(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    fn log(&self, msg: String) {
        console_log!("{}", msg);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("malformed frame: {0}")]
    Decode(postcard::Error),
    #[error("unknown connection {0}")]
    UnknownConnection(ConnId),
    #[error("connection is not seated in room {0}")]
    NotInRoom(String),
    #[error("only the {0:?} may send this message")]
    WrongSeat(Seat),
    #[error("invalid match configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("transport: {0}")]
    Transport(#[from] worker::Error),
}

impl From<postcard::Error> for RelayError {
    fn from(err: postcard::Error) -> Self {
        RelayError::Decode(err)
    }
}

// Track client activity
pub struct ClientInfo {
    pub client: Box<dyn GameClient>,
    pub last_activity: u64, // ms
}

/// Room relay state for every connection this object holds.
///
/// The relay never simulates. It forwards host snapshots to the client and
/// client input to the host, and tears a room down when either side leaves.
pub struct Lobby {
    pub env: Box<dyn Environment>,
    pub rng: StdRng,
    pub clients: HashMap<ConnId, ClientInfo>,
    pub registry: RoomRegistry,
    next_conn_id: ConnId,
    relayed: u64,
}

impl Lobby {
    pub fn new(env: Box<dyn Environment>, rng: StdRng) -> Self {
        Self {
            env,
            rng,
            clients: HashMap::new(),
            registry: RoomRegistry::new(),
            next_conn_id: 1,
            relayed: 0,
        }
    }

    /// Register a freshly accepted connection
    pub fn connect(&mut self, client: Box<dyn GameClient>) -> ConnId {
        let conn = self.next_conn_id;
        self.next_conn_id += 1;
        let now = self.env.now();
        self.clients.insert(
            conn,
            ClientInfo {
                client,
                last_activity: now,
            },
        );
        self.env.log(format!("DO: Connection {conn} opened ({} total)", self.clients.len()));
        conn
    }

    /// Re-register a socket that survived hibernation. Room state did not
    /// survive, so the connection is told its room is gone.
    pub fn restore(&mut self, conn: ConnId, client: Box<dyn GameClient>) {
        let now = self.env.now();
        self.next_conn_id = self.next_conn_id.max(conn + 1);
        self.clients.insert(
            conn,
            ClientInfo {
                client,
                last_activity: now,
            },
        );
        if let Err(err) = self.send(conn, &S2C::RoomClosed) {
            self.env.log(format!("DO: Connection {conn} restore notice failed: {err}"));
        }
        self.env.log(format!("DO: Connection {conn} restored ({} total)", self.clients.len()));
    }

    /// Decode and handle one binary frame
    pub fn handle_bytes(&mut self, conn: ConnId, bytes: &[u8]) -> std::result::Result<(), RelayError> {
        let msg = C2S::from_bytes(bytes)?;
        self.handle_message(conn, msg)
    }

    pub fn handle_message(&mut self, conn: ConnId, msg: C2S) -> std::result::Result<(), RelayError> {
        let now = self.env.now();
        self.clients
            .get_mut(&conn)
            .ok_or(RelayError::UnknownConnection(conn))?
            .last_activity = now;

        match msg {
            C2S::CreateRoom {
                host_name,
                room_name,
                password,
                config,
            } => {
                if let Err(err) = config.validate() {
                    self.send(conn, &S2C::CreateRejected { reason: err.to_string() })?;
                    return Err(err.into());
                }
                self.leave_rooms(conn);
                let request = NewRoom {
                    host_name,
                    room_name,
                    password,
                    config,
                };
                let room = self.registry.create(&mut self.rng, conn, request, now);
                let reply = S2C::RoomCreated {
                    code: room.code.clone(),
                    config: room.config,
                };
                self.env.log(format!("DO: Connection {conn} opened room {}", room.code));
                self.send(conn, &reply)
            }
            C2S::JoinRoom { code, password } => {
                let code = normalize_code(&code).unwrap_or(code);
                self.leave_rooms(conn);
                match self.registry.join(&code, conn, password.as_deref()) {
                    Ok(room) => {
                        let config = room.config;
                        let host = room.host;
                        self.env.log(format!("DO: Connection {conn} joined room {code}"));
                        self.send(
                            conn,
                            &S2C::Joined {
                                code: code.clone(),
                                config,
                            },
                        )?;
                        let ready = S2C::RoomReady { config };
                        self.send(host, &ready)?;
                        self.send(conn, &ready)
                    }
                    Err(reason) => {
                        self.env.log(format!("DO: Connection {conn} rejected from {code}: {reason}"));
                        self.send(conn, &S2C::JoinRejected { reason })
                    }
                }
            }
            C2S::ListRooms => {
                let rooms = self.registry.list();
                self.send(conn, &S2C::RoomList { rooms })
            }
            C2S::StatePush { code, snapshot } => {
                let peer = self.peer_for(conn, &code, Seat::Host)?;
                self.relayed += 1;
                if self.relayed % SNAPSHOT_LOG_EVERY == 0 {
                    self.env.log(format!("DO: {} snapshots relayed", self.relayed));
                }
                match peer {
                    Some(client) => self.send(client, &S2C::State(snapshot)),
                    None => Ok(()),
                }
            }
            C2S::Input { code, target_y } => {
                let peer = self.peer_for(conn, &code, Seat::Client)?;
                match peer {
                    Some(host) => self.send(host, &S2C::PeerInput { target_y }),
                    None => Ok(()),
                }
            }
            C2S::MatchOver { code, result } => {
                let peer = self.peer_for(conn, &code, Seat::Host)?;
                self.env.log(format!("DO: Room {code} finished, {:?} won", result.winner));
                match peer {
                    Some(client) => self.send(client, &S2C::MatchOver { result }),
                    None => Ok(()),
                }
            }
            C2S::Ping { t_ms } => self.send(conn, &S2C::Pong { t_ms }),
        }
    }

    /// Forget a connection and close any room it sat in
    pub fn disconnect(&mut self, conn: ConnId) {
        if self.clients.remove(&conn).is_some() {
            self.leave_rooms(conn);
            self.env.log(format!(
                "DO: Connection {conn} closed ({} remaining)",
                self.clients.len()
            ));
        }
    }

    /// Evict connections idle past the timeout. Returns the evicted ids.
    pub fn sweep_idle(&mut self) -> Vec<ConnId> {
        let now = self.env.now();
        let mut idle: Vec<ConnId> = self
            .clients
            .iter()
            .filter(|(_, info)| now.saturating_sub(info.last_activity) > IDLE_TIMEOUT_MS)
            .map(|(conn, _)| *conn)
            .collect();
        idle.sort_unstable();

        for &conn in &idle {
            self.env.log(format!("DO: Connection {conn} idle, disconnecting"));
            if self.registry.room_of(conn).is_some() {
                let _ = self.send(conn, &S2C::RoomClosed);
            }
            if let Some(info) = self.clients.get(&conn) {
                if let Err(err) = info.client.close_socket("idle") {
                    self.env.log(format!("DO: Connection {conn} close failed: {err}"));
                }
            }
            self.disconnect(conn);
        }
        idle
    }

    pub fn room_list(&self) -> Vec<RoomSummary> {
        self.registry.list()
    }

    /// Close every room `conn` sits in and tell the other participant
    fn leave_rooms(&mut self, conn: ConnId) {
        for room in self.registry.close_for(conn) {
            self.env.log(format!("DO: Room {} closed", room.code));
            if let Some(peer) = room.peer_of(conn) {
                // The peer may already be gone; nothing else to do
                let _ = self.send(peer, &S2C::RoomClosed);
            }
        }
    }

    /// Check `conn` holds `seat` in room `code` and return the other seat
    fn peer_for(&self, conn: ConnId, code: &str, seat: Seat) -> std::result::Result<Option<ConnId>, RelayError> {
        let room = self
            .registry
            .get(code)
            .filter(|room| room.seat_of(conn).is_some())
            .ok_or_else(|| RelayError::NotInRoom(code.to_string()))?;
        if room.seat_of(conn) != Some(seat) {
            return Err(RelayError::WrongSeat(seat));
        }
        Ok(room.peer_of(conn))
    }

    fn send(&self, conn: ConnId, msg: &S2C) -> std::result::Result<(), RelayError> {
        let info = self
            .clients
            .get(&conn)
            .ok_or(RelayError::UnknownConnection(conn))?;
        let bytes = msg.to_bytes()?;
        info.client.send_bytes(&bytes)?;
        Ok(())
    }
}
