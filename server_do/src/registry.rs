//! Open rooms keyed by code. Two seats per room: host and client.

use game_core::MatchConfig;
use proto::{JoinRejection, RoomSummary, ROOM_CODE_ALPHABET, ROOM_CODE_LEN};
use rand::Rng;
use std::collections::HashMap;

/// Relay-local connection handle
pub type ConnId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Host,
    Client,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub code: String,
    pub host_name: String,
    pub room_name: String,
    password: Option<String>,
    pub config: MatchConfig,
    pub host: ConnId,
    pub client: Option<ConnId>,
    pub created_ms: u64,
}

impl Room {
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn is_full(&self) -> bool {
        self.client.is_some()
    }

    pub fn seat_of(&self, conn: ConnId) -> Option<Seat> {
        if self.host == conn {
            Some(Seat::Host)
        } else if self.client == Some(conn) {
            Some(Seat::Client)
        } else {
            None
        }
    }

    /// The participant opposite `conn`, if seated
    pub fn peer_of(&self, conn: ConnId) -> Option<ConnId> {
        match self.seat_of(conn)? {
            Seat::Host => self.client,
            Seat::Client => Some(self.host),
        }
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            code: self.code.clone(),
            host_name: self.host_name.clone(),
            room_name: self.room_name.clone(),
            has_password: self.has_password(),
            players: if self.is_full() { 2 } else { 1 },
        }
    }
}

/// Fields of a room request, before a code is assigned
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub host_name: String,
    pub room_name: String,
    pub password: Option<String>,
    pub config: MatchConfig,
}

#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&Room> {
        self.rooms.get(code)
    }

    /// Random code not used by any live room
    pub fn generate_code<R: Rng>(&self, rng: &mut R) -> String {
        loop {
            let code: String = (0..ROOM_CODE_LEN)
                .map(|_| {
                    let idx = rng.gen_range(0..ROOM_CODE_ALPHABET.len());
                    ROOM_CODE_ALPHABET[idx] as char
                })
                .collect();
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    pub fn create<R: Rng>(&mut self, rng: &mut R, host: ConnId, request: NewRoom, now_ms: u64) -> &Room {
        let code = self.generate_code(rng);
        let room = Room {
            code: code.clone(),
            host_name: request.host_name,
            room_name: request.room_name,
            // An empty password means none
            password: request.password.filter(|p| !p.is_empty()),
            config: request.config,
            host,
            client: None,
            created_ms: now_ms,
        };
        self.rooms.entry(code).or_insert(room)
    }

    /// Seat `conn` as the client of room `code`
    pub fn join(&mut self, code: &str, conn: ConnId, password: Option<&str>) -> Result<&Room, JoinRejection> {
        let room = self.rooms.get_mut(code).ok_or(JoinRejection::NotFound)?;
        if let Some(expected) = &room.password {
            if password != Some(expected.as_str()) {
                return Err(JoinRejection::WrongPassword);
            }
        }
        if room.is_full() {
            return Err(JoinRejection::RoomFull);
        }
        room.client = Some(conn);
        Ok(room)
    }

    /// Directory listing, oldest room first
    pub fn list(&self) -> Vec<RoomSummary> {
        let mut rooms: Vec<&Room> = self.rooms.values().collect();
        rooms.sort_by(|a, b| a.created_ms.cmp(&b.created_ms).then_with(|| a.code.cmp(&b.code)));
        rooms.into_iter().map(Room::summary).collect()
    }

    /// Room `conn` sits in, with its seat
    pub fn room_of(&self, conn: ConnId) -> Option<(&Room, Seat)> {
        self.rooms
            .values()
            .find_map(|room| room.seat_of(conn).map(|seat| (room, seat)))
    }

    /// Remove every room `conn` sits in. Closing either seat closes the room.
    pub fn close_for(&mut self, conn: ConnId) -> Vec<Room> {
        let codes: Vec<String> = self
            .rooms
            .values()
            .filter(|room| room.seat_of(conn).is_some())
            .map(|room| room.code.clone())
            .collect();
        codes
            .iter()
            .filter_map(|code| self.rooms.remove(code))
            .collect()
    }
}
