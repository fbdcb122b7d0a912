use crate::lobby::{Environment, GameClient, Lobby, RelayError, IDLE_TIMEOUT_MS};
use crate::registry::{ConnId, Seat};
use game_core::{MatchConfig, MatchResult, Score, Side, Snapshot, WinCondition};
use proto::{JoinRejection, C2S, S2C};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use worker::*;

type Inbox = Rc<RefCell<Vec<Vec<u8>>>>;

struct SharedMock {
    msgs: Inbox,
    closed: Rc<Cell<bool>>,
}

impl GameClient for SharedMock {
    fn send_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.msgs.borrow_mut().push(bytes.to_vec());
        Ok(())
    }

    fn close_socket(&self, _reason: &str) -> Result<()> {
        self.closed.set(true);
        Ok(())
    }
}

fn mock() -> (SharedMock, Inbox, Rc<Cell<bool>>) {
    let inbox = Inbox::default();
    let closed = Rc::new(Cell::new(false));
    let client = SharedMock {
        msgs: inbox.clone(),
        closed: closed.clone(),
    };
    (client, inbox, closed)
}

struct MockEnv {
    time_ms: Rc<Cell<u64>>,
}

impl Environment for MockEnv {
    fn now(&self) -> u64 {
        self.time_ms.get()
    }
    fn log(&self, _msg: String) {
        // No-op for tests or println!(_msg)
    }
}

struct Harness {
    lobby: Lobby,
    clock: Rc<Cell<u64>>,
}

impl Harness {
    fn new() -> Self {
        let clock = Rc::new(Cell::new(1_000));
        let env = MockEnv {
            time_ms: clock.clone(),
        };
        Self {
            lobby: Lobby::new(Box::new(env), StdRng::seed_from_u64(42)),
            clock,
        }
    }

    fn connect(&mut self) -> (ConnId, Inbox) {
        let (conn, inbox, _) = self.connect_tracked();
        (conn, inbox)
    }

    /// Like `connect`, also exposing whether the relay closed the socket
    fn connect_tracked(&mut self) -> (ConnId, Inbox, Rc<Cell<bool>>) {
        let (client, inbox, closed) = mock();
        let conn = self.lobby.connect(Box::new(client));
        (conn, inbox, closed)
    }

    fn send(&mut self, conn: ConnId, msg: C2S) -> std::result::Result<(), RelayError> {
        let bytes = msg.to_bytes().expect("serialize");
        self.lobby.handle_bytes(conn, &bytes)
    }

    fn advance(&self, ms: u64) {
        self.clock.set(self.clock.get() + ms);
    }
}

/// Drain and decode everything a mock connection received
fn drain(inbox: &Inbox) -> Vec<S2C> {
    inbox
        .borrow_mut()
        .drain(..)
        .map(|bytes| S2C::from_bytes(&bytes).expect("valid frame"))
        .collect()
}

fn create(h: &mut Harness, host: ConnId, inbox: &Inbox, password: Option<&str>) -> String {
    h.send(
        host,
        C2S::CreateRoom {
            host_name: "Host".into(),
            room_name: "Room".into(),
            password: password.map(String::from),
            config: MatchConfig::default(),
        },
    )
    .expect("create");
    match drain(inbox).as_slice() {
        [S2C::RoomCreated { code, config }] => {
            assert_eq!(*config, MatchConfig::default());
            code.clone()
        }
        other => panic!("Expected RoomCreated, got {other:?}"),
    }
}

/// Host and client seated in one room, inboxes drained
fn paired(h: &mut Harness) -> (String, (ConnId, Inbox), (ConnId, Inbox)) {
    let (host, host_inbox) = h.connect();
    let (client, client_inbox) = h.connect();
    let code = create(h, host, &host_inbox, None);
    h.send(
        client,
        C2S::JoinRoom {
            code: code.clone(),
            password: None,
        },
    )
    .expect("join");
    drain(&host_inbox);
    drain(&client_inbox);
    (code, (host, host_inbox), (client, client_inbox))
}

#[test]
fn test_create_room_returns_code() {
    let mut h = Harness::new();
    let (host, inbox) = h.connect();
    let code = create(&mut h, host, &inbox, None);

    assert_eq!(code.len(), proto::ROOM_CODE_LEN);
    assert_eq!(h.lobby.registry.len(), 1);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut h = Harness::new();
    let (host, inbox) = h.connect();
    let result = h.send(
        host,
        C2S::CreateRoom {
            host_name: "Host".into(),
            room_name: "Room".into(),
            password: None,
            config: MatchConfig {
                win_condition: WinCondition::Score(0),
                ..MatchConfig::default()
            },
        },
    );

    assert!(matches!(result, Err(RelayError::Config(_))));
    assert!(matches!(drain(&inbox).as_slice(), [S2C::CreateRejected { .. }]));
    assert!(h.lobby.registry.is_empty());
}

#[test]
fn test_join_notifies_both_sides() {
    let mut h = Harness::new();
    let (host, host_inbox) = h.connect();
    let (client, client_inbox) = h.connect();
    let code = create(&mut h, host, &host_inbox, Some("pw"));

    h.send(
        client,
        C2S::JoinRoom {
            code: code.to_lowercase(),
            password: Some("pw".into()),
        },
    )
    .expect("join");

    let config = MatchConfig::default();
    assert_eq!(
        drain(&client_inbox),
        vec![
            S2C::Joined {
                code: code.clone(),
                config
            },
            S2C::RoomReady { config }
        ]
    );
    assert_eq!(drain(&host_inbox), vec![S2C::RoomReady { config }]);
}

#[test]
fn test_join_rejections() {
    let mut h = Harness::new();
    let (host, host_inbox) = h.connect();
    let code = create(&mut h, host, &host_inbox, Some("pw"));

    let cases = [
        ("ZZZZZZ".to_string(), Some("pw"), JoinRejection::NotFound),
        (code.clone(), None, JoinRejection::WrongPassword),
        (code.clone(), Some("nope"), JoinRejection::WrongPassword),
    ];
    for (target, password, expected) in cases {
        let (conn, inbox) = h.connect();
        h.send(
            conn,
            C2S::JoinRoom {
                code: target,
                password: password.map(String::from),
            },
        )
        .expect("handled");
        assert_eq!(drain(&inbox), vec![S2C::JoinRejected { reason: expected }]);
    }

    let (second, _) = h.connect();
    h.send(
        second,
        C2S::JoinRoom {
            code: code.clone(),
            password: Some("pw".into()),
        },
    )
    .expect("join");
    let (third, third_inbox) = h.connect();
    h.send(
        third,
        C2S::JoinRoom {
            code,
            password: Some("pw".into()),
        },
    )
    .expect("handled");
    assert_eq!(
        drain(&third_inbox),
        vec![S2C::JoinRejected {
            reason: JoinRejection::RoomFull
        }]
    );
}

#[test]
fn test_room_list() {
    let mut h = Harness::new();
    let (host, host_inbox) = h.connect();
    let code = create(&mut h, host, &host_inbox, Some("pw"));
    let (asker, inbox) = h.connect();

    h.send(asker, C2S::ListRooms).expect("list");

    match drain(&inbox).as_slice() {
        [S2C::RoomList { rooms }] => {
            assert_eq!(rooms.len(), 1);
            assert_eq!(rooms[0].code, code);
            assert!(rooms[0].has_password);
            assert_eq!(rooms[0].players, 1);
        }
        other => panic!("Expected RoomList, got {other:?}"),
    }
}

#[test]
fn test_state_push_reaches_client_only() {
    let mut h = Harness::new();
    let (code, (host, host_inbox), (_, client_inbox)) = paired(&mut h);
    let snapshot = Snapshot {
        score_left: 3,
        score_right: 5,
        ..Snapshot::default()
    };

    h.send(host, C2S::StatePush { code, snapshot }).expect("push");

    assert_eq!(drain(&client_inbox), vec![S2C::State(snapshot)]);
    assert!(drain(&host_inbox).is_empty());
}

#[test]
fn test_input_reaches_host() {
    let mut h = Harness::new();
    let (code, (_, host_inbox), (client, _)) = paired(&mut h);

    h.send(client, C2S::Input { code, target_y: 0.25 }).expect("input");

    assert_eq!(drain(&host_inbox), vec![S2C::PeerInput { target_y: 0.25 }]);
}

#[test]
fn test_client_cannot_push_state() {
    let mut h = Harness::new();
    let (code, (_, host_inbox), (client, _)) = paired(&mut h);

    let result = h.send(
        client,
        C2S::StatePush {
            code,
            snapshot: Snapshot::default(),
        },
    );

    assert!(matches!(result, Err(RelayError::WrongSeat(Seat::Host))));
    assert!(drain(&host_inbox).is_empty());
}

#[test]
fn test_outsider_cannot_use_room() {
    let mut h = Harness::new();
    let (code, _, _) = paired(&mut h);
    let (outsider, _) = h.connect();

    let result = h.send(outsider, C2S::Input { code, target_y: 0.5 });

    assert!(matches!(result, Err(RelayError::NotInRoom(_))));
}

#[test]
fn test_match_over_relayed() {
    let mut h = Harness::new();
    let (code, (host, _), (_, client_inbox)) = paired(&mut h);
    let result = MatchResult {
        winner: Side::Left,
        score: Score { left: 10, right: 4 },
        max_rally: 6,
        forced: false,
    };

    h.send(host, C2S::MatchOver { code, result }).expect("relay");

    assert_eq!(drain(&client_inbox), vec![S2C::MatchOver { result }]);
}

#[test]
fn test_disconnect_closes_room() {
    let mut h = Harness::new();
    let (code, (host, _), (client, client_inbox)) = paired(&mut h);

    h.lobby.disconnect(host);

    assert_eq!(drain(&client_inbox), vec![S2C::RoomClosed]);
    assert!(h.lobby.registry.get(&code).is_none());
    let result = h.send(client, C2S::Input { code, target_y: 0.5 });
    assert!(matches!(result, Err(RelayError::NotInRoom(_))));
}

#[test]
fn test_idle_connections_are_swept() {
    let mut h = Harness::new();
    let (_, (host, _), (client, client_inbox)) = paired(&mut h);

    h.advance(IDLE_TIMEOUT_MS / 2);
    h.send(client, C2S::Ping { t_ms: 1 }).expect("ping");
    assert_eq!(drain(&client_inbox), vec![S2C::Pong { t_ms: 1 }]);

    h.advance(IDLE_TIMEOUT_MS / 2 + 1);
    let evicted = h.lobby.sweep_idle();

    assert_eq!(evicted, vec![host]);
    assert!(h.lobby.clients.contains_key(&client));
    assert_eq!(drain(&client_inbox), vec![S2C::RoomClosed]);
    assert!(h.lobby.registry.is_empty());
}

#[test]
fn test_idle_waiting_host_is_closed_and_room_released() {
    let mut h = Harness::new();
    let (host, host_inbox, host_closed) = h.connect_tracked();
    let code = create(&mut h, host, &host_inbox, None);

    h.advance(IDLE_TIMEOUT_MS + 1);
    let (joiner, joiner_inbox, joiner_closed) = h.connect_tracked();
    assert_eq!(h.lobby.sweep_idle(), vec![host]);

    assert_eq!(drain(&host_inbox), vec![S2C::RoomClosed]);
    assert!(host_closed.get());
    assert!(!joiner_closed.get());
    assert!(h.lobby.room_list().is_empty());

    h.send(joiner, C2S::JoinRoom { code, password: None })
        .expect("join");
    assert_eq!(
        drain(&joiner_inbox),
        vec![S2C::JoinRejected {
            reason: JoinRejection::NotFound
        }]
    );
}

#[test]
fn test_restored_sockets_keep_their_ids() {
    let mut h = Harness::new();
    let (client, restored_inbox, _) = mock();
    h.lobby.restore(7, Box::new(client));

    assert_eq!(drain(&restored_inbox), vec![S2C::RoomClosed]);
    h.send(7, C2S::Ping { t_ms: 9 }).expect("ping");
    assert_eq!(drain(&restored_inbox), vec![S2C::Pong { t_ms: 9 }]);

    let (conn, _) = h.connect();
    assert_eq!(conn, 8);
}

#[test]
fn test_garbage_frame_is_an_error() {
    let mut h = Harness::new();
    let (conn, inbox) = h.connect();

    let result = h.lobby.handle_bytes(conn, &[0xff, 0xff, 0xff]);

    assert!(matches!(result, Err(RelayError::Decode(_))));
    assert!(drain(&inbox).is_empty());
}

#[test]
fn test_unknown_connection() {
    let mut h = Harness::new();
    let result = h.send(999, C2S::ListRooms);
    assert!(matches!(result, Err(RelayError::UnknownConnection(999))));
}
