pub mod lobby;
pub mod registry;

#[cfg(test)]
mod tests;

pub use lobby::*;
pub use registry::*;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::time::Duration;
use worker::*;

/// How often the idle sweep runs while connections are open
const SWEEP_INTERVAL_MS: u64 = 10_000;

#[durable_object]
pub struct LobbyDO {
    state: State,
    #[allow(dead_code)]
    env: Env,
    lobby: RefCell<Lobby>,
}

impl DurableObject for LobbyDO {
    fn new(state: State, env: Env) -> Self {
        let mut lobby = Lobby::new(Box::new(WasmEnv), StdRng::from_entropy());
        // Sockets accepted before hibernation are still open
        for ws in state.get_websockets() {
            let conn = state.get_tags(&ws).iter().find_map(|tag| tag.parse().ok());
            match conn {
                Some(conn) => lobby.restore(conn, Box::new(ws)),
                None => console_error!("DO: Untagged socket after wake-up"),
            }
        }
        Self {
            state,
            env,
            lobby: RefCell::new(lobby),
        }
    }

    async fn fetch(&self, req: Request) -> Result<Response> {
        if req.path() == "/rooms" {
            let rooms = self.lobby.borrow().room_list();
            return Response::from_json(&rooms);
        }

        // Check for WebSocket upgrade
        match req.headers().get("Upgrade") {
            Ok(Some(header)) if header.eq_ignore_ascii_case("websocket") => {}
            Ok(header_opt) => {
                console_error!("DO: Unexpected Upgrade header state: {:?}", header_opt);
                return Response::error("Expected WebSocket upgrade request", 426);
            }
            Err(err) => {
                console_error!("DO: Failed to read Upgrade header: {:?}", err);
                return Response::error("Failed to read request headers", 500);
            }
        }

        let pair = match WebSocketPair::new() {
            Ok(pair) => pair,
            Err(err) => {
                console_error!("DO: Failed to create WebSocket pair: {:?}", err);
                return Response::error("Failed to create WebSocket pair", 500);
            }
        };
        let server = pair.server;
        let client = pair.client;

        let (conn, first) = {
            let mut lobby = self.lobby.borrow_mut();
            let first = lobby.clients.is_empty();
            (lobby.connect(Box::new(server.clone())), first)
        };
        // The tag maps hibernation callbacks back to the connection
        let tag = conn.to_string();
        self.state.accept_websocket_with_tags(&server, &[tag.as_str()]);

        if first {
            self.state
                .storage()
                .set_alarm(Duration::from_millis(SWEEP_INTERVAL_MS))
                .await?;
        }

        Response::from_websocket(client)
    }

    async fn websocket_message(
        &self,
        ws: WebSocket,
        message: durable::WebSocketIncomingMessage,
    ) -> Result<()> {
        let Some(conn) = self.conn_of(&ws) else {
            console_error!("DO: Message from untracked socket");
            return Ok(());
        };
        match message {
            durable::WebSocketIncomingMessage::String(_text) => {
                // Ignore text messages
            }
            durable::WebSocketIncomingMessage::Binary(bytes) => {
                if let Err(e) = self.lobby.borrow_mut().handle_bytes(conn, &bytes) {
                    console_error!("DO: Connection {conn}: {e}");
                }
            }
        }
        Ok(())
    }

    async fn websocket_close(
        &self,
        ws: WebSocket,
        code: usize,
        reason: String,
        _was_clean: bool,
    ) -> Result<()> {
        console_log!("DO: WebSocket close event (code: {}, reason: {})", code, reason);
        if let Some(conn) = self.conn_of(&ws) {
            self.lobby.borrow_mut().disconnect(conn);
        }
        Ok(())
    }

    async fn websocket_error(&self, ws: WebSocket, error: Error) -> Result<()> {
        console_error!("DO: WebSocket error: {:?}", error);
        if let Some(conn) = self.conn_of(&ws) {
            self.lobby.borrow_mut().disconnect(conn);
        }
        Ok(())
    }

    async fn alarm(&self) -> Result<Response> {
        let has_clients = {
            let mut lobby = self.lobby.borrow_mut();
            lobby.sweep_idle();
            !lobby.clients.is_empty()
        };

        if !has_clients {
            console_log!("DO: No connections remaining, stopping sweep");
            return Response::ok("No clients, stopping sweep");
        }

        self.state
            .storage()
            .set_alarm(Duration::from_millis(SWEEP_INTERVAL_MS))
            .await?;
        Response::ok("Sweep done")
    }
}

impl LobbyDO {
    fn conn_of(&self, ws: &WebSocket) -> Option<ConnId> {
        self.state
            .get_tags(ws)
            .iter()
            .find_map(|tag| tag.parse().ok())
    }
}
