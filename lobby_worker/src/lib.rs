use worker::*;

// Export the Durable Object from server_do
pub use server_do::LobbyDO;

/// All rooms live in one relay object so codes are unique and listable
const LOBBY_NAME: &str = "lobby";

#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: worker::Context) -> Result<Response> {
    let router = Router::new();

    router
        .get_async("/", handle_index)
        .get_async("/rooms", forward_to_lobby)
        .get_async("/ws", forward_to_lobby)
        .run(req, env)
        .await
}

async fn handle_index(_req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    Response::from_json(&serde_json::json!({
        "service": "pong-lobby",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/rooms", "/ws"],
    }))
}

/// Hand the request (including WebSocket upgrades) to the relay object
async fn forward_to_lobby(req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let namespace = ctx.env.durable_object("LOBBY")?;
    let stub = namespace.get_by_name(LOBBY_NAME)?;
    stub.fetch_with_request(req).await
}
