//! Browser session layer for Pong.
//!
//! Drives local and hosted matches, applies host snapshots on the client
//! side and queues wire frames for the JS transport. Rendering, audio and
//! menus live in JS; `bindings` is the surface they call.

pub mod error;
pub mod fsm;
pub mod input;
pub mod network;
pub mod session;
pub mod simulation;
pub mod state;

#[cfg(target_arch = "wasm32")]
mod bindings;

pub use error::ClientError;
pub use fsm::{FsmState, GameAction, GameFsm, TransitionResult};
pub use input::InputState;
pub use session::{Role, Session};
pub use simulation::LocalGame;
pub use state::RemoteView;
