use std::sync::Once;

use game_core::{BotDifficulty, Command, MatchConfig, Opponent, ServeTarget, Side, TimeFlow};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;
use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

use crate::{ClientError, FsmState, Session};

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();

        let filter = EnvFilter::new("info");
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .without_time()
            .with_writer(MakeWebConsoleWriter::new())
            .with_filter(filter);
        tracing_subscriber::registry().with(fmt_layer).init();
    });
}

fn js_err(err: ClientError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_config(json: &str) -> Result<MatchConfig, JsValue> {
    serde_json::from_str(json).map_err(|e| js_err(e.into()))
}

fn side(left: bool) -> Side {
    if left {
        Side::Left
    } else {
        Side::Right
    }
}

#[wasm_bindgen]
pub struct PongClient {
    session: Session,
}

#[wasm_bindgen]
impl PongClient {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PongClient {
        init_logging();
        let seed = js_sys::Date::now() as u64;
        tracing::info!(seed, "client ready");
        PongClient {
            session: Session::new(seed),
        }
    }

    // Menu

    /// `difficulty` indexes the bot tiers, easiest first; omit it for two
    /// players on one device.
    pub fn start_local(&mut self, config_json: &str, difficulty: Option<u8>) -> Result<(), JsValue> {
        let config = parse_config(config_json)?;
        let opponent = difficulty
            .and_then(|tier| BotDifficulty::ALL.get(usize::from(tier)).copied())
            .map_or(Opponent::Human, Opponent::Bot);
        self.session.start_local(config, opponent).map_err(js_err)
    }

    pub fn play_again(&mut self) -> Result<(), JsValue> {
        self.session.play_again().map_err(js_err)
    }

    pub fn create_room(
        &mut self,
        host_name: &str,
        room_name: &str,
        password: Option<String>,
        config_json: &str,
    ) -> Result<(), JsValue> {
        let config = parse_config(config_json)?;
        self.session
            .create_room(host_name, room_name, password.as_deref(), config)
            .map_err(js_err)
    }

    pub fn join_room(&mut self, code: &str, password: Option<String>) -> Result<(), JsValue> {
        self.session
            .join_room(code, password.as_deref())
            .map_err(js_err)
    }

    pub fn list_rooms(&mut self) -> Result<(), JsValue> {
        self.session.list_rooms().map_err(js_err)
    }

    pub fn ping(&mut self) -> Result<(), JsValue> {
        self.session.ping().map_err(js_err)
    }

    pub fn connection_failed(&mut self) {
        self.session.connection_failed();
    }

    pub fn leave(&mut self) -> Result<(), JsValue> {
        self.session.leave().map_err(js_err)
    }

    // Transport

    pub fn handle_message(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.session.handle_bytes(bytes).map_err(js_err)
    }

    /// Frames to send, oldest first
    pub fn take_outbox(&mut self) -> js_sys::Array {
        self.session
            .take_outbox()
            .iter()
            .map(|bytes| js_sys::Uint8Array::from(bytes.as_slice()))
            .collect()
    }

    /// Call from `requestAnimationFrame`
    pub fn frame(&mut self, now_ms: f64) -> Result<(), JsValue> {
        self.session.frame(now_ms).map_err(js_err)
    }

    // Input

    pub fn set_local_percent(&mut self, percent: f32) {
        self.session.input.set_local_percent(percent);
    }

    pub fn set_opponent_percent(&mut self, percent: f32) {
        self.session.input.set_opponent_percent(percent);
    }

    pub fn key_down(&mut self, event: &KeyboardEvent) {
        self.session.input.key_down(&event.key());
    }

    pub fn key_up(&mut self, event: &KeyboardEvent) {
        self.session.input.key_up(&event.key());
    }

    pub fn set_thumb_scale(&mut self, scale: f32) {
        self.session.input.set_thumb_scale(scale);
    }

    pub fn thumb_size_px(&self) -> f32 {
        self.session.input.thumb_size_px()
    }

    // View

    pub fn state(&self) -> FsmState {
        self.session.state()
    }

    pub fn room_code(&self) -> Option<String> {
        self.session.code().map(String::from)
    }

    pub fn view_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.view()).map_err(|e| js_err(e.into()))
    }

    pub fn paddle_heights(&self) -> Vec<f32> {
        self.session.paddle_heights().to_vec()
    }

    /// Preview polyline as flat `[x0, y0, x1, y1, ...]`
    pub fn trajectory(&self) -> Vec<f32> {
        self.session
            .trajectory()
            .iter()
            .flat_map(|p| [p.x, p.y])
            .collect()
    }

    pub fn rooms_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.rooms()).map_err(|e| js_err(e.into()))
    }

    pub fn stats_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.stats()).map_err(|e| js_err(e.into()))
    }

    pub fn rtt_ms(&self) -> Option<u32> {
        self.session.rtt_ms()
    }

    // Debug commands

    pub fn add_score(&mut self, left: bool, amount: u32) -> bool {
        self.session.submit_command(Command::AddScore {
            side: side(left),
            amount,
        })
    }

    pub fn force_win(&mut self, left: bool) -> bool {
        self.session
            .submit_command(Command::ForceWin { side: side(left) })
    }

    pub fn reset_match(&mut self) -> bool {
        self.session.submit_command(Command::Reset)
    }

    // Tuning. No-ops unless this session runs the simulation.

    /// 0 normal, 1 slow motion, 2 stopped
    pub fn set_time_flow(&mut self, flow: u8) {
        if let Some(tuning) = self.session.tuning_mut() {
            tuning.time_flow = match flow {
                1 => TimeFlow::Slow,
                2 => TimeFlow::Stopped,
                _ => TimeFlow::Normal,
            };
        }
    }

    pub fn set_auto_play(&mut self, on: bool) {
        if let Some(tuning) = self.session.tuning_mut() {
            tuning.aids.auto_play = on;
        }
    }

    pub fn set_auto_assist(&mut self, on: bool) {
        if let Some(tuning) = self.session.tuning_mut() {
            tuning.aids.auto_assist = on;
            tuning.bot_auto = on;
        }
    }

    pub fn set_magnet(&mut self, on: bool) {
        if let Some(tuning) = self.session.tuning_mut() {
            tuning.aids.magnet = on;
        }
    }

    pub fn set_ghost_hit(&mut self, on: bool) {
        if let Some(tuning) = self.session.tuning_mut() {
            tuning.set_ghost_hit(on);
        }
    }

    pub fn set_soft_slow(&mut self, on: bool) {
        if let Some(tuning) = self.session.tuning_mut() {
            tuning.soft_slow = on;
        }
    }

    pub fn set_stealth_assist(&mut self, on: bool) {
        if let Some(tuning) = self.session.tuning_mut() {
            tuning.stealth_assist = on;
        }
    }

    /// Degrees from horizontal, or `undefined` to release the ball
    pub fn set_ball_control(&mut self, degrees: Option<f32>) {
        if let Some(tuning) = self.session.tuning_mut() {
            tuning.ball_control = degrees.filter(|d| d.is_finite());
        }
    }

    pub fn set_paddle_multiplier(&mut self, left: bool, multiplier: f32) {
        if let Some(tuning) = self.session.tuning_mut() {
            tuning.size_multiplier[side(left).index()] = multiplier;
        }
    }

    /// Freeze a paddle until an absolute frame timestamp
    pub fn freeze(&mut self, left: bool, until_ms: f64) {
        if let Some(tuning) = self.session.tuning_mut() {
            tuning.freeze(side(left), until_ms.max(0.0) as u64);
        }
    }

    pub fn set_bot_lag(&mut self, chance: f32) {
        if let Some(tuning) = self.session.tuning_mut() {
            tuning.bot_lag_chance = if chance.is_finite() {
                chance.clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
    }

    /// -1 toward left, 1 toward right, anything else random
    pub fn set_serve_target(&mut self, target: i8) {
        if let Some(tuning) = self.session.tuning_mut() {
            tuning.serve_target = match target {
                -1 => ServeTarget::Toward(Side::Left),
                1 => ServeTarget::Toward(Side::Right),
                _ => ServeTarget::Random,
            };
        }
    }

    /// Reflections shown by the preview; omit to hide it
    pub fn set_trajectory(&mut self, reflections: Option<u8>) {
        if let Some(tuning) = self.session.tuning_mut() {
            tuning.trajectory = reflections;
        }
    }
}

impl Default for PongClient {
    fn default() -> Self {
        Self::new()
    }
}
