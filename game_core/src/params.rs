/// Game tuning parameters for Pong
///
/// All lengths are normalized to the arena: x and y both run over [0, 1].
/// Velocities are in arena units per simulated tick.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Paddle
    pub const PADDLE_WIDTH: f32 = 0.015;
    pub const PADDLE_BASE_HEIGHT: f32 = 0.15;
    pub const PADDLE_MIN_HEIGHT: f32 = 0.02;
    pub const PADDLE_MAX_HEIGHT: f32 = 1.0;
    pub const PADDLE_MULTIPLIER_MIN: f32 = 0.1;
    pub const PADDLE_MULTIPLIER_MAX: f32 = 10.0;

    // Ball
    pub const BALL_RADIUS: f32 = 0.01;
    pub const SERVE_SPEED_X: f32 = 0.008;
    pub const SERVE_SPREAD_Y: f32 = 0.01; // vy drawn from (-0.005, 0.005)
    pub const BOUNCE_SPEEDUP: f32 = 1.02;
    pub const BALL_MIN_SPEED_X: f32 = 0.002;
    pub const BALL_MAX_SPEED_X: f32 = 0.05;
    pub const PADDLE_CLEARANCE: f32 = 0.01; // nudge past the plane after a hit

    // Control sources
    pub const ASSIST_BLEND: f32 = 0.6;
    pub const MAGNET_BLEND: f32 = 0.3;
    pub const AUTO_AIM_X_LEFT: f32 = 0.02;
    pub const AUTO_AIM_X_RIGHT: f32 = 0.98;

    // Assists
    pub const GHOST_HIT_MARGIN: f32 = 0.05;
    pub const STABILITY_MARGIN: f32 = 0.02;
    pub const SOFT_SLOW_RANGE: f32 = 0.06;
    pub const SOFT_SLOW_DRAG: f32 = 0.995;
    pub const STEALTH_PULL: f32 = 0.05;
    pub const EDGE_CATCH_RANGE: f32 = 0.08;
    pub const EDGE_CATCH_GAIN: f32 = 0.0005;
    pub const BALL_CONTROL_MAX_DEG: f32 = 60.0;

    // Time flow
    pub const SLOW_MOTION_FACTOR: f32 = 0.3;
    pub const TICK_MS: f64 = 1000.0 / 60.0;

    // Commands
    pub const COMMAND_COOLDOWN_MS: u64 = 200;

    // Trajectory
    pub const PREDICT_MAX_STEPS: u32 = 1000;
    pub const TRACE_BASE_STEPS: u32 = 600;
    pub const TRACE_STEPS_PER_REFLECTION: u32 = 200;
    pub const MAX_TRAJECTORY_REFLECTIONS: u8 = 8;

    // Score
    pub const DEFAULT_TARGET_SCORE: u32 = 10;
    pub const MAX_TARGET_SCORE: u32 = 999;
}
