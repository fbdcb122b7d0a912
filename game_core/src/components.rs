use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Params;

/// Arena side. Left is player one, right is player two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// X of the plane the ball must reach to touch this side's paddle
    pub fn collision_x(self) -> f32 {
        match self {
            Side::Left => Params::PADDLE_WIDTH + Params::BALL_RADIUS,
            Side::Right => 1.0 - Params::PADDLE_WIDTH - Params::BALL_RADIUS,
        }
    }

    /// X the automatic controllers aim their prediction at
    pub fn aim_x(self) -> f32 {
        match self {
            Side::Left => Params::AUTO_AIM_X_LEFT,
            Side::Right => Params::AUTO_AIM_X_RIGHT,
        }
    }

    /// Sign of vx for a ball travelling toward this side
    pub fn incoming_sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// True when `vx` carries the ball toward this side's goal line
    pub fn is_incoming(self, vx: f32) -> bool {
        vx * self.incoming_sign() > 0.0
    }
}

/// Paddle component - centre y of one side's paddle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub y: f32,
}

impl Paddle {
    pub fn new(y: f32) -> Self {
        Self { y }
    }

    /// Clamp so the whole span stays inside the arena
    pub fn clamp(&mut self, height: f32) {
        let half = height / 2.0;
        self.y = if self.y.is_finite() {
            self.y.clamp(half, 1.0 - half)
        } else {
            0.5
        };
    }

    pub fn top(&self, height: f32) -> f32 {
        self.y - height / 2.0
    }

    pub fn bottom(&self, height: f32) -> f32 {
        self.y + height / 2.0
    }
}

impl Default for Paddle {
    fn default() -> Self {
        Self::new(0.5)
    }
}

/// Ball component - the pong ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    /// Reset ball to center with a fresh small velocity
    pub fn reset(&mut self, toward: Side, rng: &mut crate::GameRng) {
        self.pos = Vec2::splat(0.5);
        self.vel = Vec2::new(
            toward.incoming_sign() * Params::SERVE_SPEED_X,
            rng.spread(Params::SERVE_SPREAD_Y),
        );
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new(Vec2::splat(0.5), Vec2::new(Params::SERVE_SPEED_X, 0.005))
    }
}
