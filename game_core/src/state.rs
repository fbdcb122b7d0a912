use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{Ball, Paddle, Score, Side, Tuning};

/// Whether the match is still being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPhase {
    #[default]
    Playing,
    Over { winner: Side },
}

/// Authoritative record of one match. Owned by the host (or the lone local
/// simulation); a client only ever overwrites it from snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub ball: Ball,
    pub paddles: [Paddle; 2],
    pub score: Score,
    pub serve_ready: bool,
    pub phase: MatchPhase,
    /// Paddle hits since the last serve
    pub rally: u32,
    pub max_rally: u32,
    /// Simulated play time, scaled by time flow
    pub elapsed_ms: f64,
    pub tick: u64,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            ball: Ball::default(),
            paddles: [Paddle::default(); 2],
            score: Score::new(),
            serve_ready: true,
            phase: MatchPhase::Playing,
            rally: 0,
            max_rally: 0,
            elapsed_ms: 0.0,
            tick: 0,
        }
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        &self.paddles[side.index()]
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        &mut self.paddles[side.index()]
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, MatchPhase::Over { .. })
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            MatchPhase::Over { winner } => Some(winner),
            MatchPhase::Playing => None,
        }
    }

    /// Clamp both paddles into the arena for the current heights
    pub fn clamp_paddles(&mut self, tuning: &Tuning) {
        for side in Side::BOTH {
            let height = tuning.paddle_height(side);
            self.paddle_mut(side).clamp(height);
        }
    }

    /// Wire view of the state pushed to the client every tick
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            ball_x: self.ball.pos.x,
            ball_y: self.ball.pos.y,
            ball_vx: self.ball.vel.x,
            ball_vy: self.ball.vel.y,
            paddle_left_y: self.paddles[0].y,
            paddle_right_y: self.paddles[1].y,
            score_left: self.score.left,
            score_right: self.score.right,
        }
    }

    /// Replace the replicated fields wholesale. No smoothing, no merging.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        self.ball.pos = Vec2::new(snapshot.ball_x, snapshot.ball_y);
        self.ball.vel = Vec2::new(snapshot.ball_vx, snapshot.ball_vy);
        self.paddles[0].y = snapshot.paddle_left_y;
        self.paddles[1].y = snapshot.paddle_right_y;
        self.score.left = snapshot.score_left;
        self.score.right = snapshot.score_right;
    }
}

/// Per-tick state push. No sequence number: last received wins.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub ball_x: f32,
    pub ball_y: f32,
    pub ball_vx: f32,
    pub ball_vy: f32,
    pub paddle_left_y: f32,
    pub paddle_right_y: f32,
    pub score_left: u32,
    pub score_right: u32,
}
