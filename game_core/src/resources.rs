use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Command, MatchResult, Side};

/// Wall-clock time for one tick. Only timers compare against it; motion does
/// not scale with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Time {
    pub now_ms: u64,
}

impl Time {
    pub fn new(now_ms: u64) -> Self {
        Self { now_ms }
    }
}

/// Per-tick input intents, relative to the local player. Input sources
/// write only here, never into `MatchState`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputFrame {
    /// Target y for the local paddle
    pub local: f32,
    /// Target y for the opponent when a human drives it
    pub opponent: f32,
    /// Size of the on-screen control thumb; cosmetic
    pub thumb_scale: f32,
}

impl Default for InputFrame {
    fn default() -> Self {
        Self {
            local: 0.5,
            opponent: 0.5,
            thumb_scale: 1.0,
        }
    }
}

impl InputFrame {
    pub fn new(local: f32, opponent: f32) -> Self {
        Self {
            local,
            opponent,
            ..Self::default()
        }
    }

    /// Build from slider positions in percent (0-100)
    pub fn from_percent(local: f32, opponent: f32) -> Self {
        Self::new(local / 100.0, opponent / 100.0)
    }

    /// Raw target for `side`, or `None` if the input is unusable
    pub fn target(&self, side: Side, local_side: Side) -> Option<f32> {
        let raw = if side == local_side {
            self.local
        } else {
            self.opponent
        };
        raw.is_finite().then(|| raw.clamp(0.0, 1.0))
    }

    /// Control thumb diameter in pixels
    pub fn thumb_size_px(&self) -> f32 {
        let scale = if self.thumb_scale.is_finite() {
            self.thumb_scale
        } else {
            1.0
        };
        (8.0 * scale).clamp(6.0, 20.0)
    }
}

/// Game score tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn add(&mut self, side: Side, amount: u32) {
        match side {
            Side::Left => self.left = self.left.saturating_add(amount),
            Side::Right => self.right = self.right.saturating_add(amount),
        }
    }

    pub fn increment(&mut self, side: Side) {
        self.add(side, 1);
    }

    /// Raise a side's score to at least `value`
    pub fn raise_to(&mut self, side: Side, value: u32) {
        let current = self.get(side);
        if value > current {
            self.add(side, value - current);
        }
    }

    /// Side that reached `target`. The higher score wins if both did;
    /// a tie at or above target goes to the left.
    pub fn has_winner(&self, target: u32) -> Option<Side> {
        match (self.left >= target, self.right >= target) {
            (true, true) if self.right > self.left => Some(Side::Right),
            (true, _) => Some(Side::Left),
            (false, true) => Some(Side::Right),
            (false, false) => None,
        }
    }

    pub fn leader(&self) -> Option<Side> {
        match self.left.cmp(&self.right) {
            std::cmp::Ordering::Greater => Some(Side::Left),
            std::cmp::Ordering::Less => Some(Side::Right),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Random number generator
#[derive(Debug, Clone)]
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }

    /// Uniform value in (-width/2, width/2)
    pub fn spread(&mut self, width: f32) -> f32 {
        (self.0.gen::<f32>() - 0.5) * width
    }

    /// True with probability `p`; never draws when `p <= 0`
    pub fn chance(&mut self, p: f32) -> bool {
        p > 0.0 && self.0.gen::<f32>() < p
    }

    pub fn coin(&mut self) -> bool {
        self.0.gen_bool(0.5)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Events that occurred during this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Events {
    pub served: bool,
    pub left_scored: bool,
    pub right_scored: bool,
    pub ball_hit_paddle: Option<Side>,
    pub ball_hit_wall: bool,
    pub command_applied: Option<Command>,
    pub match_over: Option<MatchResult>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn scored(&self) -> Option<Side> {
        if self.left_scored {
            Some(Side::Left)
        } else if self.right_scored {
            Some(Side::Right)
        } else {
            None
        }
    }
}
