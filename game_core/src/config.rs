use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Params, Side};

/// Match-ending predicate chosen before play starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinCondition {
    /// First side to reach the target score
    Score(u32),
    /// Leader once the simulated clock passes the target
    Time { seconds: u32 },
}

impl WinCondition {
    pub fn target_score(&self) -> Option<u32> {
        match self {
            WinCondition::Score(target) => Some(*target),
            WinCondition::Time { .. } => None,
        }
    }
}

/// Cosmetic arena backdrop. No physics effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArenaTheme {
    Classic,
    #[default]
    Neon,
    Grid,
    Sunset,
    Ice,
    Void,
    Autumn,
    Winter,
    Royal,
}

/// Cosmetic paddle rendering style. No physics effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaddleStyle {
    Solid,
    #[default]
    Glow,
    Outline,
}

/// Optional assists unlocked outside the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Assists {
    pub trajectory: bool,
    pub soft_magnet: bool,
    pub soft_slow: bool,
    pub stability: bool,
}

/// Match setup produced by the menu and echoed by the relay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub win_condition: WinCondition,
    pub paddle_size_multiplier: f32,
    pub arena_theme: ArenaTheme,
    pub paddle_style: PaddleStyle,
    pub assists: Assists,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            win_condition: WinCondition::Score(Params::DEFAULT_TARGET_SCORE),
            paddle_size_multiplier: 1.0,
            arena_theme: ArenaTheme::default(),
            paddle_style: PaddleStyle::default(),
            assists: Assists::default(),
        }
    }
}

/// Rejected match setup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("target score must be between 1 and {max}, got {got}")]
    TargetScore { got: u32, max: u32 },

    #[error("time limit must be at least one second")]
    ZeroTimeLimit,

    #[error("paddle size multiplier must be within [{min}, {max}], got {got}")]
    PaddleMultiplier { got: f32, min: f32, max: f32 },
}

impl MatchConfig {
    pub const PADDLE_MULTIPLIER_RANGE: (f32, f32) = (1.0, 3.0);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.win_condition {
            WinCondition::Score(target) if target == 0 || target > Params::MAX_TARGET_SCORE => {
                return Err(ConfigError::TargetScore {
                    got: target,
                    max: Params::MAX_TARGET_SCORE,
                });
            }
            WinCondition::Time { seconds: 0 } => return Err(ConfigError::ZeroTimeLimit),
            _ => {}
        }

        let (min, max) = Self::PADDLE_MULTIPLIER_RANGE;
        let multiplier = self.paddle_size_multiplier;
        if !multiplier.is_finite() || !(min..=max).contains(&multiplier) {
            return Err(ConfigError::PaddleMultiplier {
                got: multiplier,
                min,
                max,
            });
        }
        Ok(())
    }
}

/// Bot difficulty tier, easiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BotDifficulty {
    Easy,
    Normal,
    Adaptive,
    Hard,
    Expert,
    Master,
    Nightmare,
    Impossible,
}

/// Smoothing speed and aim error for one tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotProfile {
    pub speed: f32,
    pub error: f32,
}

impl BotDifficulty {
    pub const ALL: [BotDifficulty; 8] = [
        BotDifficulty::Easy,
        BotDifficulty::Normal,
        BotDifficulty::Adaptive,
        BotDifficulty::Hard,
        BotDifficulty::Expert,
        BotDifficulty::Master,
        BotDifficulty::Nightmare,
        BotDifficulty::Impossible,
    ];

    pub fn profile(self) -> BotProfile {
        let (speed, error) = match self {
            BotDifficulty::Easy => (0.01, 0.30),
            BotDifficulty::Normal => (0.02, 0.10),
            BotDifficulty::Adaptive => (0.03, 0.09),
            BotDifficulty::Hard => (0.045, 0.07),
            BotDifficulty::Expert => (0.065, 0.05),
            BotDifficulty::Master => (0.09, 0.03),
            BotDifficulty::Nightmare => (0.15, 0.015),
            BotDifficulty::Impossible => (1.0, 0.0),
        };
        BotProfile { speed, error }
    }
}

/// Who controls the side opposite the local player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opponent {
    Bot(BotDifficulty),
    /// Second local player or the remote client; driven by the opponent input
    Human,
}

/// Which side receives the serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServeTarget {
    Toward(Side),
    #[default]
    Random,
}

/// Global time dilation applied to ball integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFlow {
    #[default]
    Normal,
    Slow,
    Stopped,
}

impl TimeFlow {
    pub fn factor(self) -> f32 {
        match self {
            TimeFlow::Normal => 1.0,
            TimeFlow::Slow => Params::SLOW_MOTION_FACTOR,
            TimeFlow::Stopped => 0.0,
        }
    }
}

/// The one source that positions a paddle on a given tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSource {
    /// Raw input target
    Manual,
    /// Smoothed toward the current ball y
    Magnet,
    /// Smoothed toward the predicted interception
    Assisted,
    /// Locked on the predicted interception
    Auto,
    /// Difficulty-tier policy
    Bot(BotDifficulty),
}

/// Toggles that can take the local paddle away from raw input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaddleAids {
    pub auto_play: bool,
    pub auto_assist: bool,
    pub magnet: bool,
}

impl PaddleAids {
    /// Priority: auto > assisted > magnet > manual
    pub fn source(&self) -> ControlSource {
        if self.auto_play {
            ControlSource::Auto
        } else if self.auto_assist {
            ControlSource::Assisted
        } else if self.magnet {
            ControlSource::Magnet
        } else {
            ControlSource::Manual
        }
    }
}

/// Runtime knobs for one match. Unlike `MatchConfig` these may change
/// mid-match, including while time is stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    pub local_side: Side,
    pub opponent: Opponent,
    pub aids: PaddleAids,
    /// Puts a bot opponent on full auto
    pub bot_auto: bool,
    pub size_multiplier: [f32; 2],
    pub hitbox_margin: [f32; 2],
    pub frozen_until_ms: [u64; 2],
    pub time_flow: TimeFlow,
    pub bot_lag_chance: f32,
    pub serve_target: ServeTarget,
    pub soft_slow: bool,
    /// Reflections shown by the trajectory preview; `None` hides it
    pub trajectory: Option<u8>,
    /// Pulls the local paddle toward the ball and bends the ball toward it
    pub stealth_assist: bool,
    /// Re-aim the ball every tick at this angle in degrees, keeping its speed
    pub ball_control: Option<f32>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            local_side: Side::Left,
            opponent: Opponent::Bot(BotDifficulty::Normal),
            aids: PaddleAids::default(),
            bot_auto: false,
            size_multiplier: [1.0; 2],
            hitbox_margin: [0.0; 2],
            frozen_until_ms: [0; 2],
            time_flow: TimeFlow::Normal,
            bot_lag_chance: 0.0,
            serve_target: ServeTarget::Random,
            soft_slow: false,
            trajectory: None,
            stealth_assist: false,
            ball_control: None,
        }
    }
}

impl Tuning {
    /// Derive the starting knobs from a validated match setup
    pub fn for_match(config: &MatchConfig, local_side: Side, opponent: Opponent) -> Self {
        let assists = config.assists;
        let mut tuning = Self {
            local_side,
            opponent,
            size_multiplier: [config.paddle_size_multiplier; 2],
            soft_slow: assists.soft_slow,
            trajectory: assists.trajectory.then_some(1),
            ..Self::default()
        };
        tuning.aids.magnet = assists.soft_magnet;
        if assists.stability {
            tuning.hitbox_margin[local_side.index()] = Params::STABILITY_MARGIN;
        }
        tuning
    }

    /// Resolve the control source for `side` on this tick
    pub fn control(&self, side: Side) -> ControlSource {
        if side == self.local_side {
            return self.aids.source();
        }
        match self.opponent {
            Opponent::Bot(_) if self.bot_auto => ControlSource::Auto,
            Opponent::Bot(difficulty) => ControlSource::Bot(difficulty),
            Opponent::Human => ControlSource::Manual,
        }
    }

    pub fn paddle_height(&self, side: Side) -> f32 {
        let multiplier = self.size_multiplier[side.index()];
        let multiplier = if multiplier.is_finite() {
            multiplier.clamp(Params::PADDLE_MULTIPLIER_MIN, Params::PADDLE_MULTIPLIER_MAX)
        } else {
            1.0
        };
        (Params::PADDLE_BASE_HEIGHT * multiplier)
            .clamp(Params::PADDLE_MIN_HEIGHT, Params::PADDLE_MAX_HEIGHT)
    }

    pub fn hitbox_margin(&self, side: Side) -> f32 {
        let margin = self.hitbox_margin[side.index()];
        if margin.is_finite() {
            margin.max(0.0)
        } else {
            0.0
        }
    }

    pub fn is_frozen(&self, side: Side, now_ms: u64) -> bool {
        now_ms < self.frozen_until_ms[side.index()]
    }

    /// Freeze a side's paddle until an absolute timestamp
    pub fn freeze(&mut self, side: Side, until_ms: u64) {
        self.frozen_until_ms[side.index()] = until_ms;
    }

    pub fn set_ghost_hit(&mut self, enabled: bool) {
        let margin = if enabled { Params::GHOST_HIT_MARGIN } else { 0.0 };
        self.hitbox_margin[self.local_side.index()] = margin;
    }

    /// Reflection count for the preview, clamped to the supported range
    pub fn trajectory_reflections(&self) -> Option<u8> {
        self.trajectory
            .map(|n| n.clamp(1, Params::MAX_TRAJECTORY_REFLECTIONS))
    }
}
