//! Pointer, slider and keyboard input mapped onto paddle targets

use game_core::InputFrame;

/// Target change per frame while a key is held
const KEY_STEP: f32 = 0.02;

/// Handle key down event
pub fn handle_key_down(key: &str, current_dir: i8) -> i8 {
    match key {
        "ArrowUp" | "w" | "W" => -1,
        "ArrowDown" | "s" | "S" => 1,
        _ => current_dir,
    }
}

/// Handle key up event
pub fn handle_key_up(key: &str, current_dir: i8) -> i8 {
    match key {
        "ArrowUp" | "w" | "W" | "ArrowDown" | "s" | "S" => 0,
        _ => current_dir,
    }
}

/// Keys for the second player on a shared keyboard
pub fn handle_opponent_key(key: &str, down: bool, current_dir: i8) -> i8 {
    match (key, down) {
        ("i" | "I", true) => -1,
        ("k" | "K", true) => 1,
        ("i" | "I" | "k" | "K", false) => 0,
        _ => current_dir,
    }
}

fn percent_to_target(percent: f32) -> Option<f32> {
    percent
        .is_finite()
        .then(|| (percent / 100.0).clamp(0.0, 1.0))
}

/// Input intents collected between frames. Only `frame()` leaves this
/// struct; the match state is never touched directly.
#[derive(Debug, Clone)]
pub struct InputState {
    local: f32,
    opponent: f32,
    local_dir: i8,
    opponent_dir: i8,
    thumb_scale: f32,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            local: 0.5,
            opponent: 0.5,
            local_dir: 0,
            opponent_dir: 0,
            thumb_scale: 1.0,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slider or pointer position for the local paddle, 0-100
    pub fn set_local_percent(&mut self, percent: f32) {
        if let Some(target) = percent_to_target(percent) {
            self.local = target;
        }
    }

    pub fn set_opponent_percent(&mut self, percent: f32) {
        if let Some(target) = percent_to_target(percent) {
            self.opponent = target;
        }
    }

    pub fn key_down(&mut self, key: &str) {
        self.local_dir = handle_key_down(key, self.local_dir);
        self.opponent_dir = handle_opponent_key(key, true, self.opponent_dir);
    }

    pub fn key_up(&mut self, key: &str) {
        self.local_dir = handle_key_up(key, self.local_dir);
        self.opponent_dir = handle_opponent_key(key, false, self.opponent_dir);
    }

    pub fn set_thumb_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.thumb_scale = scale;
        }
    }

    pub fn local_target(&self) -> f32 {
        self.local
    }

    /// Slider thumb size for the current scale
    pub fn thumb_size_px(&self) -> f32 {
        InputFrame {
            local: self.local,
            opponent: self.opponent,
            thumb_scale: self.thumb_scale,
        }
        .thumb_size_px()
    }

    /// Apply held keys and produce this frame's intents
    pub fn frame(&mut self) -> InputFrame {
        self.local = (self.local + f32::from(self.local_dir) * KEY_STEP).clamp(0.0, 1.0);
        self.opponent = (self.opponent + f32::from(self.opponent_dir) * KEY_STEP).clamp(0.0, 1.0);
        InputFrame {
            local: self.local,
            opponent: self.opponent,
            thumb_scale: self.thumb_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_directions() {
        assert_eq!(handle_key_down("ArrowUp", 0), -1);
        assert_eq!(handle_key_down("s", 0), 1);
        assert_eq!(handle_key_down("x", 1), 1);
        assert_eq!(handle_key_up("w", -1), 0);
        assert_eq!(handle_key_up("x", -1), -1);
    }

    #[test]
    fn test_slider_percent_maps_to_target() {
        let mut input = InputState::new();
        input.set_local_percent(25.0);
        input.set_opponent_percent(140.0);
        let frame = input.frame();
        assert_eq!(frame.local, 0.25);
        assert_eq!(frame.opponent, 1.0);
    }

    #[test]
    fn test_non_finite_slider_is_ignored() {
        let mut input = InputState::new();
        input.set_local_percent(30.0);
        input.set_local_percent(f32::NAN);
        assert_eq!(input.local_target(), 0.3);
    }

    #[test]
    fn test_held_key_nudges_until_edge() {
        let mut input = InputState::new();
        input.set_local_percent(1.0);
        input.key_down("ArrowUp");
        assert!(input.frame().local < 0.01);
        assert_eq!(input.frame().local, 0.0);

        input.key_up("ArrowUp");
        input.key_down("k");
        let frame = input.frame();
        assert_eq!(frame.local, 0.0);
        assert!(frame.opponent > 0.5);
    }

    #[test]
    fn test_thumb_scale_carried() {
        let mut input = InputState::new();
        input.set_thumb_scale(2.0);
        input.set_thumb_scale(-1.0);
        assert_eq!(input.frame().thumb_scale, 2.0);
        assert_eq!(input.thumb_size_px(), 16.0);
    }
}
