//! Local match driver, used for offline play and by the host online.

use game_core::{
    step, trace, CommandSlot, Events, GameRng, InputFrame, MatchConfig, MatchState, Snapshot,
    Time, Tuning,
};
use glam::Vec2;

pub struct LocalGame {
    pub state: MatchState,
    pub config: MatchConfig,
    pub tuning: Tuning,
    pub commands: CommandSlot,
    pub rng: GameRng,
    pub events: Events,
    /// Latest opponent target received from the remote client
    peer_input: Option<f32>,
}

impl LocalGame {
    pub fn new(config: MatchConfig, tuning: Tuning, seed: u64) -> Self {
        let mut state = MatchState::new();
        state.clamp_paddles(&tuning);
        Self {
            state,
            config,
            tuning,
            commands: CommandSlot::new(),
            rng: GameRng::new(seed),
            events: Events::new(),
            peer_input: None,
        }
    }

    /// Remote client's paddle target; replaces the opponent input from then on
    pub fn set_peer_input(&mut self, target_y: f32) {
        self.peer_input = Some(target_y);
    }

    /// Run one physics tick
    pub fn step(&mut self, input: &InputFrame, time: &Time) -> &Events {
        let mut input = *input;
        if let Some(target) = self.peer_input {
            input.opponent = target;
        }

        step(
            &mut self.state,
            &input,
            &self.config,
            &self.tuning,
            &mut self.commands,
            time,
            &mut self.rng,
            &mut self.events,
        );

        if let Some(side) = self.events.scored() {
            tracing::debug!(?side, score = ?self.state.score, "point");
        }
        &self.events
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Preview polyline, empty unless the trajectory preview is on
    pub fn trajectory(&self) -> Vec<Vec2> {
        match self.tuning.trajectory_reflections() {
            Some(reflections) if !self.state.is_over() => {
                trace(self.state.ball.pos, self.state.ball.vel, reflections)
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Opponent, Side};

    fn host_game() -> LocalGame {
        let config = MatchConfig::default();
        let tuning = Tuning::for_match(&config, Side::Left, Opponent::Human);
        LocalGame::new(config, tuning, 7)
    }

    #[test]
    fn test_first_step_serves() {
        let mut game = host_game();
        let events = game.step(&InputFrame::default(), &Time::new(16));
        assert!(events.served);
        assert!(!game.state.serve_ready);
    }

    #[test]
    fn test_peer_input_drives_opponent() {
        let mut game = host_game();
        game.set_peer_input(0.8);
        game.step(&InputFrame::new(0.5, 0.1), &Time::new(16));

        assert!((game.state.paddle(Side::Right).y - 0.8).abs() < 1e-6);
        assert!((game.state.paddle(Side::Left).y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_trajectory_follows_assist_flag() {
        let mut game = host_game();
        game.step(&InputFrame::default(), &Time::new(16));
        assert!(game.trajectory().is_empty());

        game.tuning.trajectory = Some(2);
        let points = game.trajectory();
        assert!(points.len() >= 2);
        assert_eq!(points[0], game.state.ball.pos);
    }
}
