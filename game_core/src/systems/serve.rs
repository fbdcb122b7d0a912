use glam::Vec2;

use crate::{Events, GameRng, MatchState, Params, ServeTarget, Side, Tuning};

/// Launch the ball if a point just ended. Consumes `serve_ready`.
pub fn serve_ball(state: &mut MatchState, tuning: &Tuning, rng: &mut GameRng, events: &mut Events) {
    if !state.serve_ready {
        return;
    }

    let toward = match tuning.serve_target {
        ServeTarget::Toward(side) => side,
        ServeTarget::Random => {
            if rng.coin() {
                Side::Left
            } else {
                Side::Right
            }
        }
    };

    state.ball.vel = Vec2::new(
        toward.incoming_sign() * Params::SERVE_SPEED_X,
        rng.spread(Params::SERVE_SPREAD_Y),
    );
    state.serve_ready = false;
    state.rally = 0;
    events.served = true;
    tracing::debug!(?toward, vy = state.ball.vel.y, "serve");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_toward_named_side() {
        for side in Side::BOTH {
            let mut state = MatchState::new();
            let tuning = Tuning {
                serve_target: ServeTarget::Toward(side),
                ..Tuning::default()
            };
            let mut events = Events::new();
            serve_ball(&mut state, &tuning, &mut GameRng::new(9), &mut events);

            assert!(side.is_incoming(state.ball.vel.x));
            assert_eq!(state.ball.vel.x.abs(), Params::SERVE_SPEED_X);
            assert!(state.ball.vel.y.abs() <= Params::SERVE_SPREAD_Y / 2.0);
            assert!(!state.serve_ready);
            assert!(events.served);
        }
    }

    #[test]
    fn test_random_serve_reaches_both_sides() {
        let mut rng = GameRng::new(21);
        let mut seen = [false; 2];
        for _ in 0..64 {
            let mut state = MatchState::new();
            serve_ball(&mut state, &Tuning::default(), &mut rng, &mut Events::new());
            let side = if state.ball.vel.x < 0.0 { Side::Left } else { Side::Right };
            seen[side.index()] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn test_no_serve_mid_rally() {
        let mut state = MatchState::new();
        state.serve_ready = false;
        state.ball.vel = Vec2::new(-0.02, 0.001);
        let mut events = Events::new();
        serve_ball(&mut state, &Tuning::default(), &mut GameRng::new(1), &mut events);
        assert_eq!(state.ball.vel, Vec2::new(-0.02, 0.001));
        assert!(!events.served);
    }
}
