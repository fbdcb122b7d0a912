use glam::Vec2;

use crate::{MatchState, Params, Time, Tuning};

/// Debug aids that act on the ball or the local paddle outside the normal
/// control sources. Velocity is only bent while time is flowing.
pub fn steer(state: &mut MatchState, tuning: &Tuning, time: &Time) {
    let flowing = tuning.time_flow.factor() > 0.0;

    if let Some(degrees) = tuning.ball_control {
        if flowing && degrees.is_finite() {
            aim_ball(state, degrees);
        }
    }

    if tuning.stealth_assist {
        stealth_assist(state, tuning, time, flowing);
    }
}

/// Point the ball along `degrees` from horizontal without changing its
/// speed or its horizontal direction.
fn aim_ball(state: &mut MatchState, degrees: f32) {
    let max = Params::BALL_CONTROL_MAX_DEG;
    let angle = degrees.clamp(-max, max).to_radians();
    let vel = state.ball.vel;
    let speed = vel.length();
    if speed == 0.0 {
        return;
    }
    let sign = if vel.x >= 0.0 { 1.0 } else { -1.0 };
    state.ball.vel = Vec2::new(angle.cos() * speed * sign, angle.sin() * speed);
}

fn stealth_assist(state: &mut MatchState, tuning: &Tuning, time: &Time, flowing: bool) {
    let local = tuning.local_side;
    // Sampled before the pull, like the edge catch expects
    let paddle_y = state.paddle(local).y;
    let ball_y = state.ball.pos.y;

    if local.is_incoming(state.ball.vel.x) {
        if !tuning.is_frozen(local, time.now_ms) {
            state.paddle_mut(local).y += (ball_y - paddle_y) * Params::STEALTH_PULL;
        }
        if flowing && (paddle_y - ball_y).abs() < Params::SOFT_SLOW_RANGE {
            state.ball.vel.x *= Params::SOFT_SLOW_DRAG;
        }
    }

    if flowing && (paddle_y - ball_y).abs() < Params::EDGE_CATCH_RANGE {
        state.ball.vel.y += (paddle_y - ball_y) * Params::EDGE_CATCH_GAIN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Side, TimeFlow};

    fn incoming(pos: Vec2, vel: Vec2) -> MatchState {
        let mut state = MatchState::new();
        state.serve_ready = false;
        state.ball.pos = pos;
        state.ball.vel = vel;
        state
    }

    #[test]
    fn test_ball_control_keeps_speed_and_direction() {
        let mut state = incoming(Vec2::new(0.5, 0.5), Vec2::new(-0.008, 0.006));
        let tuning = Tuning {
            ball_control: Some(30.0),
            ..Tuning::default()
        };
        steer(&mut state, &tuning, &Time::default());

        let vel = state.ball.vel;
        assert!((vel.length() - 0.01).abs() < 1e-6);
        assert!(vel.x < 0.0);
        assert!((vel.y / vel.x.abs() - 30f32.to_radians().tan()).abs() < 1e-4);
    }

    #[test]
    fn test_ball_control_angle_is_capped() {
        let mut state = incoming(Vec2::new(0.5, 0.5), Vec2::new(0.01, 0.0));
        let tuning = Tuning {
            ball_control: Some(-90.0),
            ..Tuning::default()
        };
        steer(&mut state, &tuning, &Time::default());

        let expected = Vec2::new(0.005, -(60f32.to_radians().sin()) * 0.01);
        assert!((state.ball.vel - expected).length() < 1e-6);
    }

    #[test]
    fn test_stealth_assist_pulls_paddle_and_bends_ball() {
        let mut state = incoming(Vec2::new(0.3, 0.55), Vec2::new(-0.01, 0.0));
        state.paddle_mut(Side::Left).y = 0.5;
        let tuning = Tuning {
            stealth_assist: true,
            ..Tuning::default()
        };
        steer(&mut state, &tuning, &Time::default());

        assert!((state.paddle(Side::Left).y - 0.5025).abs() < 1e-6);
        assert!((state.ball.vel.x + 0.00995).abs() < 1e-7);
        assert!((state.ball.vel.y + 0.05 * Params::EDGE_CATCH_GAIN).abs() < 1e-8);
    }

    #[test]
    fn test_stealth_assist_ignores_receding_ball_paddle() {
        let mut state = incoming(Vec2::new(0.3, 0.7), Vec2::new(0.01, 0.0));
        state.paddle_mut(Side::Left).y = 0.5;
        let tuning = Tuning {
            stealth_assist: true,
            ..Tuning::default()
        };
        steer(&mut state, &tuning, &Time::default());

        assert_eq!(state.paddle(Side::Left).y, 0.5);
        assert_eq!(state.ball.vel, Vec2::new(0.01, 0.0));
    }

    #[test]
    fn test_stopped_world_leaves_velocity_alone() {
        let mut state = incoming(Vec2::new(0.3, 0.52), Vec2::new(-0.01, 0.002));
        state.paddle_mut(Side::Left).y = 0.5;
        let tuning = Tuning {
            stealth_assist: true,
            ball_control: Some(45.0),
            time_flow: TimeFlow::Stopped,
            ..Tuning::default()
        };
        steer(&mut state, &tuning, &Time::default());

        assert_eq!(state.ball.vel, Vec2::new(-0.01, 0.002));
        assert!(state.paddle(Side::Left).y > 0.5);
    }
}
