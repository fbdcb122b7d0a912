use glam::Vec2;

use crate::{MatchState, Params, Tuning};

/// Repair a ball that left the valid numeric range.
///
/// A non-finite ball goes back to the centre awaiting a serve. Otherwise
/// `|vx|` is held within the sane band so the ball can neither stall nor
/// jump across a paddle in one tick.
pub fn sanitize_ball(state: &mut MatchState) {
    let ball = &mut state.ball;
    if !ball.pos.is_finite() || !ball.vel.is_finite() {
        tracing::warn!(pos = ?ball.pos, vel = ?ball.vel, "non-finite ball, re-centring");
        ball.pos = Vec2::splat(0.5);
        ball.vel = Vec2::ZERO;
        state.serve_ready = true;
        return;
    }

    if state.serve_ready {
        return;
    }

    let speed = ball
        .vel
        .x
        .abs()
        .clamp(Params::BALL_MIN_SPEED_X, Params::BALL_MAX_SPEED_X);
    ball.vel.x = if ball.vel.x < 0.0 { -speed } else { speed };
}

/// Advance the ball one tick, scaled by the time flow. A stopped world
/// leaves velocity untouched as well.
pub fn move_ball(state: &mut MatchState, tuning: &Tuning) {
    let factor = tuning.time_flow.factor();
    if factor == 0.0 {
        return;
    }

    if tuning.soft_slow {
        let local = tuning.local_side;
        let paddle_y = state.paddle(local).y;
        if local.is_incoming(state.ball.vel.x)
            && (paddle_y - state.ball.pos.y).abs() < Params::SOFT_SLOW_RANGE
        {
            state.ball.vel.x *= Params::SOFT_SLOW_DRAG;
        }
    }

    state.ball.pos += state.ball.vel * factor;
}
