use crate::{Events, MatchState, Params, Side, Tuning};

/// Check ball collisions with walls and paddles
pub fn check_collisions(state: &mut MatchState, tuning: &Tuning, events: &mut Events) {
    let (lo, hi) = (Params::BALL_RADIUS, 1.0 - Params::BALL_RADIUS);
    let ball = &mut state.ball;

    // Top/bottom walls: force the sign so a ball clamped onto the wall
    // cannot flip back out of the arena next tick.
    if ball.pos.y <= lo {
        ball.pos.y = lo;
        ball.vel.y = ball.vel.y.abs();
        events.ball_hit_wall = true;
    } else if ball.pos.y >= hi {
        ball.pos.y = hi;
        ball.vel.y = -ball.vel.y.abs();
        events.ball_hit_wall = true;
    }

    for side in Side::BOTH {
        if !side.is_incoming(state.ball.vel.x) || !reached_plane(state, side) {
            continue;
        }

        let height = tuning.paddle_height(side);
        let margin = tuning.hitbox_margin(side);
        let paddle = state.paddle(side);
        let y = state.ball.pos.y;
        if y < paddle.top(height) - margin || y > paddle.bottom(height) + margin {
            continue;
        }

        let away = -side.incoming_sign();
        let speed = (state.ball.vel.x.abs() * Params::BOUNCE_SPEEDUP).min(Params::BALL_MAX_SPEED_X);
        state.ball.vel.x = away * speed;
        state.ball.pos.x = side.collision_x() + away * Params::PADDLE_CLEARANCE;

        state.rally += 1;
        state.max_rally = state.max_rally.max(state.rally);
        events.ball_hit_paddle = Some(side);
        return;
    }
}

/// Ball is at or past the paddle plane but has not crossed the goal line
fn reached_plane(state: &MatchState, side: Side) -> bool {
    let x = state.ball.pos.x;
    match side {
        Side::Left => (0.0..=side.collision_x()).contains(&x),
        Side::Right => (side.collision_x()..=1.0).contains(&x),
    }
}
