//! Read-only forward projection of the ball path.
//!
//! Only wall bounces are simulated; paddles are ignored. Nothing here touches
//! `MatchState`.

use glam::Vec2;

use crate::Params;

fn bounce_walls(pos: &mut Vec2, vel: &mut Vec2) -> bool {
    let (lo, hi) = (Params::BALL_RADIUS, 1.0 - Params::BALL_RADIUS);
    if pos.y <= lo {
        vel.y = vel.y.abs();
        pos.y = lo;
        true
    } else if pos.y >= hi {
        vel.y = -vel.y.abs();
        pos.y = hi;
        true
    } else {
        false
    }
}

/// Y at which the ball will cross `target_x`.
///
/// Returns the current y unchanged when the ball is not moving toward
/// `target_x`, and the last simulated y if the step bound runs out first.
pub fn predict(pos: Vec2, vel: Vec2, target_x: f32) -> f32 {
    let direction = (target_x - pos.x).signum();
    if !vel.x.is_finite() || !vel.y.is_finite() || vel.x * direction <= 0.0 {
        return pos.y;
    }

    let (mut pos, mut vel) = (pos, vel);
    for _ in 0..Params::PREDICT_MAX_STEPS {
        pos += vel;
        bounce_walls(&mut pos, &mut vel);

        let crossed = if direction < 0.0 {
            pos.x <= target_x
        } else {
            pos.x >= target_x
        };
        if crossed {
            return pos.y.clamp(0.0, 1.0);
        }
    }
    pos.y
}

/// Polyline of the ball path through up to `max_reflections` side-wall
/// reflections, for the on-screen preview. Top/bottom bounces add vertices
/// but do not count.
pub fn trace(pos: Vec2, vel: Vec2, max_reflections: u8) -> Vec<Vec2> {
    let max_reflections = max_reflections.clamp(1, Params::MAX_TRAJECTORY_REFLECTIONS);
    let mut points = vec![pos];
    if vel == Vec2::ZERO || !vel.is_finite() {
        return points;
    }

    let (lo, hi) = (Params::BALL_RADIUS, 1.0 - Params::BALL_RADIUS);
    let steps = Params::TRACE_BASE_STEPS
        + u32::from(max_reflections) * Params::TRACE_STEPS_PER_REFLECTION;
    let (mut pos, mut vel) = (pos, vel);
    let mut reflections = 0;

    for _ in 0..steps {
        pos += vel;
        let mut turned = bounce_walls(&mut pos, &mut vel);

        if pos.x <= lo || pos.x >= hi {
            vel.x = if pos.x <= lo { vel.x.abs() } else { -vel.x.abs() };
            pos.x = pos.x.clamp(lo, hi);
            reflections += 1;
            turned = true;
        }

        if turned {
            points.push(pos);
            if reflections >= max_reflections {
                return points;
            }
        }
    }

    points.push(pos);
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_shot() {
        let y = predict(Vec2::new(0.5, 0.3), Vec2::new(0.01, 0.0), 0.98);
        assert!((y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_wrong_direction_returns_current_y() {
        let y = predict(Vec2::new(0.5, 0.3), Vec2::new(-0.01, 0.004), 0.98);
        assert_eq!(y, 0.3);
        let y = predict(Vec2::new(0.5, 0.3), Vec2::new(0.0, 0.004), 0.02);
        assert_eq!(y, 0.3);
    }

    #[test]
    fn test_prediction_folds_wall_bounce() {
        // Reaches the bottom wall after ~19 steps, then comes back up.
        let y = predict(Vec2::new(0.5, 0.8), Vec2::new(0.0096, 0.01), 0.98);
        assert!(y < 0.99 && y > 0.5, "bounced back into the arena, got {y}");
    }

    #[test]
    fn test_prediction_is_pure() {
        let (pos, vel) = (Vec2::new(0.4, 0.6), Vec2::new(-0.008, 0.0037));
        let a = predict(pos, vel, 0.02);
        let b = predict(pos, vel, 0.02);
        assert_eq!(a, b);
    }

    #[test]
    fn test_prediction_step_bound() {
        // Too slow to arrive within the step bound
        let y = predict(Vec2::new(0.1, 0.5), Vec2::new(0.00001, 0.0), 0.98);
        assert_eq!(y, 0.5);
    }

    #[test]
    fn test_trace_stops_at_reflection_cap() {
        let points = trace(Vec2::new(0.5, 0.5), Vec2::new(0.01, 0.003), 3);
        let side_hits = points
            .iter()
            .skip(1)
            .filter(|p| p.x <= Params::BALL_RADIUS || p.x >= 1.0 - Params::BALL_RADIUS)
            .count();
        assert_eq!(side_hits, 3);
        assert_eq!(points[0], Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_trace_stationary_ball() {
        let points = trace(Vec2::new(0.5, 0.5), Vec2::ZERO, 2);
        assert_eq!(points, vec![Vec2::new(0.5, 0.5)]);
    }
}
