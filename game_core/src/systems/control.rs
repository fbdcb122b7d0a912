use crate::predict::predict;
use crate::systems::bot_target;
use crate::{ControlSource, GameRng, InputFrame, MatchState, Params, Side, Time, Tuning};

/// Position both paddles from their control source for this tick.
///
/// A frozen side and a lagging bot keep last tick's position. The final
/// clamp happens at the end of the step.
pub fn position_paddles(
    state: &mut MatchState,
    input: &InputFrame,
    tuning: &Tuning,
    time: &Time,
    rng: &mut GameRng,
) {
    for side in Side::BOTH {
        if tuning.is_frozen(side, time.now_ms) {
            continue;
        }

        let current = state.paddle(side).y;
        let next = match tuning.control(side) {
            ControlSource::Manual => input.target(side, tuning.local_side),
            ControlSource::Magnet => {
                Some(current + (state.ball.pos.y - current) * Params::MAGNET_BLEND)
            }
            ControlSource::Assisted => {
                let aim = interception(state, side);
                Some(current + (aim - current) * Params::ASSIST_BLEND)
            }
            ControlSource::Auto => Some(interception(state, side)),
            ControlSource::Bot(difficulty) => {
                if rng.chance(tuning.bot_lag_chance) {
                    None
                } else {
                    Some(bot_target(current, state, difficulty, rng))
                }
            }
        };

        if let Some(y) = next {
            state.paddle_mut(side).y = y;
        }
    }
}

/// Predicted y where the ball meets `side`'s aim line
pub fn interception(state: &MatchState, side: Side) -> f32 {
    predict(state.ball.pos, state.ball.vel, side.aim_x())
}
