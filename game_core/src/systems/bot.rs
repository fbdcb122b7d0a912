use crate::{BotDifficulty, GameRng, MatchState};

/// Next paddle y for a bot on the given tier.
///
/// Aims at the current ball y plus uniform noise of the tier's error width
/// and closes the gap by the tier's speed. The top tier (speed 1.0, no
/// error) locks onto the ball exactly and draws no randomness.
pub fn bot_target(paddle_y: f32, state: &MatchState, difficulty: BotDifficulty, rng: &mut GameRng) -> f32 {
    let profile = difficulty.profile();
    let noise = if profile.error > 0.0 {
        rng.spread(profile.error)
    } else {
        0.0
    };
    let aim = state.ball.pos.y + noise;

    if profile.speed >= 1.0 {
        aim
    } else {
        paddle_y + (aim - paddle_y) * profile.speed
    }
}
