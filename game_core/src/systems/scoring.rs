use crate::{Events, GameRng, MatchConfig, MatchPhase, MatchResult, MatchState, Params, Side, Tuning, WinCondition};

/// Check if the ball left the arena (scoring)
pub fn check_scoring(state: &mut MatchState, rng: &mut GameRng, events: &mut Events) {
    let scorer = if state.ball.pos.x < 0.0 {
        Side::Right
    } else if state.ball.pos.x > 1.0 {
        Side::Left
    } else {
        return;
    };

    state.score.increment(scorer);
    match scorer {
        Side::Left => events.left_scored = true,
        Side::Right => events.right_scored = true,
    }

    state.ball.reset(scorer, rng);
    state.serve_ready = true;
    state.rally = 0;
    tracing::debug!(?scorer, left = state.score.left, right = state.score.right, "point");
}

/// Advance the simulated match clock by one tick of play
pub fn advance_clock(state: &mut MatchState, tuning: &Tuning) {
    if !state.is_over() {
        state.elapsed_ms += Params::TICK_MS * f64::from(tuning.time_flow.factor());
    }
}

/// Evaluate the win condition once per tick. Terminal at most once; a
/// decided match stays decided until a reset.
pub fn check_match_over(
    state: &mut MatchState,
    config: &MatchConfig,
    forced: Option<Side>,
    events: &mut Events,
) {
    if state.is_over() {
        return;
    }

    let winner = forced.or_else(|| match config.win_condition {
        WinCondition::Score(target) => state.score.has_winner(target),
        WinCondition::Time { seconds } => {
            if state.elapsed_ms >= f64::from(seconds) * 1000.0 {
                // Level at the buzzer plays on as sudden death
                state.score.leader()
            } else {
                None
            }
        }
    });

    let Some(winner) = winner else {
        return;
    };

    state.phase = MatchPhase::Over { winner };
    let result = MatchResult {
        winner,
        score: state.score,
        max_rally: state.max_rally,
        forced: forced.is_some(),
    };
    tracing::info!(?winner, left = result.score.left, right = result.score.right, "match over");
    events.match_over = Some(result);
}
