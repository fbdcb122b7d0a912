use crate::{Command, CommandSlot, Events, MatchConfig, MatchState, Side, Time};

/// Apply the pending one-shot command, if its re-entry delay has passed.
/// Returns the side a `ForceWin` just handed the match to.
pub fn apply_pending_command(
    state: &mut MatchState,
    config: &MatchConfig,
    commands: &mut CommandSlot,
    time: &Time,
    events: &mut Events,
) -> Option<Side> {
    let command = commands.take_ready(time.now_ms)?;
    tracing::info!(?command, now_ms = time.now_ms, "applying command");
    events.command_applied = Some(command);

    match command {
        Command::Reset => {
            *state = MatchState {
                tick: state.tick,
                ..MatchState::new()
            };
            None
        }
        // Scores are frozen once the match is decided
        _ if state.is_over() => None,
        Command::AddScore { side, amount } => {
            state.score.add(side, amount);
            None
        }
        Command::ForceWin { side } => {
            if let Some(target) = config.win_condition.target_score() {
                state.score.raise_to(side, target);
            }
            Some(side)
        }
    }
}
