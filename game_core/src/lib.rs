pub mod clock;
pub mod commands;
pub mod components;
pub mod config;
pub mod params;
pub mod predict;
pub mod report;
pub mod resources;
pub mod state;
pub mod systems;

pub use clock::*;
pub use commands::*;
pub use components::*;
pub use config::*;
pub use params::*;
pub use predict::{predict, trace};
pub use report::*;
pub use resources::*;
pub use state::*;

use systems::*;

/// Advance the match by one tick.
///
/// Motion is a constant increment per tick; `time` only feeds the freeze
/// and command timers. Never fails: bad values are repaired in place.
#[allow(clippy::too_many_arguments)]
pub fn step(
    state: &mut MatchState,
    input: &InputFrame,
    config: &MatchConfig,
    tuning: &Tuning,
    commands: &mut CommandSlot,
    time: &Time,
    rng: &mut GameRng,
    events: &mut Events,
) {
    // Clear events at start of tick
    events.clear();
    state.tick += 1;

    sanitize_ball(state);
    let forced = apply_pending_command(state, config, commands, time, events);

    if state.is_over() {
        state.clamp_paddles(tuning);
        return;
    }

    // 1. Paddles from their control source (input, aids or bot)
    position_paddles(state, input, tuning, time, rng);

    // 2. Serve after a point
    serve_ball(state, tuning, rng, events);

    // 3. Debug steering, then integrate
    steer(state, tuning, time);
    move_ball(state, tuning);

    // 4. Walls and paddles
    check_collisions(state, tuning, events);

    // 5. Goals
    check_scoring(state, rng, events);

    // 6. Terminal check
    advance_clock(state, tuning);
    check_match_over(state, config, forced, events);

    state.clamp_paddles(tuning);
}
