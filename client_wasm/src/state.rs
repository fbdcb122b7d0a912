//! Client-side view of a host-driven match.
//!
//! Snapshots replace the view wholesale. Nothing is simulated here: if the
//! feed goes quiet the last snapshot is shown as-is.

use game_core::{MatchResult, MatchState, Snapshot};

#[derive(Debug, Clone, Default)]
pub struct RemoteView {
    state: MatchState,
    snapshots: u64,
    frames_since_update: u32,
    frozen: bool,
    result: Option<MatchResult>,
}

impl RemoteView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the view from a host snapshot. Ignored once frozen.
    pub fn apply(&mut self, snapshot: &Snapshot) -> bool {
        if self.frozen {
            return false;
        }
        self.state.apply_snapshot(snapshot);
        self.snapshots += 1;
        self.frames_since_update = 0;
        true
    }

    /// Count a rendered frame
    pub fn tick(&mut self) {
        self.frames_since_update = self.frames_since_update.saturating_add(1);
    }

    /// Keep showing the last known state; later snapshots are dropped
    pub fn freeze(&mut self) {
        if !self.frozen {
            tracing::debug!(snapshots = self.snapshots, "remote view frozen");
        }
        self.frozen = true;
    }

    /// Record the host's match result. Returns `true` only the first time.
    pub fn finish(&mut self, result: MatchResult) -> bool {
        if self.result.is_some() {
            return false;
        }
        self.state.score = result.score;
        self.result = Some(result);
        true
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn snapshots(&self) -> u64 {
        self.snapshots
    }

    pub fn frames_since_update(&self) -> u32 {
        self.frames_since_update
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }
}
