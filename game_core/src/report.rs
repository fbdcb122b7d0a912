//! One-shot match summary handed to the stats collaborator.

use serde::{Deserialize, Serialize};

use crate::{Command, Events, Score, Side};

/// Outcome of a finished match, emitted once on the terminal tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: Side,
    pub score: Score,
    pub max_rally: u32,
    /// Ended by a `ForceWin` command rather than play
    pub forced: bool,
}

/// Stats delta for one player, as seen from their side of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub score: u32,
    pub max_rally: u32,
}

impl StatsReport {
    pub fn for_side(result: &MatchResult, side: Side) -> Self {
        let won = result.winner == side;
        Self {
            games_played: 1,
            wins: u32::from(won),
            losses: u32::from(!won),
            score: result.score.get(side),
            max_rally: result.max_rally,
        }
    }
}

/// Receiver of finished-match reports (profile storage lives elsewhere)
pub trait StatsSink {
    fn record(&mut self, report: StatsReport);
}

/// Running totals in the shape the profile store keeps them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsTotals {
    pub total_games_played: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub total_score: u32,
    pub max_rally: u32,
}

impl StatsSink for StatsTotals {
    fn record(&mut self, report: StatsReport) {
        self.total_games_played = self.total_games_played.saturating_add(report.games_played);
        self.total_wins = self.total_wins.saturating_add(report.wins);
        self.total_losses = self.total_losses.saturating_add(report.losses);
        self.total_score = self.total_score.saturating_add(report.score);
        self.max_rally = self.max_rally.max(report.max_rally);
    }
}

/// Watches per-tick events and forwards exactly one report per match
/// instance. A `Reset` command starts a new instance.
#[derive(Debug)]
pub struct Reporter<S> {
    local_side: Side,
    sink: S,
    reported: bool,
}

impl<S: StatsSink> Reporter<S> {
    pub fn new(local_side: Side, sink: S) -> Self {
        Self {
            local_side,
            sink,
            reported: false,
        }
    }

    /// Returns the report if this call forwarded one
    pub fn observe(&mut self, events: &Events) -> Option<StatsReport> {
        if events.command_applied == Some(Command::Reset) {
            self.reported = false;
        }
        let result = events.match_over.as_ref()?;
        self.deliver(result)
    }

    /// Deliver a result received from elsewhere (the host's `MatchOver`)
    pub fn deliver(&mut self, result: &MatchResult) -> Option<StatsReport> {
        if self.reported {
            tracing::debug!("match already reported");
            return None;
        }
        self.reported = true;
        let report = StatsReport::for_side(result, self.local_side);
        tracing::info!(?report, "match stats");
        self.sink.record(report);
        Some(report)
    }

    /// Start a new match instance with the same sink, possibly on the
    /// other side of the arena
    pub fn rearm(&mut self, local_side: Side) {
        self.local_side = local_side;
        self.reported = false;
    }

    pub fn has_reported(&self) -> bool {
        self.reported
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
