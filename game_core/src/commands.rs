//! Single-slot mailbox for one-shot debug commands

use crate::{Params, Side};

/// A one-shot command applied by the physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AddScore { side: Side, amount: u32 },
    ForceWin { side: Side },
    Reset,
}

/// Holds at most one pending command. Repeated submits before the step
/// consumes it overwrite the slot, so a burst applies once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSlot {
    pending: Option<Command>,
    last_applied_ms: Option<u64>,
}

impl CommandSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, command: Command) {
        self.pending = Some(command);
    }

    pub fn pending(&self) -> Option<Command> {
        self.pending
    }

    /// Take the pending command unless the last one was applied within the
    /// re-entry delay; in that case it stays queued.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<Command> {
        if let Some(last) = self.last_applied_ms {
            if now_ms.saturating_sub(last) <= Params::COMMAND_COOLDOWN_MS {
                return None;
            }
        }
        let command = self.pending.take()?;
        self.last_applied_ms = Some(now_ms);
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot_yields_nothing() {
        let mut slot = CommandSlot::new();
        assert_eq!(slot.take_ready(1_000), None);
    }

    #[test]
    fn test_burst_applies_once() {
        let mut slot = CommandSlot::new();
        let cmd = Command::AddScore {
            side: Side::Left,
            amount: 99,
        };
        slot.submit(cmd);
        slot.submit(cmd);
        slot.submit(cmd);

        assert_eq!(slot.take_ready(1_000), Some(cmd));
        assert_eq!(slot.take_ready(5_000), None);
    }

    #[test]
    fn test_reentry_delay_keeps_command_pending() {
        let mut slot = CommandSlot::new();
        slot.submit(Command::Reset);
        assert_eq!(slot.take_ready(1_000), Some(Command::Reset));

        slot.submit(Command::Reset);
        assert_eq!(slot.take_ready(1_100), None);
        assert_eq!(slot.pending(), Some(Command::Reset));
        assert_eq!(slot.take_ready(1_200), None);
        assert_eq!(slot.take_ready(1_201), Some(Command::Reset));
        assert_eq!(slot.pending(), None);
    }
}
