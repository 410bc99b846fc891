//! Match state: players, whose turn it is, and when the table has settled.

use baize_engine::EngineContext;

use crate::balls::ColorSlot;
use crate::error::SnookerError;
use crate::rack::LayoutMode;
use crate::registry::BallRegistry;

/// Consecutive at-rest ticks needed before a turn is handed over.
pub const MIN_SETTLE_TICKS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Players {
    names: [String; 2],
}

impl Players {
    /// Names are trimmed and must be non-empty and differ ignoring case.
    pub fn new(first: &str, second: &str) -> Result<Self, SnookerError> {
        let first = first.trim();
        let second = second.trim();
        if first.is_empty() {
            return Err(SnookerError::EmptyPlayerName { seat: 1 });
        }
        if second.is_empty() {
            return Err(SnookerError::EmptyPlayerName { seat: 2 });
        }
        if first.to_lowercase() == second.to_lowercase() {
            return Err(SnookerError::DuplicatePlayerNames {
                name: first.to_string(),
            });
        }
        Ok(Self {
            names: [first.to_string(), second.to_string()],
        })
    }

    pub fn name(&self, index: usize) -> &str {
        &self.names[index % 2]
    }
}

#[derive(Debug, Clone)]
pub struct MatchState {
    pub players: Option<Players>,
    /// 0 or 1.
    pub active: usize,
    /// Whether the cue ball may be picked up or struck.
    pub cue_in_play: bool,
    /// Most recent colored pot, for the consecutive-colour foul.
    pub last_colored: Option<ColorSlot>,
    pub mode: LayoutMode,
    pub level: u32,
}

impl Default for MatchState {
    fn default() -> Self {
        Self {
            players: None,
            active: 0,
            cue_in_play: true,
            last_colored: None,
            mode: LayoutMode::Triangle,
            level: 1,
        }
    }
}

impl MatchState {
    pub fn started(&self) -> bool {
        self.players.is_some()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.players.as_ref().map(|p| p.name(self.active))
    }

    /// "<name>'s Turn", or an empty string before the match starts.
    pub fn turn_label(&self) -> String {
        self.active_name()
            .map(|name| format!("{}'s Turn", name))
            .unwrap_or_default()
    }

    /// Hand the table to the other player with the cue ball back in play.
    pub fn end_turn(&mut self) -> String {
        self.active = (self.active + 1) % 2;
        self.cue_in_play = true;
        let label = self.turn_label();
        log::info!("turn over, now {}", label);
        label
    }
}

/// Every ball on the table is below `eps` px/s. Balls in a pot animation
/// are not on the table and are skipped.
pub fn is_table_at_rest(ctx: &EngineContext, registry: &BallRegistry, eps: f32) -> bool {
    registry
        .snapshot(ctx)
        .iter()
        .filter(|b| !b.pocketed)
        .all(|b| b.vel.length() < eps)
}

/// Counts consecutive settled ticks so a single quiet frame right after a
/// collision does not end the turn.
#[derive(Debug, Default, Clone, Copy)]
pub struct RestDetector {
    settled_ticks: u32,
}

impl RestDetector {
    /// Feed one tick's observation. Returns `true` once the table has been
    /// quiet for [`MIN_SETTLE_TICKS`] ticks in a row.
    pub fn observe(&mut self, at_rest: bool) -> bool {
        if at_rest {
            self.settled_ticks += 1;
        } else {
            self.settled_ticks = 0;
        }
        self.settled_ticks >= MIN_SETTLE_TICKS
    }

    pub fn reset(&mut self) {
        self.settled_ticks = 0;
    }
}
