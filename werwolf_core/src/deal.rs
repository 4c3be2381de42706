use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// Progress of handing out the dealt roles, one player at a time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub active_role_idx: PlayerId,
    /// Sticky for the current player: set the first time the role is shown.
    pub role_was_visible: bool,
    pub role_is_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealPhase {
    /// No players have been dealt.
    NotStarted,
    /// The current player has not looked at their role yet.
    Ready,
    /// The current role is shown.
    Revealing,
    /// The current role was shown and hidden again; the device can be passed on.
    Advancing,
    /// The last player has seen their role.
    Complete,
}

impl Deal {
    pub fn is_last(&self, player_count: usize) -> bool {
        self.active_role_idx + 1 >= player_count
    }

    pub fn toggled_visibility(self) -> Self {
        Deal {
            role_is_visible: !self.role_is_visible,
            role_was_visible: true,
            ..self
        }
    }

    /// Moves on to the next player, or stays put at the last one.
    pub fn next(self, player_count: usize) -> Self {
        if self.is_last(player_count) {
            return self;
        }
        Deal {
            active_role_idx: self.active_role_idx + 1,
            role_was_visible: false,
            role_is_visible: false,
        }
    }

    pub fn phase(&self, player_count: usize) -> DealPhase {
        if player_count == 0 {
            DealPhase::NotStarted
        } else if self.role_is_visible {
            DealPhase::Revealing
        } else if !self.role_was_visible {
            DealPhase::Ready
        } else if self.is_last(player_count) {
            DealPhase::Complete
        } else {
            DealPhase::Advancing
        }
    }
}
