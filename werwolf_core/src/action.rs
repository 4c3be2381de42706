use serde::{Deserialize, Serialize};

use crate::{
    effect::{Effect, EffectId},
    player::PlayerId,
    role::RoleId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    AddRole(RoleId),
    RemoveRole(RoleId),
    /// Carries the display name; the id is derived from it.
    CreateCustomRole(String),
    DeleteCustomRole(RoleId),
    ResetRoles,
    DealRoles { seed: u64 },
    ToggleRoleVisibility,
    DealNextRole,
    TogglePlayerAlive(PlayerId),
    CreateEffect { effect: Effect, player: PlayerId },
    DeleteEffect(EffectId),
    TogglePlayerEffect { player: PlayerId, effect: EffectId },
    FullReset,
}

impl Action {
    /// Deals with a freshly drawn seed.
    pub fn deal_roles() -> Self {
        Action::DealRoles {
            seed: rand::random(),
        }
    }

    /// The player index the action addresses, if any.
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Action::TogglePlayerAlive(player)
            | Action::CreateEffect { player, .. }
            | Action::TogglePlayerEffect { player, .. } => Some(*player),
            _ => None,
        }
    }

    pub fn changes_custom_roles(&self) -> bool {
        matches!(
            self,
            Action::CreateCustomRole(_) | Action::DeleteCustomRole(_)
        )
    }
}
