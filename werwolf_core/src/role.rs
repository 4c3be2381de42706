use std::collections::BTreeMap;

use itertools::Itertools;
use strum::{EnumMessage, IntoEnumIterator};
use strum_macros::{Display, EnumIter, EnumMessage};

use crate::utils::derive_id;

pub type RoleId = String;

/// Role id to display name.
pub type RoleCatalogue = BTreeMap<RoleId, String>;

/// Role id to the number of players that will be dealt the role.
pub type PickCounts = BTreeMap<RoleId, u32>;

#[derive(Debug, PartialEq, Eq, Copy, Clone, Display, EnumIter, EnumMessage)]
pub enum DefaultRole {
    #[strum(message = "Has no special ability. Tries to find the werewolves and lynch them.")]
    Villager,
    #[strum(
        message = "Wakes up every night together with the other werewolves and picks a victim. Wins when the werewolves outnumber the villagers."
    )]
    Werewolf,
    #[strum(message = "Wakes up every night and may look at the role of one player.")]
    Seer,
    #[strum(
        message = "Owns one healing potion and one poison potion. Each may be used once per game, at night."
    )]
    Witch,
    #[strum(message = "When the hunter dies, they take one other player with them.")]
    Hunter,
    #[strum(
        message = "Picks two lovers in the first night. If one of them dies, the other dies of grief."
    )]
    Cupid,
    #[strum(message = "May swap their role with one of the unused roles in the first night.")]
    Thief,
    #[strum(
        serialize = "Little Girl",
        message = "May peek while the werewolves are awake, but dies instead of the victim if caught."
    )]
    LittleGirl,
}

impl DefaultRole {
    pub fn id(&self) -> RoleId {
        derive_id(&self.to_string())
    }

    pub fn catalogue() -> RoleCatalogue {
        DefaultRole::iter().map(|r| (r.id(), r.to_string())).collect()
    }

    pub fn is_default(id: &str) -> bool {
        DefaultRole::iter().any(|r| r.id() == id)
    }

    pub fn rules() -> String {
        DefaultRole::iter().map(|r| r.rule()).join("\n")
    }

    pub fn rule(&self) -> String {
        format!(
            "{} [{}]: {}",
            self,
            self.id(),
            self.get_message().unwrap_or("No description")
        )
    }
}
