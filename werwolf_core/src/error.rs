use thiserror::Error;

use crate::{effect::EffectId, player::PlayerId, role::RoleId, storage::StorageError};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Role \"{name}\" with ID \"{id}\" already exists")]
    DuplicateRole { name: String, id: RoleId },

    #[error("Role \"{0}\" has no usable characters for an ID")]
    EmptyRoleId(String),

    #[error("Effect \"{name}\" with ID \"{id}\" already exists")]
    DuplicateEffect { name: String, id: EffectId },

    #[error("Effect \"{0}\" has no usable characters for an ID")]
    EmptyEffectId(String),

    #[error("Role \"{0}\" is a default role and cannot be deleted")]
    DefaultRoleNotDeletable(RoleId),

    #[error("player {index} does not exist, {count} players were dealt")]
    PlayerOutOfRange { index: PlayerId, count: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("saved custom roles are corrupt: {0}")]
    CorruptCustomRoles(#[from] serde_json::Error),
}

impl GameError {
    /// Whether the user caused the error and should be told about it.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, GameError::PlayerOutOfRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
