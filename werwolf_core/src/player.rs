use serde::{Deserialize, Serialize};

use crate::{effect::EffectId, role::RoleId, utils::VecExtensions};

pub type PlayerId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub role: RoleId,
    pub alive: bool,
    /// Active effects, each id at most once.
    pub effects: Vec<EffectId>,
}

impl Player {
    pub fn new(role: impl Into<RoleId>) -> Self {
        Player {
            role: role.into(),
            alive: true,
            effects: vec![],
        }
    }

    pub fn has_effect(&self, effect: &str) -> bool {
        self.effects.iter().any(|e| e == effect)
    }

    pub fn set_alive(&mut self, value: bool) {
        self.alive = value;
    }

    pub fn add_effect(&mut self, effect: &str) {
        self.effects.push_unique(effect.to_string());
    }

    pub fn remove_effect(&mut self, effect: &str) {
        self.effects.retain(|e| e != effect);
    }

    pub fn toggle_effect(&mut self, effect: &str) {
        self.effects.toggle(effect.to_string());
    }
}
