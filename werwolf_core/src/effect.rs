use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::utils::derive_id;

pub type EffectId = String;

pub type EffectCatalogue = BTreeMap<EffectId, Effect>;

/// A status tag that can be attached to players during play, e.g. "In love".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub name: String,
    pub icon: Option<String>,
}

impl Effect {
    pub fn new(name: impl Into<String>) -> Self {
        Effect {
            name: name.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn id(&self) -> EffectId {
        derive_id(&self.name)
    }
}
