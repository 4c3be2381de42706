use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, warn};
use redux_rs::{MiddleWare, StoreApi};

use crate::{
    action::Action,
    error::Result,
    game_state::GameState,
    notifier::Notifier,
    storage::{save_custom_roles, Storage},
};

/// Checks whether `action` can be applied to `state`.
pub fn validate(state: &GameState, action: &Action) -> Result<()> {
    if let Some(player) = action.player() {
        state.check_player(player)?;
    }
    match action {
        Action::CreateCustomRole(name) => state.check_new_role(name).map(|_| ()),
        Action::DeleteCustomRole(role) => state.check_deletable_role(role),
        Action::CreateEffect { effect, .. } => state.check_new_effect(effect).map(|_| ()),
        _ => Ok(()),
    }
}

/// Drops actions that would be rejected by the state and tells the user why.
pub struct ValidatorMiddleware {
    notifier: Arc<dyn Notifier>,
}

impl ValidatorMiddleware {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        ValidatorMiddleware { notifier }
    }
}

#[async_trait]
impl<Inner> MiddleWare<GameState, Action, Inner> for ValidatorMiddleware
where
    Inner: StoreApi<GameState, Action> + Send + Sync,
{
    async fn dispatch(&self, action: Action, inner: &Arc<Inner>) {
        let state = inner.state_cloned().await;

        match validate(&state, &action) {
            Ok(()) => inner.dispatch(action).await,
            Err(err) => {
                // Ignore the action
                warn!("Ignoring invalid action {:?}: {}", action, err);
                if err.is_user_facing() {
                    self.notifier.alert(&err.to_string());
                }
            }
        }
    }
}

/// Writes the custom-role mirror after every action that changes it.
pub struct PersistMiddleware {
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
}

impl PersistMiddleware {
    pub fn new(storage: Arc<dyn Storage>, notifier: Arc<dyn Notifier>) -> Self {
        PersistMiddleware { storage, notifier }
    }
}

#[async_trait]
impl<Inner> MiddleWare<GameState, Action, Inner> for PersistMiddleware
where
    Inner: StoreApi<GameState, Action> + Send + Sync,
{
    async fn dispatch(&self, action: Action, inner: &Arc<Inner>) {
        let persist = action.changes_custom_roles();
        inner.dispatch(action).await;
        if !persist {
            return;
        }

        let custom_roles = inner
            .select(|state: &GameState| state.custom_roles().clone())
            .await;
        match save_custom_roles(self.storage.as_ref(), &custom_roles) {
            Ok(()) => debug!("Custom roles persisted"),
            Err(err) => {
                error!("Failed to persist custom roles: {}", err);
                self.notifier.alert(&format!("Could not save custom roles: {err}"));
            }
        }
    }
}
