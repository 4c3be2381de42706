use log::warn;

use crate::{action::Action, game_state::GameState};

pub fn reducer(state: GameState, action: Action) -> GameState {
    match action {
        Action::AddRole(role) => state.add_role(&role),
        Action::RemoveRole(role) => state.remove_role(&role),
        Action::CreateCustomRole(name) => match state.create_custom_role(&name) {
            Ok(next) => next,
            Err(err) => {
                warn!("Not creating role: {}", err);
                state
            }
        },
        Action::DeleteCustomRole(role) => match state.delete_custom_role(&role) {
            Ok(next) => next,
            Err(err) => {
                warn!("Not deleting role: {}", err);
                state
            }
        },
        Action::ResetRoles => state.reset_roles(),
        Action::DealRoles { seed } => state.deal_roles(seed),
        Action::ToggleRoleVisibility => state.toggle_role_visibility(),
        Action::DealNextRole => state.deal_next_role(),
        Action::TogglePlayerAlive(player) => state.toggle_player_alive(player),
        Action::CreateEffect { effect, player } => state.create_effect(effect, player),
        Action::DeleteEffect(effect) => state.delete_effect(&effect),
        Action::TogglePlayerEffect { player, effect } => {
            state.toggle_player_effect(player, &effect)
        }
        Action::FullReset => state.full_reset(),
    }
}
