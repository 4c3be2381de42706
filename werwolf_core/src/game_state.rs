use log::{debug, info};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{
    deal::{Deal, DealPhase},
    effect::{Effect, EffectCatalogue, EffectId},
    error::{GameError, Result},
    player::{Player, PlayerId},
    role::{DefaultRole, PickCounts, RoleCatalogue, RoleId},
    storage::{load_custom_roles, Storage},
    utils::derive_id,
};

/// Every transition borrows the current state and returns a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    available_roles: RoleCatalogue,
    custom_roles: RoleCatalogue,
    picked_roles: PickCounts,
    available_effects: EffectCatalogue,
    players: Vec<Player>,
    deal: Deal,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::with_custom_roles(RoleCatalogue::new())
    }
}

fn reset_picked_roles(available_roles: &RoleCatalogue) -> PickCounts {
    available_roles.keys().map(|id| (id.clone(), 0)).collect()
}

impl GameState {
    /// Saved ids that collide with a default role are dropped.
    pub fn with_custom_roles(mut saved: RoleCatalogue) -> Self {
        saved.retain(|id, name| {
            let keep = !DefaultRole::is_default(id);
            if !keep {
                debug!("Dropping saved role {:?} ({}), it shadows a default", id, name);
            }
            keep
        });

        let mut available_roles = DefaultRole::catalogue();
        available_roles.extend(saved.clone());

        GameState {
            picked_roles: reset_picked_roles(&available_roles),
            available_roles,
            custom_roles: saved,
            available_effects: EffectCatalogue::new(),
            players: vec![],
            deal: Deal::default(),
        }
    }

    pub fn load(storage: &dyn Storage) -> Result<Self> {
        let saved = load_custom_roles(storage)?;
        info!("Loaded {} custom roles", saved.len());
        Ok(GameState::with_custom_roles(saved))
    }

    pub fn available_roles(&self) -> &RoleCatalogue {
        &self.available_roles
    }

    pub fn custom_roles(&self) -> &RoleCatalogue {
        &self.custom_roles
    }

    pub fn picked_roles(&self) -> &PickCounts {
        &self.picked_roles
    }

    pub fn available_effects(&self) -> &EffectCatalogue {
        &self.available_effects
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn deal(&self) -> Deal {
        self.deal
    }

    pub fn deal_phase(&self) -> DealPhase {
        self.deal.phase(self.players.len())
    }

    pub fn active_player(&self) -> Option<&Player> {
        self.players.get(self.deal.active_role_idx)
    }

    pub fn picked_count(&self, role: &str) -> u32 {
        self.picked_roles.get(role).copied().unwrap_or(0)
    }

    pub fn total_picked(&self) -> u32 {
        self.picked_roles.values().sum()
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    /// Display name of a role, or the bare id if the role is no longer known.
    pub fn role_name<'a>(&'a self, role: &'a str) -> &'a str {
        self.available_roles
            .get(role)
            .map(String::as_str)
            .unwrap_or(role)
    }

    pub fn check_player(&self, index: PlayerId) -> Result<()> {
        if index < self.players.len() {
            Ok(())
        } else {
            Err(GameError::PlayerOutOfRange {
                index,
                count: self.players.len(),
            })
        }
    }

    pub fn check_new_role(&self, name: &str) -> Result<RoleId> {
        let id = derive_id(name);
        if id.is_empty() {
            return Err(GameError::EmptyRoleId(name.to_string()));
        }
        if self.available_roles.contains_key(&id) {
            return Err(GameError::DuplicateRole {
                name: name.to_string(),
                id,
            });
        }
        Ok(id)
    }

    pub fn check_new_effect(&self, effect: &Effect) -> Result<EffectId> {
        let id = effect.id();
        if id.is_empty() {
            return Err(GameError::EmptyEffectId(effect.name.clone()));
        }
        if self.available_effects.contains_key(&id) {
            return Err(GameError::DuplicateEffect {
                name: effect.name.clone(),
                id,
            });
        }
        Ok(id)
    }

    pub fn check_deletable_role(&self, role: &str) -> Result<()> {
        if DefaultRole::is_default(role) {
            return Err(GameError::DefaultRoleNotDeletable(role.to_string()));
        }
        Ok(())
    }

    pub fn add_role(&self, role: &str) -> Self {
        let mut next = self.clone();
        if let Some(count) = next.picked_roles.get_mut(role) {
            *count = count.saturating_add(1);
        }
        next
    }

    pub fn remove_role(&self, role: &str) -> Self {
        let mut next = self.clone();
        if let Some(count) = next.picked_roles.get_mut(role) {
            *count = count.saturating_sub(1);
        }
        next
    }

    pub fn create_custom_role(&self, name: &str) -> Result<Self> {
        let id = self.check_new_role(name)?;
        let mut next = self.clone();
        next.available_roles.insert(id.clone(), name.to_string());
        next.custom_roles.insert(id.clone(), name.to_string());
        next.picked_roles.insert(id, 0);
        Ok(next)
    }

    /// Players that were already dealt the role keep its id.
    pub fn delete_custom_role(&self, role: &str) -> Result<Self> {
        self.check_deletable_role(role)?;
        let mut next = self.clone();
        next.custom_roles.remove(role);
        next.available_roles.remove(role);
        next.picked_roles.remove(role);
        Ok(next)
    }

    pub fn reset_roles(&self) -> Self {
        GameState {
            picked_roles: reset_picked_roles(&self.available_roles),
            ..self.clone()
        }
    }

    pub fn deal_roles(&self, seed: u64) -> Self {
        let mut players: Vec<Player> = self
            .picked_roles
            .iter()
            .flat_map(|(role, &count)| (0..count).map(move |_| Player::new(role.clone())))
            .collect();

        players.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
        info!("Dealt {} roles", players.len());

        GameState {
            players,
            deal: Deal::default(),
            ..self.clone()
        }
    }

    pub fn toggle_role_visibility(&self) -> Self {
        GameState {
            deal: self.deal.toggled_visibility(),
            ..self.clone()
        }
    }

    pub fn deal_next_role(&self) -> Self {
        GameState {
            deal: self.deal.next(self.players.len()),
            ..self.clone()
        }
    }

    /// # Panics
    ///
    /// If `player` was never dealt.
    pub fn toggle_player_alive(&self, player: PlayerId) -> Self {
        let mut next = self.clone();
        let alive = next.players[player].alive;
        next.players[player].set_alive(!alive);
        next
    }

    /// An existing catalogue entry with the same id is kept as it is.
    ///
    /// # Panics
    ///
    /// If `player` was never dealt.
    pub fn create_effect(&self, effect: Effect, player: PlayerId) -> Self {
        let mut next = self.clone();
        let id = effect.id();
        next.players[player].add_effect(&id);
        next.available_effects.entry(id).or_insert(effect);
        next
    }

    pub fn delete_effect(&self, effect: &str) -> Self {
        let mut next = self.clone();
        for player in next.players.iter_mut() {
            player.remove_effect(effect);
        }
        next.available_effects.remove(effect);
        next
    }

    /// # Panics
    ///
    /// If `player` was never dealt.
    pub fn toggle_player_effect(&self, player: PlayerId, effect: &str) -> Self {
        let mut next = self.clone();
        next.players[player].toggle_effect(effect);
        next
    }

    pub fn full_reset(&self) -> Self {
        GameState {
            available_roles: self.available_roles.clone(),
            custom_roles: self.custom_roles.clone(),
            picked_roles: self.picked_roles.clone(),
            ..GameState::with_custom_roles(RoleCatalogue::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::GameState;
    use crate::{
        deal::{Deal, DealPhase},
        effect::Effect,
        error::GameError,
        role::RoleCatalogue,
        storage::{MemoryStorage, Storage, CUSTOM_ROLES_KEY},
        utils::derive_id,
    };

    fn role_counts(state: &GameState) -> HashMap<String, u32> {
        let mut counts = HashMap::new();
        for p in state.players() {
            *counts.entry(p.role.clone()).or_insert(0) += 1;
        }
        counts
    }

    fn picked(roles: &[(&str, u32)]) -> GameState {
        let mut state = GameState::default();
        for &(name, count) in roles {
            let id = derive_id(name);
            if !state.available_roles().contains_key(&id) {
                state = state.create_custom_role(name).unwrap();
            }
            for _ in 0..count {
                state = state.add_role(&id);
            }
        }
        state
    }

    fn dealt_with_effects() -> GameState {
        picked(&[("villager", 2), ("werewolf", 1)])
            .deal_roles(7)
            .create_effect(Effect::new("In Love"), 0)
            .create_effect(Effect::new("In Love"), 1)
            .create_effect(Effect::new("Drunk"), 1)
    }

    #[test]
    fn initial_state_should_have_a_zero_count_for_every_role() {
        let state = GameState::default();
        assert_eq!(
            state.picked_roles().keys().collect::<Vec<_>>(),
            state.available_roles().keys().collect::<Vec<_>>()
        );
        assert_eq!(state.total_picked(), 0);
        assert!(state.players().is_empty());
        assert_eq!(state.deal(), Deal::default());
    }

    #[test]
    fn with_custom_roles_should_drop_ids_shadowing_defaults() {
        let saved = RoleCatalogue::from([
            ("seer".to_string(), "My Seer".to_string()),
            ("jesus".to_string(), "Jesus".to_string()),
        ]);
        let state = GameState::with_custom_roles(saved);
        assert_eq!(state.role_name("seer"), "Seer");
        assert_eq!(state.custom_roles().len(), 1);
        assert_eq!(state.role_name("jesus"), "Jesus");
        assert_eq!(state.picked_count("jesus"), 0);
    }

    #[test]
    fn load_should_read_the_saved_mirror() {
        let storage = MemoryStorage::default();
        storage
            .set_item(CUSTOM_ROLES_KEY, r#"{"jesus":"Jesus","witch":"Hexe"}"#)
            .unwrap();
        let state = GameState::load(&storage).unwrap();
        assert_eq!(state.custom_roles().keys().collect::<Vec<_>>(), vec!["jesus"]);
        assert_eq!(state.role_name("witch"), "Witch");
    }

    #[test]
    fn add_role_should_increment_and_ignore_unknown_roles() {
        let state = GameState::default().add_role("seer").add_role("seer");
        assert_eq!(state.picked_count("seer"), 2);

        let unknown = state.add_role("nobody");
        assert_eq!(unknown, state);
        assert!(!unknown.picked_roles().contains_key("nobody"));
    }

    #[test]
    fn add_role_should_saturate_at_the_maximum_count() {
        let mut state = GameState::default();
        state.picked_roles.insert("seer".to_string(), u32::MAX);
        assert_eq!(state.add_role("seer").picked_count("seer"), u32::MAX);
    }

    #[test]
    fn remove_role_should_not_go_below_zero() {
        let state = GameState::default();
        assert_eq!(state.remove_role("seer"), state);

        let state = state.add_role("seer").remove_role("seer").remove_role("seer");
        assert_eq!(state.picked_count("seer"), 0);
    }

    #[test]
    fn creating_the_same_role_twice_should_be_rejected() {
        let state = GameState::default().create_custom_role("Jesus").unwrap();
        assert_eq!(state.role_name("jesus"), "Jesus");
        assert_eq!(state.picked_count("jesus"), 0);

        let err = state.create_custom_role("Jesus!!").unwrap_err();
        assert_eq!(err.to_string(), r#"Role "Jesus!!" with ID "jesus" already exists"#);
        assert_eq!(state.custom_roles().len(), 1);
    }

    #[test]
    fn creating_a_role_named_like_a_default_should_be_rejected() {
        let err = GameState::default().create_custom_role("WEREWOLF").unwrap_err();
        assert!(matches!(err, GameError::DuplicateRole { id, .. } if id == "werewolf"));
    }

    #[test]
    fn creating_a_role_without_word_characters_should_be_rejected() {
        let err = GameState::default().create_custom_role("?!").unwrap_err();
        assert!(matches!(err, GameError::EmptyRoleId(_)));
    }

    #[test]
    fn delete_custom_role_should_remove_every_trace_of_it() {
        let state = picked(&[("Jesus", 2)]);
        let state = state.delete_custom_role("jesus").unwrap();
        assert!(!state.available_roles().contains_key("jesus"));
        assert!(state.custom_roles().is_empty());
        assert!(!state.picked_roles().contains_key("jesus"));
    }

    #[test]
    fn delete_custom_role_should_refuse_default_roles() {
        let err = GameState::default().delete_custom_role("villager").unwrap_err();
        assert!(matches!(err, GameError::DefaultRoleNotDeletable(_)));
    }

    #[test]
    fn deleted_roles_should_stay_on_dealt_players() {
        let state = picked(&[("Jesus", 1)]).deal_roles(1);
        let state = state.delete_custom_role("jesus").unwrap();
        assert_eq!(state.players()[0].role, "jesus");
        assert_eq!(state.role_name("jesus"), "jesus");
    }

    #[test]
    fn reset_roles_should_zero_every_count() {
        let state = picked(&[("villager", 3), ("Jesus", 1)]).reset_roles();
        assert_eq!(state.total_picked(), 0);
        assert_eq!(state.picked_roles().len(), state.available_roles().len());
    }

    #[test]
    fn deal_roles_should_create_one_player_per_pick() {
        let state = picked(&[("villager", 3), ("wolf", 1)]).deal_roles(42);

        assert_eq!(state.players().len(), 4);
        let counts = role_counts(&state);
        assert_eq!(counts["villager"], 3);
        assert_eq!(counts["wolf"], 1);
        assert!(state.players().iter().all(|p| p.alive && p.effects.is_empty()));
        assert_eq!(state.deal().active_role_idx, 0);
        assert!(!state.deal().role_is_visible);
        assert_eq!(state.deal_phase(), DealPhase::Ready);
    }

    #[test]
    fn deal_roles_should_be_reproducible_for_a_seed() {
        let state = picked(&[("villager", 5), ("werewolf", 2), ("seer", 1)]);
        assert_eq!(state.deal_roles(3), state.deal_roles(3));
    }

    #[test]
    fn deal_roles_should_shuffle_the_order() {
        let state = picked(&[("villager", 10), ("werewolf", 10)]);
        let unshuffled: Vec<String> = state
            .picked_roles()
            .iter()
            .flat_map(|(role, &count)| (0..count).map(move |_| role.clone()))
            .collect();
        let differs = (0..20).any(|seed| {
            let order: Vec<String> = state
                .deal_roles(seed)
                .players()
                .iter()
                .map(|p| p.role.clone())
                .collect();
            order != unshuffled
        });
        assert!(differs);
    }

    #[test]
    fn deal_roles_should_restart_the_deal() {
        let state = picked(&[("villager", 3)])
            .deal_roles(1)
            .toggle_role_visibility()
            .deal_next_role()
            .deal_roles(2);
        assert_eq!(state.deal(), Deal::default());
    }

    #[test]
    fn deal_next_role_should_stay_at_the_last_player() {
        let mut state = picked(&[("villager", 3)]).deal_roles(5);
        for _ in 0..2 {
            state = state.toggle_role_visibility().deal_next_role();
        }
        assert_eq!(state.deal().active_role_idx, 2);
        assert_eq!(state.deal_next_role(), state);

        let terminal = state.toggle_role_visibility().toggle_role_visibility();
        assert_eq!(terminal.deal_phase(), DealPhase::Complete);
        assert_eq!(terminal.deal_next_role(), terminal);
    }

    #[test]
    fn toggle_player_alive_should_flip_only_that_player() {
        let state = picked(&[("villager", 2)]).deal_roles(0).toggle_player_alive(1);
        assert!(state.players()[0].alive);
        assert!(!state.players()[1].alive);
        assert_eq!(state.alive_count(), 1);
        assert!(state.toggle_player_alive(1).players()[1].alive);
    }

    #[test]
    #[should_panic]
    fn toggle_player_alive_should_panic_for_unknown_players() {
        GameState::default().toggle_player_alive(0);
    }

    #[test]
    fn check_player_should_reject_out_of_range_indices() {
        let state = picked(&[("villager", 2)]).deal_roles(0);
        assert!(state.check_player(1).is_ok());
        assert!(matches!(
            state.check_player(2),
            Err(GameError::PlayerOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn create_effect_should_register_and_attach_once() {
        let state = dealt_with_effects();
        assert_eq!(state.available_effects().len(), 2);
        assert_eq!(state.players()[0].effects, vec!["inlove"]);
        assert_eq!(state.players()[1].effects, vec!["inlove", "drunk"]);

        let again = state.create_effect(Effect::new("drunk"), 1);
        assert_eq!(again.players()[1].effects, vec!["inlove", "drunk"]);
    }

    #[test]
    fn create_effect_should_keep_an_existing_entry() {
        let state = dealt_with_effects().create_effect(Effect::new("IN LOVE").with_icon("heart"), 2);
        assert_eq!(state.available_effects()["inlove"], Effect::new("In Love"));
        assert!(state.players()[2].has_effect("inlove"));
    }

    #[test]
    fn check_new_effect_should_reject_taken_and_empty_ids() {
        let state = dealt_with_effects();
        let err = state.check_new_effect(&Effect::new("drunk!")).unwrap_err();
        assert_eq!(err.to_string(), r#"Effect "drunk!" with ID "drunk" already exists"#);
        assert!(matches!(
            state.check_new_effect(&Effect::new("!!")),
            Err(GameError::EmptyEffectId(_))
        ));
        assert_eq!(state.check_new_effect(&Effect::new("Mute")).unwrap(), "mute");
    }

    #[test]
    fn delete_effect_should_strip_it_from_every_player() {
        let state = dealt_with_effects().delete_effect("inlove");
        assert!(!state.available_effects().contains_key("inlove"));
        assert!(state.players().iter().all(|p| !p.has_effect("inlove")));
        assert_eq!(state.players()[1].effects, vec!["drunk"]);

        assert_eq!(state.delete_effect("unknown"), state);
    }

    #[test]
    fn toggle_player_effect_should_add_and_remove() {
        let state = dealt_with_effects();
        let toggled = state.toggle_player_effect(2, "drunk");
        assert_eq!(toggled.players()[2].effects, vec!["drunk"]);
        assert_eq!(toggled.toggle_player_effect(2, "drunk"), state);
    }

    #[test]
    fn full_reset_should_keep_the_role_selection() {
        let state = picked(&[("villager", 2), ("Jesus", 1)])
            .deal_roles(3)
            .create_effect(Effect::new("Drunk"), 0)
            .toggle_role_visibility()
            .deal_next_role();
        let reset = state.full_reset();

        assert_eq!(reset.available_roles(), state.available_roles());
        assert_eq!(reset.custom_roles(), state.custom_roles());
        assert_eq!(reset.picked_roles(), state.picked_roles());
        assert_eq!(reset.picked_count("jesus"), 1);
        assert!(reset.players().is_empty());
        assert!(reset.available_effects().is_empty());
        assert_eq!(reset.deal(), Deal::default());
    }

    #[test]
    fn transitions_should_leave_the_previous_state_untouched() {
        let state = dealt_with_effects();
        let snapshot = state.clone();
        let _ = state
            .toggle_player_alive(0)
            .toggle_player_effect(0, "drunk")
            .delete_effect("inlove")
            .add_role("seer")
            .full_reset();
        assert_eq!(state, snapshot);
    }

    #[derive(Debug, Clone)]
    enum PoolOp {
        Add(usize),
        Remove(usize),
    }

    fn pool_op() -> impl Strategy<Value = PoolOp> {
        prop_oneof![
            (0..3usize).prop_map(PoolOp::Add),
            (0..3usize).prop_map(PoolOp::Remove),
        ]
    }

    const POOL: [&str; 3] = ["villager", "werewolf", "seer"];

    fn effect_name() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("Drunk"), Just("drunk!"), Just("In Love"), Just("Mute")]
    }

    proptest! {
        #[test]
        fn pick_counts_should_match_a_saturating_model(ops in prop::collection::vec(pool_op(), 0..60)) {
            let mut state = GameState::default();
            let mut model = [0u32; 3];
            for op in ops {
                match op {
                    PoolOp::Add(i) => {
                        state = state.add_role(POOL[i]);
                        model[i] += 1;
                    }
                    PoolOp::Remove(i) => {
                        state = state.remove_role(POOL[i]);
                        model[i] = model[i].saturating_sub(1);
                    }
                }
            }
            for (i, role) in POOL.iter().enumerate() {
                prop_assert_eq!(state.picked_count(role), model[i]);
            }
        }

        #[test]
        fn dealing_should_permute_the_picked_roles(
            counts in prop::collection::vec(0..6u32, 3),
            seed in any::<u64>(),
        ) {
            let mut state = GameState::default();
            for (role, &count) in POOL.iter().zip(counts.iter()) {
                for _ in 0..count {
                    state = state.add_role(role);
                }
            }
            let dealt = state.deal_roles(seed);
            prop_assert_eq!(dealt.players().len() as u32, state.total_picked());
            let counts_after = role_counts(&dealt);
            for (role, &count) in POOL.iter().zip(counts.iter()) {
                prop_assert_eq!(counts_after.get(*role).copied().unwrap_or(0), count);
            }
        }

        #[test]
        fn effect_lists_should_never_hold_duplicates(
            ops in prop::collection::vec((0..3usize, effect_name(), 0..3u8), 0..40),
        ) {
            let mut state = picked(&[("villager", 3)]).deal_roles(9);
            for (player, name, kind) in ops {
                let id = Effect::new(name).id();
                state = match kind {
                    0 => state.create_effect(Effect::new(name), player),
                    1 => state.toggle_player_effect(player, &id),
                    _ => state.delete_effect(&id),
                };
                for p in state.players() {
                    let mut unique = p.effects.clone();
                    unique.sort();
                    unique.dedup();
                    prop_assert_eq!(unique.len(), p.effects.len());
                }
            }
        }
    }
}
