use std::{
    io::{self, BufRead, Write},
    str::FromStr,
};

use itertools::Itertools;
use log::debug;
use werwolf_core::{
    deal::DealPhase,
    effect::Effect,
    notifier::Notifier,
    player::PlayerId,
    role::DefaultRole,
    Action, GameState, StoreApi,
};

static RULES: &str = "
*** Werwolf ***
A companion for the party game Werewolf. First pick how many players of each role take part, then
deal: hand the device around, every player reveals their role, hides it again and passes it on.
During play the moderator keeps track of who is still alive and of effects like \"in love\".
Player numbers start at 1.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Prepare,
    Deal,
    Play,
}

#[derive(Debug, PartialEq)]
pub enum CliAction {
    Quit,
    Help,
    Rules,
    Roles,
    Add(String),
    Remove(String),
    NewRole(String),
    DeleteRole(String),
    ResetRoles,
    Deal,
    Reveal,
    Next,
    Play,
    Alive(PlayerId),
    NewEffect(PlayerId, Effect),
    ToggleEffect(PlayerId, String),
    DeleteEffect(String),
    End,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseActionError;

fn parse_player(s: &str) -> Result<PlayerId, ParseActionError> {
    match usize::from_str(s) {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(ParseActionError),
    }
}

fn non_empty(s: &str) -> Result<String, ParseActionError> {
    let s = s.trim();
    if s.is_empty() {
        Err(ParseActionError)
    } else {
        Ok(s.to_string())
    }
}

impl CliAction {
    fn help() -> Vec<CliAction> {
        vec![
            CliAction::Quit,
            CliAction::Help,
            CliAction::Rules,
            CliAction::Roles,
            CliAction::Add("<role>".to_string()),
            CliAction::Remove("<role>".to_string()),
            CliAction::NewRole("<name>".to_string()),
            CliAction::DeleteRole("<role>".to_string()),
            CliAction::ResetRoles,
            CliAction::Deal,
            CliAction::Reveal,
            CliAction::Next,
            CliAction::Play,
            CliAction::Alive(0),
            CliAction::NewEffect(0, Effect::new("<name>")),
            CliAction::ToggleEffect(0, "<effect>".to_string()),
            CliAction::DeleteEffect("<effect>".to_string()),
            CliAction::End,
        ]
    }

    pub fn info(&self) -> String {
        match self {
            CliAction::Quit => "quit".to_string(),
            CliAction::Help => "list commands".to_string(),
            CliAction::Rules => "display rules".to_string(),
            CliAction::Roles => "display role descriptions".to_string(),
            CliAction::Add(_) => "pick one more player of a role".to_string(),
            CliAction::Remove(_) => "pick one player less of a role".to_string(),
            CliAction::NewRole(_) => "create a custom role".to_string(),
            CliAction::DeleteRole(_) => "delete a custom role".to_string(),
            CliAction::ResetRoles => "set every role count to zero".to_string(),
            CliAction::Deal => "deal the picked roles".to_string(),
            CliAction::Reveal => "show or hide the current role".to_string(),
            CliAction::Next => "go on to the next player".to_string(),
            CliAction::Play => "start playing".to_string(),
            CliAction::Alive(_) => "mark a player dead or alive".to_string(),
            CliAction::NewEffect(_, _) => "put a new effect on a player".to_string(),
            CliAction::ToggleEffect(_, _) => "toggle an effect on a player".to_string(),
            CliAction::DeleteEffect(_) => "remove an effect from the game".to_string(),
            CliAction::End => "end the game, keeping the picked roles".to_string(),
        }
    }

    pub fn cmd_str(&self) -> String {
        match self {
            CliAction::Quit => "q".to_string(),
            CliAction::Help => "h".to_string(),
            CliAction::Rules => "r".to_string(),
            CliAction::Roles => "roles".to_string(),
            CliAction::Add(role) => format!("+ {role}"),
            CliAction::Remove(role) => format!("- {role}"),
            CliAction::NewRole(name) => format!("new {name}"),
            CliAction::DeleteRole(role) => format!("del {role}"),
            CliAction::ResetRoles => "reset".to_string(),
            CliAction::Deal => "deal".to_string(),
            CliAction::Reveal => "show".to_string(),
            CliAction::Next => "next".to_string(),
            CliAction::Play => "play".to_string(),
            CliAction::Alive(_) => "alive <n>".to_string(),
            CliAction::NewEffect(_, effect) => format!("fx <n> {} [| icon]", effect.name),
            CliAction::ToggleEffect(_, effect) => format!("tfx <n> {effect}"),
            CliAction::DeleteEffect(effect) => format!("dfx {effect}"),
            CliAction::End => "end".to_string(),
        }
    }

    /// The store action behind the command, if it has one.
    pub fn to_action(&self) -> Option<Action> {
        match self {
            CliAction::Add(role) => Some(Action::AddRole(role.clone())),
            CliAction::Remove(role) => Some(Action::RemoveRole(role.clone())),
            CliAction::NewRole(name) => Some(Action::CreateCustomRole(name.clone())),
            CliAction::DeleteRole(role) => Some(Action::DeleteCustomRole(role.clone())),
            CliAction::ResetRoles => Some(Action::ResetRoles),
            CliAction::Reveal => Some(Action::ToggleRoleVisibility),
            CliAction::Next => Some(Action::DealNextRole),
            CliAction::Alive(player) => Some(Action::TogglePlayerAlive(*player)),
            CliAction::NewEffect(player, effect) => Some(Action::CreateEffect {
                effect: effect.clone(),
                player: *player,
            }),
            CliAction::ToggleEffect(player, effect) => Some(Action::TogglePlayerEffect {
                player: *player,
                effect: effect.clone(),
            }),
            CliAction::DeleteEffect(effect) => Some(Action::DeleteEffect(effect.clone())),
            CliAction::End => Some(Action::FullReset),
            _ => None,
        }
    }
}

impl FromStr for CliAction {
    type Err = ParseActionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (cmd, rest) = s.split_once(' ').unwrap_or((s, ""));
        let rest = rest.trim();
        match cmd {
            "q" => Ok(CliAction::Quit),
            "h" => Ok(CliAction::Help),
            "r" => Ok(CliAction::Rules),
            "roles" => Ok(CliAction::Roles),
            "+" => Ok(CliAction::Add(non_empty(rest)?)),
            "-" => Ok(CliAction::Remove(non_empty(rest)?)),
            "new" => Ok(CliAction::NewRole(non_empty(rest)?)),
            "del" => Ok(CliAction::DeleteRole(non_empty(rest)?)),
            "reset" => Ok(CliAction::ResetRoles),
            "deal" => Ok(CliAction::Deal),
            "show" => Ok(CliAction::Reveal),
            "next" => Ok(CliAction::Next),
            "play" => Ok(CliAction::Play),
            "alive" => Ok(CliAction::Alive(parse_player(rest)?)),
            "fx" => {
                let (player, spec) = rest.split_once(' ').ok_or(ParseActionError)?;
                let (name, icon) = match spec.split_once('|') {
                    Some((name, icon)) => (name, Some(non_empty(icon)?)),
                    None => (spec, None),
                };
                let mut effect = Effect::new(non_empty(name)?);
                if let Some(icon) = icon {
                    effect = effect.with_icon(icon);
                }
                Ok(CliAction::NewEffect(parse_player(player)?, effect))
            }
            "tfx" => {
                let (player, effect) = rest.split_once(' ').ok_or(ParseActionError)?;
                Ok(CliAction::ToggleEffect(parse_player(player)?, non_empty(effect)?))
            }
            "dfx" => Ok(CliAction::DeleteEffect(non_empty(rest)?)),
            "end" => Ok(CliAction::End),
            _ => Err(ParseActionError),
        }
    }
}

/// Prints alerts in place of a modal dialog.
pub struct AlertPrinter;

impl Notifier for AlertPrinter {
    fn alert(&self, message: &str) {
        println!("\n!! {message}");
    }
}

pub struct Cli<S> {
    store: S,
    screen: Screen,
    seed: Option<u64>,
}

impl<S> Cli<S>
where
    S: StoreApi<GameState, Action> + Send + Sync,
{
    pub fn new(store: S, seed: Option<u64>) -> Self {
        Cli {
            store,
            screen: Screen::Prepare,
            seed,
        }
    }

    fn next_deal(&mut self) -> Action {
        match self.seed {
            Some(seed) => {
                self.seed = Some(seed.wrapping_add(1));
                Action::DealRoles { seed }
            }
            None => Action::deal_roles(),
        }
    }

    pub async fn run(&mut self) -> io::Result<()> {
        println!("{RULES}");
        self.render().await;
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("\n>");
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                return Ok(());
            };
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match CliAction::from_str(&line) {
                Ok(CliAction::Quit) => return Ok(()),
                Ok(cmd) => self.handle(cmd).await,
                Err(ParseActionError) => {
                    println!("Unknown command {:?}, press h for help", line.trim());
                }
            }
        }
    }

    async fn handle(&mut self, cmd: CliAction) {
        debug!("Handling {:?}", cmd);
        match cmd {
            CliAction::Help => {
                for cmd in CliAction::help() {
                    println!("- [{}]: {}", cmd.cmd_str(), cmd.info());
                }
                return;
            }
            CliAction::Rules => {
                println!("{RULES}");
                return;
            }
            CliAction::Roles => {
                println!("{}", DefaultRole::rules());
                return;
            }
            CliAction::Deal => {
                let action = self.next_deal();
                self.store.dispatch(action).await;
                self.screen = Screen::Deal;
            }
            CliAction::Play => self.screen = Screen::Play,
            CliAction::End => {
                self.store.dispatch(Action::FullReset).await;
                self.screen = Screen::Prepare;
            }
            other => {
                if let Some(action) = other.to_action() {
                    self.store.dispatch(action).await;
                }
            }
        }
        self.render().await;
    }

    async fn render(&self) {
        let state = self.store.state_cloned().await;
        let screen = if state.players().is_empty() {
            Screen::Prepare
        } else {
            self.screen
        };
        let text = match screen {
            Screen::Prepare => format_prepare(&state),
            Screen::Deal => format_deal(&state),
            Screen::Play => format_play(&state),
        };
        println!("{text}");
    }
}

pub fn format_prepare(state: &GameState) -> String {
    let rows = state
        .available_roles()
        .iter()
        .map(|(id, name)| {
            let custom = if state.custom_roles().contains_key(id) {
                " (custom)"
            } else {
                ""
            };
            format!("  {:>2} x {} [{}]{}", state.picked_count(id), name, id, custom)
        })
        .join("\n");
    format!(
        "\n~ Pick roles ({} players)\n{}",
        state.total_picked(),
        rows
    )
}

pub fn format_deal(state: &GameState) -> String {
    let deal = state.deal();
    let header = format!(
        "\n~ Deal: player {} of {}",
        deal.active_role_idx + 1,
        state.players().len()
    );
    let body = match (state.deal_phase(), state.active_player()) {
        (DealPhase::Revealing, Some(player)) => {
            format!("Your role: {}", state.role_name(&player.role))
        }
        (DealPhase::Ready, _) => "Role hidden, [show] to reveal it".to_string(),
        (DealPhase::Advancing, _) => "Role hidden again, [next] for the next player".to_string(),
        (DealPhase::Complete, _) => "Everybody knows their role, [play] to start".to_string(),
        _ => "Nothing dealt yet".to_string(),
    };
    format!("{header}\n{body}")
}

pub fn format_play(state: &GameState) -> String {
    let rows = state
        .players()
        .iter()
        .enumerate()
        .map(|(i, player)| {
            let effects = player
                .effects
                .iter()
                .map(|id| {
                    state
                        .available_effects()
                        .get(id)
                        .map(|e| match &e.icon {
                            Some(icon) => format!("{} ({})", e.name, icon),
                            None => e.name.clone(),
                        })
                        .unwrap_or_else(|| id.clone())
                })
                .join(", ");
            format!(
                "  {}: {}{}{}",
                i + 1,
                state.role_name(&player.role),
                if player.alive { "" } else { " [dead]" },
                if effects.is_empty() {
                    String::new()
                } else {
                    format!(" {{{effects}}}")
                }
            )
        })
        .join("\n");
    let effects = state.available_effects().keys().join(", ");
    format!(
        "\n~ Your village has {} of {} inhabitants\n{}\n  effects: [{}]",
        state.alive_count(),
        state.players().len(),
        rows,
        effects
    )
}
