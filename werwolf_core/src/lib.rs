pub mod action;
pub mod deal;
pub mod effect;
pub mod error;
pub mod game_state;
pub mod middleware;
pub mod notifier;
pub mod player;
pub mod reducer;
pub mod role;
pub mod storage;
pub mod store;
pub mod utils;

pub use action::Action;
pub use error::{GameError, Result};
pub use game_state::GameState;
pub use redux_rs::StoreApi;
pub use store::{create_store, open_store};
