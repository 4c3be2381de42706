use std::sync::Arc;

use log::{info, Level};
use redux_rs::{middlewares::logger::LoggerMiddleware, Store, StoreApi};

use crate::{
    action::Action,
    error::Result,
    game_state::GameState,
    middleware::{PersistMiddleware, ValidatorMiddleware},
    notifier::Notifier,
    reducer::reducer,
    storage::Storage,
};

/// Wraps the reducer into a store: actions pass the validator, then the
/// persistence step, then the logger before they are reduced.
pub async fn create_store(
    state: GameState,
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
) -> impl StoreApi<GameState, Action> + Send + Sync {
    let logger_middleware = LoggerMiddleware::new(Level::Debug);

    Store::new_with_state(reducer, state)
        .wrap(logger_middleware)
        .await
        .wrap(PersistMiddleware::new(storage, notifier.clone()))
        .await
        .wrap(ValidatorMiddleware::new(notifier))
        .await
}

/// Restores the saved custom roles from `storage` and builds the store.
pub async fn open_store(
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
) -> Result<impl StoreApi<GameState, Action> + Send + Sync> {
    let state = GameState::load(storage.as_ref())?;
    info!("Opening store with {} roles", state.available_roles().len());
    Ok(create_store(state, storage, notifier).await)
}
