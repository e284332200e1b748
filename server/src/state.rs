use crate::db::DbPool;

/// Shared state handed to every handler. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
}
