use std::future::Future;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod session;
pub mod state;

pub use db::DbPool;
pub use state::AppState;

pub fn app(pool: DbPool) -> Router {
    let collection = || get(handlers::list_todos).post(handlers::create_todo);
    let item = || {
        get(handlers::get_todo)
            .put(handlers::update_todo)
            .delete(handlers::delete_todo)
    };

    Router::new()
        .route("/todos/", collection())
        .route("/todos", collection())
        .route("/todos/{id}/", item())
        .route("/todos/{id}", item())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { pool })
}

/// Serve until the process is killed.
pub async fn run(listener: TcpListener, pool: DbPool) -> Result<(), std::io::Error> {
    run_until(listener, pool, std::future::pending()).await
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn run_until<F>(
    listener: TcpListener,
    pool: DbPool,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(pool))
        .with_graceful_shutdown(shutdown)
        .await
}
