pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod store;

pub use api::{create_router, AccessGate, AppState};
pub use config::AppConfig;
pub use error::{RegistryError, RegistryResult};
pub use logic::{DeleteResolver, ListPlan, QueryResolver, UpsertResolver};
pub use model::*;
pub use store::{ImageStore, MemoryStore, PostgresStore};

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serve the image API on an already bound listener until `shutdown` resolves
pub async fn serve<S, F>(
    listener: TcpListener,
    store: Arc<S>,
    gate: AccessGate,
    shutdown: F,
) -> anyhow::Result<()>
where
    S: ImageStore + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router().with_state(AppState::new(store, gate));

    log::info!("image-admission listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
