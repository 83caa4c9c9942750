use axum::{routing::get, Router};

use crate::api::handlers::{self, AppState};
use crate::store::traits::ImageStore;

/// Reads are public; `PUT` and `DELETE` handlers take the `Authorized`
/// extractor and so pass through the access gate.
pub fn create_router<S: ImageStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check::<S>))
        // Image allowlist
        .route(
            "/images",
            get(handlers::list_images::<S>).put(handlers::upsert_image::<S>),
        )
        .route(
            "/images/:id",
            get(handlers::get_image::<S>).delete(handlers::delete_image::<S>),
        )
}
