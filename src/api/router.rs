//! Route table

use super::handlers;
use super::state::AppState;
use crate::storage::QueueStore;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the HTTP router
///
/// `:id` accepts an entry id, a unique id prefix or a ticket number.
pub fn router<S: QueueStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route(
            "/queue",
            get(handlers::list::<S>)
                .post(handlers::join::<S>)
                .delete(handlers::clear::<S>),
        )
        .route(
            "/queue/:id",
            get(handlers::show::<S>)
                .patch(handlers::update::<S>)
                .delete(handlers::delete::<S>),
        )
        .route("/queue/:id/serve", post(handlers::serve::<S>))
        .route("/queue/:id/complete", post(handlers::complete::<S>))
        .route("/queue/:id/no-show", post(handlers::no_show::<S>))
        .route("/reports", get(handlers::reports::<S>))
        .route("/reports/summary", get(handlers::report_summary::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
